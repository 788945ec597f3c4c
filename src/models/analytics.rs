//! Analytics payload attached to some chat records.
//!
//! The analytics view keeps only records carrying this payload and renders
//! a fixed-column summary plus a simplified two-role conversation.

use super::{de_loose, parse_timestamp};
use chrono::DateTime;
use serde::Deserialize;

/// Per-conversation analytics summary.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Analytics {
    #[serde(default)]
    pub patient_details: PatientDetails,
    #[serde(default)]
    pub booking_details: BookingDetails,
    #[serde(default)]
    pub conversation_details: ConversationDetails,
    #[serde(default, deserialize_with = "de_loose")]
    pub status: String,
    #[serde(default, deserialize_with = "de_loose")]
    pub mode: String,
    #[serde(default)]
    pub conversation: Vec<ConversationTurn>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PatientDetails {
    #[serde(default, deserialize_with = "de_loose")]
    pub name: String,
    #[serde(default, deserialize_with = "de_loose")]
    pub hcn: String,
    #[serde(default, deserialize_with = "de_loose")]
    pub pn: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BookingDetails {
    #[serde(default, deserialize_with = "de_loose")]
    pub reason: String,
    #[serde(default)]
    pub slot: Slot,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Slot {
    #[serde(default, deserialize_with = "de_loose")]
    pub start_time: String,
    #[serde(default, deserialize_with = "de_loose")]
    pub end_time: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ConversationDetails {
    #[serde(default, deserialize_with = "de_loose")]
    pub purpose: String,
}

/// A simplified conversation turn: `user` renders outbound, anything else
/// renders assistant-styled.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ConversationTurn {
    #[serde(default, deserialize_with = "de_loose")]
    pub role: String,
    #[serde(default, deserialize_with = "de_loose")]
    pub content: String,
}

/// Format a slot time that may be an epoch or a textual date.
///
/// 10-12 digit values are treated as epoch seconds, 13 digits as epoch
/// milliseconds; otherwise the usual timestamp formats are tried and the
/// raw string is the last resort.
pub fn format_date_flexible(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    if (10..=13).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(number) = value.parse::<i64>() {
            let millis = if value.len() == 13 { number } else { number * 1000 };
            if let Some(dt) = DateTime::from_timestamp_millis(millis) {
                return dt.format("%Y-%m-%d %H:%M:%S").to_string();
            }
        }
    }
    match parse_timestamp(value) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => value.to_string(),
    }
}
