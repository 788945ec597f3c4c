//! Data model for chat records fetched from the debug API.
//!
//! Records arrive as loosely-typed JSON objects. The known fields are
//! captured as typed options; everything else lands in an `extra` map so the
//! table can offer it as a dynamic column. Records are immutable snapshots
//! of a single fetch and are replaced wholesale by the next one.

mod analytics;
mod message;

pub use analytics::{
    Analytics, BookingDetails, ConversationDetails, ConversationTurn, PatientDetails, Slot,
    format_date_flexible,
};
pub use message::Message;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Deserialize an optional scalar into its display string.
///
/// The API is not strict about field types (ids and phone numbers show up
/// as both strings and numbers), so anything non-string is rendered through
/// its compact JSON form.
pub(crate) fn de_loose_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.map(loose_to_string))
}

/// Deserialize a possibly-missing scalar into a string, empty when absent.
pub(crate) fn de_loose<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.map(loose_to_string).unwrap_or_default())
}

/// Render a JSON scalar as display text without surrounding quotes.
pub(crate) fn loose_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A single stored conversation.
///
/// `history` and `_id` are structural: they are never offered as dynamic
/// columns (see [`crate::schema::discover_columns`]).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRecord {
    #[serde(rename = "_id", default, deserialize_with = "de_loose_opt")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de_loose_opt")]
    pub agent_id: Option<String>,
    #[serde(default, deserialize_with = "de_loose_opt")]
    pub partner_id: Option<String>,
    #[serde(default, deserialize_with = "de_loose_opt")]
    pub assigned_phone_number: Option<String>,
    #[serde(default, deserialize_with = "de_loose_opt")]
    pub caller_phone: Option<String>,
    #[serde(default, deserialize_with = "de_loose_opt")]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "de_loose_opt")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "de_loose_opt")]
    pub run_id: Option<String>,
    #[serde(default, deserialize_with = "de_loose_opt")]
    pub rid: Option<String>,
    #[serde(default)]
    pub history: Vec<Message>,
    #[serde(default)]
    pub analytics: Option<Analytics>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ChatRecord {
    /// Display value for a field by name; absent fields are empty strings,
    /// so selecting a column that no longer exists on a batch never fails.
    pub fn field(&self, name: &str) -> String {
        let known = match name {
            "_id" => &self.id,
            "agent_id" => &self.agent_id,
            "partner_id" => &self.partner_id,
            "assigned_phone_number" => &self.assigned_phone_number,
            "caller_phone" => &self.caller_phone,
            "mode" => &self.mode,
            "timestamp" => &self.timestamp,
            "run_id" => &self.run_id,
            "rid" => &self.rid,
            other => {
                return self
                    .extra
                    .get(other)
                    .cloned()
                    .map(loose_to_string)
                    .unwrap_or_default();
            }
        };
        known.clone().unwrap_or_default()
    }

    /// Names of the fields present on this record, known and dynamic alike.
    /// `_id` and `history` are structural and not reported.
    pub fn column_names(&self) -> Vec<String> {
        let known: [(&str, &Option<String>); 8] = [
            ("agent_id", &self.agent_id),
            ("partner_id", &self.partner_id),
            ("assigned_phone_number", &self.assigned_phone_number),
            ("caller_phone", &self.caller_phone),
            ("mode", &self.mode),
            ("timestamp", &self.timestamp),
            ("run_id", &self.run_id),
            ("rid", &self.rid),
        ];
        let mut names: Vec<String> = known
            .iter()
            .filter(|(_, value)| value.is_some())
            .map(|(name, _)| name.to_string())
            .collect();
        if self.analytics.is_some() {
            names.push("analytics".to_string());
        }
        names.extend(self.extra.keys().cloned());
        names
    }

    /// Count of conversational turns: only `user` and `assistant` messages.
    /// Function calls, fillers, agent broadcasts and unknown roles are
    /// excluded.
    pub fn message_count(&self) -> usize {
        self.history
            .iter()
            .filter(|m| matches!(m, Message::User { .. } | Message::Assistant { .. }))
            .count()
    }

    /// Timestamp parsed for chronological sorting; `None` when missing or
    /// unparsable (unparsable sorts as minimum).
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }

    /// Timestamp formatted for display, falling back to the raw value.
    pub fn display_timestamp(&self) -> String {
        match self.timestamp.as_deref() {
            None => String::new(),
            Some(raw) => match parse_timestamp(raw) {
                Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => raw.to_string(),
            },
        }
    }
}

/// Parse a timestamp in any of the formats the backend emits.
///
/// Tries RFC 3339, RFC 2822, then the common naive datetime and date forms.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}
