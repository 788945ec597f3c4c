//! Filter fields and query-string construction for the list endpoint.
//!
//! The list endpoint accepts six optional filter parameters; a fetch is only
//! valid when at least one of them is non-empty. Empty fields are omitted
//! from the query string entirely.

use serde::{Deserialize, Serialize};

/// Filter field names in the order they appear in the filter form,
/// paired with their display labels.
pub const FILTER_FIELDS: [(&str, &str); 6] = [
    ("agent_id", "Agent ID"),
    ("partner_id", "Partner ID"),
    ("assigned_phone_number", "Assigned Phone"),
    ("caller_phone", "Caller Phone"),
    ("mode", "Mode"),
    ("timestamp", "Timestamp"),
];

/// The set of filter values for a list fetch.
///
/// All fields are free-form strings; validation is limited to "at least one
/// non-empty field" at fetch time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default)]
    pub agent_id: String,
    #[serde(default)]
    pub partner_id: String,
    #[serde(default)]
    pub assigned_phone_number: String,
    #[serde(default)]
    pub caller_phone: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub timestamp: String,
}

impl FilterSet {
    /// Field name / trimmed value pairs in form order.
    fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("agent_id", self.agent_id.trim()),
            ("partner_id", self.partner_id.trim()),
            ("assigned_phone_number", self.assigned_phone_number.trim()),
            ("caller_phone", self.caller_phone.trim()),
            ("mode", self.mode.trim()),
            ("timestamp", self.timestamp.trim()),
        ]
    }

    /// True when every field is empty after trimming.
    pub fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, value)| value.is_empty())
    }

    /// Build the query string from the non-empty fields, URL-encoded.
    ///
    /// Empty fields are omitted; the result has no leading `?`.
    pub fn to_query_string(&self) -> String {
        self.entries()
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Reset every field to empty.
    pub fn clear(&mut self) {
        *self = FilterSet::default();
    }

    /// Mutable access to a field by form index (see [`FILTER_FIELDS`]).
    pub fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.agent_id),
            1 => Some(&mut self.partner_id),
            2 => Some(&mut self.assigned_phone_number),
            3 => Some(&mut self.caller_phone),
            4 => Some(&mut self.mode),
            5 => Some(&mut self.timestamp),
            _ => None,
        }
    }

    /// Read access to a field by form index (see [`FILTER_FIELDS`]).
    pub fn field(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(self.agent_id.as_str()),
            1 => Some(self.partner_id.as_str()),
            2 => Some(self.assigned_phone_number.as_str()),
            3 => Some(self.caller_phone.as_str()),
            4 => Some(self.mode.as_str()),
            5 => Some(self.timestamp.as_str()),
            _ => None,
        }
    }
}
