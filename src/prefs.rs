//! Preference persistence under the user's config directory.
//!
//! Filters, the visible-column set, the API base URL and the metadata
//! panel state survive restarts. Loading tolerates a missing or corrupt
//! file (defaults win); saving is best-effort and only logged on failure.

use crate::query::FilterSet;
use color_eyre::{Result, eyre::WrapErr, eyre::eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

fn default_visible_columns() -> Vec<String> {
    vec![
        "timestamp".to_string(),
        "mode".to_string(),
        "partner_id".to_string(),
    ]
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

/// Everything the dashboard persists between runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    #[serde(default)]
    pub filters: FilterSet,
    #[serde(default = "default_visible_columns")]
    pub visible_columns: Vec<String>,
    #[serde(default = "default_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub metadata_expanded: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            filters: FilterSet::default(),
            visible_columns: default_visible_columns(),
            api_base_url: default_base_url(),
            metadata_expanded: false,
        }
    }
}

/// File-backed store for [`Preferences`].
#[derive(Debug, Clone)]
pub struct PrefsStore {
    path: PathBuf,
}

impl PrefsStore {
    /// Store at the default location: `<config dir>/chatscope/prefs.json`.
    pub fn new() -> Result<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| eyre!("could not determine config directory"))?
            .join("chatscope");
        if !dir.exists() {
            fs::create_dir_all(&dir).wrap_err("Failed to create config directory")?;
        }
        Ok(Self {
            path: dir.join("prefs.json"),
        })
    }

    /// Store at an explicit path (used by tests).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load preferences; a missing or unreadable file yields defaults.
    pub fn load(&self) -> Preferences {
        match fs::read_to_string(&self.path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("ignoring corrupt preferences file: {e}");
                Preferences::default()
            }),
            Err(_) => Preferences::default(),
        }
    }

    /// Persist preferences. Failures are logged, never fatal.
    pub fn save(&self, prefs: &Preferences) {
        let json = match serde_json::to_string_pretty(prefs) {
            Ok(json) => json,
            Err(e) => {
                warn!("failed to serialize preferences: {e}");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, json) {
            warn!("failed to write preferences to {:?}: {e}", self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::with_path(dir.path().join("prefs.json"));
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::with_path(dir.path().join("prefs.json"));
        let prefs = Preferences {
            filters: FilterSet {
                agent_id: "agent-1".to_string(),
                ..FilterSet::default()
            },
            visible_columns: vec!["mode".to_string()],
            api_base_url: "http://10.0.0.2:9000".to_string(),
            metadata_expanded: true,
        };
        store.save(&prefs);
        assert_eq!(store.load(), prefs);
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{ not json").unwrap();
        let store = PrefsStore::with_path(path);
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{ "metadata_expanded": true }"#).unwrap();
        let store = PrefsStore::with_path(path);
        let prefs = store.load();
        assert!(prefs.metadata_expanded);
        assert_eq!(prefs.api_base_url, "http://localhost:8000");
        assert_eq!(prefs.visible_columns.len(), 3);
    }
}
