//! Messages delivered to the app from background fetch tasks.
//!
//! Every fetch carries the generation it was issued under; the app drops
//! completions whose generation is stale, so a slow early fetch can never
//! overwrite the result of a later one (last-response-wins).

use crate::api::ApiError;
use crate::models::ChatRecord;

/// Completion notifications from spawned fetch tasks.
#[derive(Debug)]
pub enum AppMessage {
    /// The filtered list fetch for the logs screen finished.
    ChatsFetched {
        generation: u64,
        result: Result<Vec<ChatRecord>, ApiError>,
    },
    /// The filtered list fetch for the analytics screen finished.
    AnalyticsFetched {
        generation: u64,
        result: Result<Vec<ChatRecord>, ApiError>,
    },
    /// A single-chat lookup finished.
    ChatFetched {
        generation: u64,
        result: Result<ChatRecord, ApiError>,
    },
}

impl AppMessage {
    /// The fetch generation this message belongs to.
    pub fn generation(&self) -> u64 {
        match self {
            AppMessage::ChatsFetched { generation, .. }
            | AppMessage::AnalyticsFetched { generation, .. }
            | AppMessage::ChatFetched { generation, .. } => *generation,
        }
    }
}
