//! HTTP client for the remote debug API.
//!
//! One GET per user action against `{base_url}/debug/agent_chats` or
//! `{base_url}/debug/get_chat`. Responses arrive in a `status: "success"`
//! envelope; anything else is a uniform failure. No retries, no timeouts
//! beyond the transport default, no request cancellation.

use crate::models::ChatRecord;
use crate::query::FilterSet;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Path of the filtered list endpoint.
pub const LIST_CHATS_PATH: &str = "/debug/agent_chats";
/// Path of the single-chat endpoint.
pub const GET_CHAT_PATH: &str = "/debug/get_chat";

/// Failure surface for a fetch attempt. Every variant is terminal for the
/// attempt; the UI returns to ready and a new fetch may be issued.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected client-side before any network call.
    #[error("{0}")]
    Validation(String),
    /// Network failure or non-2xx status.
    #[error("failed to fetch data: {0}")]
    Transport(String),
    /// Body parsed but the envelope shape or status was wrong.
    #[error("invalid response format")]
    Format,
    /// Analytics view: the query matched records, but none carry analytics.
    #[error("found {total} chat record(s), but none contain analytics data")]
    EmptyResult { total: usize },
}

#[derive(Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    agent_chats: Option<Vec<ChatRecord>>,
}

#[derive(Deserialize)]
struct GetChatEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    get_chat: Option<ChatRecord>,
}

/// Client for the debug endpoints. Cheap to clone; the inner
/// `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the filtered chat list. At least one filter must be non-empty.
    pub async fn list_chats(&self, filters: &FilterSet) -> Result<Vec<ChatRecord>, ApiError> {
        if filters.is_empty() {
            return Err(ApiError::Validation(
                "please provide at least one filter value".to_string(),
            ));
        }
        let url = format!(
            "{}{}?{}",
            self.base_url,
            LIST_CHATS_PATH,
            filters.to_query_string()
        );
        debug!(%url, "fetching chat list");
        let envelope: ListEnvelope = self.get_json(&url).await?;
        if envelope.status != "success" {
            return Err(ApiError::Format);
        }
        envelope.agent_chats.ok_or(ApiError::Format)
    }

    /// Fetch the chat list and keep only records with an analytics payload.
    ///
    /// A non-empty result set with no analytics at all is surfaced as
    /// [`ApiError::EmptyResult`] rather than an empty success.
    pub async fn list_analytics_chats(
        &self,
        filters: &FilterSet,
    ) -> Result<Vec<ChatRecord>, ApiError> {
        let records = self.list_chats(filters).await?;
        let total = records.len();
        let kept: Vec<ChatRecord> = records
            .into_iter()
            .filter(|record| record.analytics.is_some())
            .collect();
        if total > 0 && kept.is_empty() {
            return Err(ApiError::EmptyResult { total });
        }
        Ok(kept)
    }

    /// Fetch a single chat by id.
    pub async fn get_chat(&self, chat_id: &str) -> Result<ChatRecord, ApiError> {
        let chat_id = chat_id.trim();
        if chat_id.is_empty() {
            return Err(ApiError::Validation("please enter a chat ID".to_string()));
        }
        let url = format!(
            "{}{}?chat_id={}",
            self.base_url,
            GET_CHAT_PATH,
            urlencoding::encode(chat_id)
        );
        debug!(%url, "fetching single chat");
        let envelope: GetChatEnvelope = self.get_json(&url).await?;
        if envelope.status != "success" {
            return Err(ApiError::Format);
        }
        envelope.get_chat.ok_or(ApiError::Format)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Transport(format!(
                "HTTP error! status: {}",
                status.as_u16()
            )));
        }
        response.json::<T>().await.map_err(|_| ApiError::Format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_chats_rejects_empty_filters_before_network() {
        // Unroutable base URL: a network attempt would fail differently.
        let client = ApiClient::new("http://invalid.invalid");
        let err = client.list_chats(&FilterSet::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_chat_rejects_empty_id_before_network() {
        let client = ApiClient::new("http://invalid.invalid");
        let err = client.get_chat("   ").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
