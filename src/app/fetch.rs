//! Spawning background fetches.
//!
//! Every fetch task is tagged with the generation it was issued under and
//! reports back over the app channel; see [`crate::events`] for the
//! staleness rule.

use super::{App, Screen};
use crate::api::ApiClient;
use crate::events::AppMessage;

impl App {
    /// Start a list fetch for the current screen.
    ///
    /// The empty-filter case is rejected inline so the form shows the
    /// message immediately, without a spinner flash.
    pub fn start_list_fetch(&mut self) {
        if self.filters.is_empty() {
            self.error = Some("please provide at least one filter value".to_string());
            self.needs_redraw = true;
            return;
        }
        self.error = None;
        self.loading = true;
        self.needs_redraw = true;
        let generation = self.next_generation();
        let client = ApiClient::new(self.base_url.clone());
        let filters = self.filters.clone();
        let screen = self.screen;
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let message = match screen {
                Screen::Logs => AppMessage::ChatsFetched {
                    generation,
                    result: client.list_chats(&filters).await,
                },
                Screen::Analytics => AppMessage::AnalyticsFetched {
                    generation,
                    result: client.list_analytics_chats(&filters).await,
                },
            };
            let _ = tx.send(message);
        });
    }

    /// Start a single-chat fetch by id.
    pub fn start_chat_fetch(&mut self, chat_id: String) {
        if chat_id.trim().is_empty() {
            self.error = Some("please enter a chat ID".to_string());
            self.needs_redraw = true;
            return;
        }
        self.error = None;
        self.loading = true;
        self.needs_redraw = true;
        let generation = self.next_generation();
        let client = ApiClient::new(self.base_url.clone());
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = client.get_chat(&chat_id).await;
            let _ = tx.send(AppMessage::ChatFetched { generation, result });
        });
    }
}
