//! Application state and the mutations driven by events and fetch results.

pub mod fetch;
pub mod handlers;

use crate::clipboard::{self, CopyNotice};
use crate::events::AppMessage;
use crate::models::ChatRecord;
use crate::prefs::{Preferences, PrefsStore};
use crate::query::FilterSet;
use crate::schema::discover_columns;
use crate::ui::panel::{PanelKind, PanelState, PanelView};
use crate::ui::table::sort_records;
use crate::ui::theme::{COLOR_ACCENT, COLOR_BORDER};
use crate::ui::transcript::{build_blocks, TranscriptBlock};
use crate::ui::analytics;
use ratatui::style::Color;
use std::collections::BTreeSet;
use tokio::sync::mpsc;
use tracing::debug;

/// Form index of the API base URL row (after the six filter fields).
pub const BASE_URL_FIELD: usize = 6;
/// Total editable rows in the filter form.
pub const FORM_FIELD_COUNT: usize = 7;

/// Which top-level view the results table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Logs,
    Analytics,
}

/// Which region receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Filters,
    Table,
    Panel,
}

/// Cursor and sort state of the results table.
#[derive(Debug, Clone, Default)]
pub struct TableUiState {
    /// Row cursor.
    pub selected: usize,
    /// Header cell under the sort cursor.
    pub header_cursor: usize,
    /// Column the batch is currently sorted by, if any.
    pub sort_column: Option<String>,
}

/// The column-selector overlay.
#[derive(Debug, Clone)]
pub struct ColumnSelector {
    /// Discovered columns, in display order.
    pub columns: Vec<String>,
    pub cursor: usize,
}

/// The open-chat-by-ID prompt overlay.
#[derive(Debug, Clone, Default)]
pub struct ChatIdPrompt {
    pub input: String,
}

pub struct App {
    pub screen: Screen,
    pub focus: Focus,

    pub filters: FilterSet,
    pub base_url: String,
    /// Focused row of the filter form (0..5 filters, 6 base URL).
    pub form_cursor: usize,

    /// Current result batch (analytics screen: already filtered to records
    /// that carry analytics).
    pub records: Vec<ChatRecord>,
    /// Columns discovered from the current batch.
    pub available_columns: BTreeSet<String>,
    /// Columns the user has toggled on.
    pub visible_columns: BTreeSet<String>,
    pub table: TableUiState,
    /// Row whose record is open in the panel, if it came from the table.
    pub active_row: Option<usize>,

    pub panel: PanelState,
    pub metadata_expanded: bool,
    pub copy_notice: Option<CopyNotice>,

    pub column_selector: Option<ColumnSelector>,
    pub chat_prompt: Option<ChatIdPrompt>,

    pub loading: bool,
    pub error: Option<String>,

    pub tick_count: u64,
    pub needs_redraw: bool,
    pub should_quit: bool,

    fetch_generation: u64,
    pub message_tx: mpsc::UnboundedSender<AppMessage>,
    /// Taken by the event loop, which needs ownership for `select!`.
    pub message_rx: Option<mpsc::UnboundedReceiver<AppMessage>>,
    prefs_store: Option<PrefsStore>,
}

impl App {
    pub fn new(prefs: Preferences, prefs_store: Option<PrefsStore>) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            screen: Screen::Logs,
            focus: Focus::Filters,
            filters: prefs.filters,
            base_url: prefs.api_base_url,
            form_cursor: 0,
            records: Vec::new(),
            available_columns: BTreeSet::new(),
            visible_columns: prefs.visible_columns.into_iter().collect(),
            table: TableUiState::default(),
            active_row: None,
            panel: PanelState::default(),
            metadata_expanded: prefs.metadata_expanded,
            copy_notice: None,
            column_selector: None,
            chat_prompt: None,
            loading: false,
            error: None,
            tick_count: 0,
            needs_redraw: true,
            should_quit: false,
            fetch_generation: 0,
            message_tx,
            message_rx: Some(message_rx),
            prefs_store,
        }
    }

    /// Generation the next fetch will be issued under.
    pub fn next_generation(&mut self) -> u64 {
        self.fetch_generation += 1;
        self.fetch_generation
    }

    #[cfg(test)]
    pub fn current_generation(&self) -> u64 {
        self.fetch_generation
    }

    // ========================================================================
    // Background fetch completions
    // ========================================================================

    /// Apply a fetch completion. Stale generations are dropped so the last
    /// fetch issued always wins, regardless of completion order.
    pub fn apply_message(&mut self, message: AppMessage) {
        if message.generation() != self.fetch_generation {
            debug!(
                stale = message.generation(),
                current = self.fetch_generation,
                "dropping stale fetch completion"
            );
            return;
        }
        self.loading = false;
        match message {
            AppMessage::ChatsFetched { result, .. }
            | AppMessage::AnalyticsFetched { result, .. } => match result {
                Ok(records) => self.install_batch(records),
                Err(e) => self.error = Some(e.to_string()),
            },
            AppMessage::ChatFetched { result, .. } => match result {
                Ok(record) => {
                    self.error = None;
                    self.open_record(record, None);
                }
                Err(e) => self.error = Some(e.to_string()),
            },
        }
        self.needs_redraw = true;
    }

    fn install_batch(&mut self, records: Vec<ChatRecord>) {
        self.error = None;
        self.records = records;
        self.available_columns = discover_columns(&self.records);
        self.table = TableUiState::default();
        self.active_row = None;
        if self.focus == Focus::Filters && !self.records.is_empty() {
            self.focus = Focus::Table;
        }
    }

    // ========================================================================
    // Panel
    // ========================================================================

    /// Open the record under the table cursor in the panel.
    pub fn open_selected(&mut self) {
        let Some(record) = self.records.get(self.table.selected).cloned() else {
            return;
        };
        let row = self.table.selected;
        self.open_record(record, Some(row));
    }

    fn open_record(&mut self, record: ChatRecord, row: Option<usize>) {
        let view = match self.screen {
            Screen::Logs => {
                let blocks: Vec<TranscriptBlock> = build_blocks(&record.history);
                PanelView::new(PanelKind::Chat { record }, blocks, self.metadata_expanded)
            }
            Screen::Analytics => {
                let analytics = record.analytics.clone().unwrap_or_default();
                let blocks = analytics::build_conversation_blocks(&analytics.conversation);
                PanelView::new(PanelKind::Analytics { analytics }, blocks, false)
            }
        };
        self.panel.open(view);
        self.active_row = row;
        self.focus = Focus::Panel;
        self.copy_notice = None;
        self.needs_redraw = true;
    }

    pub fn close_panel(&mut self) {
        self.panel.close();
        self.active_row = None;
        self.copy_notice = None;
        if self.focus == Focus::Panel {
            self.focus = Focus::Table;
        }
        self.needs_redraw = true;
    }

    /// Toggle expansion of the selected function block, if it has content.
    pub fn toggle_selected_block(&mut self) {
        let Some(view) = self.panel.view.as_mut() else {
            return;
        };
        if let Some(TranscriptBlock::Function(function)) = view.blocks.get_mut(view.selected) {
            function.toggle();
            self.needs_redraw = true;
        }
    }

    /// Copy the selected function payload as compact JSON.
    pub fn copy_selected_block(&mut self) {
        let Some(view) = self.panel.view.as_ref() else {
            return;
        };
        let Some(TranscriptBlock::Function(function)) = view.blocks.get(view.selected) else {
            return;
        };
        let Some(payload) = function.copy_payload() else {
            return;
        };
        match clipboard::copy_text(&payload) {
            Ok(method) => {
                debug!(?method, "copied function payload");
                self.copy_notice = Some(CopyNotice::new(view.selected));
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        self.needs_redraw = true;
    }

    pub fn toggle_metadata(&mut self) {
        self.metadata_expanded = !self.metadata_expanded;
        if let Some(view) = self.panel.view.as_mut() {
            if matches!(view.kind, PanelKind::Chat { .. }) {
                view.metadata_expanded = self.metadata_expanded;
            }
        }
        self.save_prefs();
        self.needs_redraw = true;
    }

    // ========================================================================
    // Table
    // ========================================================================

    pub fn table_border_color(&self) -> Color {
        if self.focus == Focus::Table {
            COLOR_ACCENT
        } else {
            COLOR_BORDER
        }
    }

    /// Sort the batch by the column under the header cursor.
    pub fn sort_by_header_cursor(&mut self) {
        let specs = crate::ui::table::column_specs(&self.visible_columns);
        let Some(spec) = specs.get(self.table.header_cursor) else {
            return;
        };
        let Some(field) = spec.field.clone() else {
            return;
        };
        sort_records(&mut self.records, &field);
        self.table.sort_column = Some(field);
        // Row identity moved; the panel keeps its copy but the row link is
        // no longer meaningful.
        self.active_row = None;
        self.needs_redraw = true;
    }

    pub fn open_column_selector(&mut self) {
        let columns: Vec<String> = self.available_columns.iter().cloned().collect();
        if columns.is_empty() {
            return;
        }
        self.column_selector = Some(ColumnSelector { columns, cursor: 0 });
        self.needs_redraw = true;
    }

    /// Toggle visibility of the column under the selector cursor.
    pub fn toggle_selected_column(&mut self) {
        let Some(selector) = &self.column_selector else {
            return;
        };
        let Some(name) = selector.columns.get(selector.cursor).cloned() else {
            return;
        };
        if !self.visible_columns.remove(&name) {
            self.visible_columns.insert(name.clone());
        }
        if self.table.sort_column.as_deref() == Some(name.as_str())
            && !self.visible_columns.contains(&name)
        {
            self.table.sort_column = None;
        }
        self.table.header_cursor = 0;
        self.save_prefs();
        self.needs_redraw = true;
    }

    pub fn toggle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Logs => Screen::Analytics,
            Screen::Analytics => Screen::Logs,
        };
        // Batches are screen-specific; stale rows would mislead.
        self.records.clear();
        self.available_columns.clear();
        self.table = TableUiState::default();
        self.active_row = None;
        self.error = None;
        self.panel = PanelState::default();
        if self.focus == Focus::Panel {
            self.focus = Focus::Table;
        }
        self.needs_redraw = true;
    }

    // ========================================================================
    // Housekeeping
    // ========================================================================

    /// One timer tick: advance the panel transition, age the copy notice,
    /// and keep redrawing while anything is animating.
    pub fn on_tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        if self.panel.tick() {
            self.needs_redraw = true;
        }
        if self.panel.in_transition() || self.loading {
            self.needs_redraw = true;
        }
        if let Some(notice) = &self.copy_notice {
            if notice.is_expired() {
                self.copy_notice = None;
            }
            self.needs_redraw = true;
        }
    }

    /// Persist the preference-backed slice of state.
    pub fn save_prefs(&self) {
        let Some(store) = &self.prefs_store else {
            return;
        };
        store.save(&Preferences {
            filters: self.filters.clone(),
            visible_columns: self.visible_columns.iter().cloned().collect(),
            api_base_url: self.base_url.clone(),
            metadata_expanded: self.metadata_expanded,
        });
    }
}
