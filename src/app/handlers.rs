//! Key dispatch.
//!
//! Overlays (chat-ID prompt, column selector) capture keys first; otherwise
//! dispatch follows the focused region. Ctrl+C quits from anywhere.

use super::{App, ChatIdPrompt, Focus, BASE_URL_FIELD, FORM_FIELD_COUNT};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

impl App {
    /// Handle one key press. Repeat/release events are filtered upstream.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        self.needs_redraw = true;

        if self.chat_prompt.is_some() {
            self.handle_chat_prompt_key(key);
            return;
        }
        if self.column_selector.is_some() {
            self.handle_column_selector_key(key);
            return;
        }

        match self.focus {
            Focus::Filters => self.handle_filters_key(key),
            Focus::Table => self.handle_table_key(key),
            Focus::Panel => self.handle_panel_key(key),
        }
    }

    fn cycle_focus(&mut self, backwards: bool) {
        let order = if self.panel.is_open() {
            vec![Focus::Filters, Focus::Table, Focus::Panel]
        } else {
            vec![Focus::Filters, Focus::Table]
        };
        let current = order
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0);
        let next = if backwards {
            (current + order.len() - 1) % order.len()
        } else {
            (current + 1) % order.len()
        };
        self.focus = order[next];
    }

    // ========================================================================
    // Filter form
    // ========================================================================

    fn handle_filters_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.cycle_focus(false),
            KeyCode::BackTab => self.cycle_focus(true),
            KeyCode::Esc => self.focus = Focus::Table,
            KeyCode::Enter => self.start_list_fetch(),
            KeyCode::Up => {
                self.form_cursor = (self.form_cursor + FORM_FIELD_COUNT - 1) % FORM_FIELD_COUNT;
            }
            KeyCode::Down => {
                self.form_cursor = (self.form_cursor + 1) % FORM_FIELD_COUNT;
            }
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.filters.clear();
                self.save_prefs();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.edit_focused_field(|value| value.clear());
                self.save_prefs();
            }
            KeyCode::Backspace => {
                self.edit_focused_field(|value| {
                    value.pop();
                });
                self.save_prefs();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.edit_focused_field(|value| value.push(c));
                self.save_prefs();
            }
            _ => {}
        }
    }

    fn edit_focused_field(&mut self, edit: impl FnOnce(&mut String)) {
        if self.form_cursor == BASE_URL_FIELD {
            edit(&mut self.base_url);
        } else if let Some(value) = self.filters.field_mut(self.form_cursor) {
            edit(value);
        }
    }

    // ========================================================================
    // Results table
    // ========================================================================

    fn handle_table_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.cycle_focus(false),
            KeyCode::BackTab => self.cycle_focus(true),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.focus = Focus::Filters,
            KeyCode::Down | KeyCode::Char('j') => {
                if self.table.selected + 1 < self.records.len() {
                    self.table.selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.table.selected = self.table.selected.saturating_sub(1);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.table.header_cursor = self.table.header_cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let columns = crate::ui::table::column_specs(&self.visible_columns).len();
                if self.table.header_cursor + 1 < columns {
                    self.table.header_cursor += 1;
                }
            }
            KeyCode::Char('s') => self.sort_by_header_cursor(),
            KeyCode::Enter => self.open_selected(),
            KeyCode::Char('c') => self.open_column_selector(),
            KeyCode::Char('g') => self.chat_prompt = Some(ChatIdPrompt::default()),
            KeyCode::Char('a') => self.toggle_screen(),
            KeyCode::Char('r') => self.start_list_fetch(),
            KeyCode::Esc => {
                if self.panel.is_open() {
                    self.close_panel();
                }
            }
            _ => {}
        }
    }

    // ========================================================================
    // Detail panel
    // ========================================================================

    fn handle_panel_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.cycle_focus(false),
            KeyCode::BackTab => self.cycle_focus(true),
            KeyCode::Esc | KeyCode::Char('q') => self.close_panel(),
            KeyCode::Enter => self.toggle_selected_block(),
            KeyCode::Char('y') => self.copy_selected_block(),
            KeyCode::Char('m') => self.toggle_metadata(),
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(view) = self.panel.view.as_mut() {
                    view.select_next();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(view) = self.panel.view.as_mut() {
                    view.select_previous();
                }
            }
            KeyCode::PageDown => {
                if let Some(view) = self.panel.view.as_mut() {
                    view.page_down();
                }
            }
            KeyCode::PageUp => {
                if let Some(view) = self.panel.view.as_mut() {
                    view.page_up();
                }
            }
            KeyCode::Char('g') => {
                if let Some(view) = self.panel.view.as_mut() {
                    view.scroll_to_top();
                }
            }
            KeyCode::Char('G') => {
                if let Some(view) = self.panel.view.as_mut() {
                    view.scroll_to_bottom();
                }
            }
            _ => {}
        }
    }

    // ========================================================================
    // Overlays
    // ========================================================================

    fn handle_chat_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.chat_prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.chat_prompt = None,
            KeyCode::Enter => {
                let chat_id = prompt.input.clone();
                self.chat_prompt = None;
                self.start_chat_fetch(chat_id);
            }
            KeyCode::Backspace => {
                prompt.input.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                prompt.input.push(c);
            }
            _ => {}
        }
    }

    fn handle_column_selector_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('q') => {
                self.column_selector = None;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(selector) = self.column_selector.as_mut() {
                    if selector.cursor + 1 < selector.columns.len() {
                        selector.cursor += 1;
                    }
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(selector) = self.column_selector.as_mut() {
                    selector.cursor = selector.cursor.saturating_sub(1);
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected_column(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::AppMessage;
    use crate::models::ChatRecord;
    use crate::prefs::Preferences;
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app_with_records(value: serde_json::Value) -> App {
        let mut app = App::new(Preferences::default(), None);
        let records: Vec<ChatRecord> = serde_json::from_value(value).unwrap();
        let generation = app.next_generation();
        app.apply_message(AppMessage::ChatsFetched {
            generation,
            result: Ok(records),
        });
        app
    }

    #[test]
    fn test_ctrl_c_quits_from_any_focus() {
        let mut app = App::new(Preferences::default(), None);
        app.handle_key(ctrl('c'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_typing_edits_focused_filter_field() {
        let mut app = App::new(Preferences::default(), None);
        app.focus = Focus::Filters;
        app.form_cursor = 0;
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(app.filters.agent_id, "a1");
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.filters.agent_id, "a");
    }

    #[test]
    fn test_ctrl_l_clears_all_filters() {
        let mut app = App::new(Preferences::default(), None);
        app.focus = Focus::Filters;
        app.filters.mode = "voice".to_string();
        app.handle_key(ctrl('l'));
        assert!(app.filters.is_empty());
    }

    #[test]
    fn test_base_url_row_is_editable() {
        let mut app = App::new(Preferences::default(), None);
        app.focus = Focus::Filters;
        app.form_cursor = BASE_URL_FIELD;
        app.handle_key(ctrl('u'));
        assert_eq!(app.base_url, "");
        app.handle_key(key(KeyCode::Char('x')));
        assert_eq!(app.base_url, "x");
    }

    #[test]
    fn test_fetch_with_empty_filters_shows_error_inline() {
        let mut app = App::new(Preferences::default(), None);
        app.focus = Focus::Filters;
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.loading);
        assert_eq!(
            app.error.as_deref(),
            Some("please provide at least one filter value")
        );
    }

    #[test]
    fn test_table_cursor_clamps_at_ends() {
        let mut app = app_with_records(json!([{}, {}]));
        app.focus = Focus::Table;
        app.handle_key(key(KeyCode::Char('k')));
        assert_eq!(app.table.selected, 0);
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.table.selected, 1);
    }

    #[test]
    fn test_tab_cycles_focus_and_skips_closed_panel() {
        let mut app = app_with_records(json!([{}]));
        app.focus = Focus::Filters;
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Table);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Filters);
        app.focus = Focus::Table;
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.focus, Focus::Panel);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Filters);
    }

    #[test]
    fn test_panel_escape_closes_and_returns_to_table() {
        let mut app = app_with_records(json!([
            { "history": [ { "role": "user", "content": "hi" } ] }
        ]));
        app.focus = Focus::Table;
        app.handle_key(key(KeyCode::Enter));
        assert!(app.panel.is_open());
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.panel.is_open());
        assert_eq!(app.focus, Focus::Table);
    }

    #[test]
    fn test_enter_toggles_function_block() {
        let mut app = app_with_records(json!([{
            "history": [
                { "role": "function", "name": "lookup", "content": { "arguments": { "q": 1 } } }
            ]
        }]));
        app.focus = Focus::Table;
        app.handle_key(key(KeyCode::Enter));
        let expanded = |app: &App| match &app.panel.view.as_ref().unwrap().blocks[0] {
            crate::ui::transcript::TranscriptBlock::Function(f) => f.expanded,
            _ => panic!("expected a function block"),
        };
        assert!(!expanded(&app));
        app.handle_key(key(KeyCode::Enter));
        assert!(expanded(&app));
        app.handle_key(key(KeyCode::Enter));
        assert!(!expanded(&app));
    }

    #[test]
    fn test_chat_prompt_captures_typing_and_escape() {
        let mut app = app_with_records(json!([{}]));
        app.focus = Focus::Table;
        app.handle_key(key(KeyCode::Char('g')));
        assert!(app.chat_prompt.is_some());
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Char('b')));
        assert_eq!(app.chat_prompt.as_ref().unwrap().input, "ab");
        // While the prompt is open the table must not see 'j'.
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.table.selected, 0);
        app.handle_key(key(KeyCode::Esc));
        assert!(app.chat_prompt.is_none());
    }

    #[test]
    fn test_column_selector_toggle_with_space() {
        let mut app = app_with_records(json!([{ "mode": "voice" }]));
        app.focus = Focus::Table;
        app.handle_key(key(KeyCode::Char('c')));
        assert!(app.column_selector.is_some());
        let first = app.column_selector.as_ref().unwrap().columns[0].clone();
        let was_visible = app.visible_columns.contains(&first);
        app.handle_key(key(KeyCode::Char(' ')));
        assert_ne!(app.visible_columns.contains(&first), was_visible);
        app.handle_key(key(KeyCode::Esc));
        assert!(app.column_selector.is_none());
    }

    #[test]
    fn test_screen_toggle_key() {
        let mut app = app_with_records(json!([{}]));
        app.focus = Focus::Table;
        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(app.screen, super::super::Screen::Analytics);
        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(app.screen, super::super::Screen::Logs);
    }
}
