//! Results table: fixed leading columns plus user-toggled dynamic columns.
//!
//! Rows render in batch order until the user sorts explicitly; sorting is
//! in place and persists until the next fetch or the next sort. The active
//! row (open in the panel) is highlighted distinctly from the cursor row.

use crate::app::App;
use crate::models::ChatRecord;
use super::theme::{
    COLOR_ACCENT, COLOR_ACTIVE_ROW, COLOR_BORDER, COLOR_DIM, COLOR_SORT_CURSOR,
    COLOR_TABLE_HEADER,
};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use std::collections::BTreeSet;
use unicode_width::UnicodeWidthStr;

/// One table column: display label plus the record field it reads, if any.
/// Field-less columns (`#`, `Messages`) are derived and not sortable.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub label: String,
    pub field: Option<String>,
}

impl ColumnSpec {
    pub fn sortable(&self) -> bool {
        self.field.is_some()
    }
}

/// Convert a snake_case field name to its display label.
pub fn format_column_label(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Column layout for a visible-column set: ordinal, timestamp (when
/// visible), derived message count, then the remaining visible columns in
/// lexicographic order.
pub fn column_specs(visible: &BTreeSet<String>) -> Vec<ColumnSpec> {
    let mut specs = vec![ColumnSpec {
        label: "#".to_string(),
        field: None,
    }];
    if visible.contains("timestamp") {
        specs.push(ColumnSpec {
            label: "Timestamp".to_string(),
            field: Some("timestamp".to_string()),
        });
    }
    specs.push(ColumnSpec {
        label: "Messages".to_string(),
        field: None,
    });
    for name in visible {
        if name != "timestamp" {
            specs.push(ColumnSpec {
                label: format_column_label(name),
                field: Some(name.clone()),
            });
        }
    }
    specs
}

/// Sort the batch in place, ascending, by the given column. `timestamp`
/// compares chronologically with unparsable values first; everything else
/// compares display strings lexicographically.
pub fn sort_records(records: &mut [ChatRecord], column: &str) {
    if column == "timestamp" {
        records.sort_by_key(|record| record.parsed_timestamp());
    } else {
        records.sort_by(|a, b| a.field(column).cmp(&b.field(column)));
    }
}

/// Cell text for a record under a column.
pub fn cell_value(record: &ChatRecord, ordinal: usize, spec: &ColumnSpec) -> String {
    match (&spec.field, spec.label.as_str()) {
        (None, "#") => ordinal.to_string(),
        (None, _) => record.message_count().to_string(),
        (Some(field), _) if field == "timestamp" => record.display_timestamp(),
        (Some(field), _) => record.field(field),
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Pad or truncate text to an exact display width.
pub fn pad_cell(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

fn column_width(spec: &ColumnSpec, records: &[ChatRecord]) -> usize {
    let mut width = spec.label.width();
    for (index, record) in records.iter().enumerate() {
        width = width.max(cell_value(record, index + 1, spec).width());
    }
    width.min(32)
}

/// Render the logs table with header cursor, cursor row and active row.
pub fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    let specs = column_specs(&app.visible_columns);
    let widths: Vec<usize> = specs
        .iter()
        .map(|spec| column_width(spec, &app.records))
        .collect();

    let title = match app.records.len() {
        1 => " Found 1 chat ".to_string(),
        n => format!(" Found {} chats ", n),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.table_border_color()))
        .title(Span::styled(title, Style::default().fg(COLOR_TABLE_HEADER)));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 2 {
        return;
    }

    let mut lines: Vec<Line> = Vec::new();

    // Header row with the sort cursor.
    let mut header_spans: Vec<Span> = Vec::new();
    for (index, (spec, width)) in specs.iter().zip(&widths).enumerate() {
        let mut style = Style::default()
            .fg(COLOR_TABLE_HEADER)
            .add_modifier(Modifier::BOLD);
        if index == app.table.header_cursor && spec.sortable() {
            style = Style::default()
                .fg(COLOR_SORT_CURSOR)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        let sorted_marker = if spec.field.as_deref() == app.table.sort_column.as_deref()
            && spec.sortable()
        {
            "↑"
        } else {
            ""
        };
        header_spans.push(Span::styled(
            pad_cell(&format!("{}{}", spec.label, sorted_marker), width + 2),
            style,
        ));
    }
    lines.push(Line::from(header_spans));

    // Visible window of rows around the cursor.
    let visible_rows = inner.height.saturating_sub(1) as usize;
    let first = app
        .table
        .selected
        .saturating_sub(visible_rows.saturating_sub(1))
        .min(app.records.len().saturating_sub(visible_rows));
    for (row_index, record) in app
        .records
        .iter()
        .enumerate()
        .skip(first)
        .take(visible_rows)
    {
        let is_cursor = row_index == app.table.selected;
        let is_active = app.active_row == Some(row_index);
        let mut row_style = Style::default();
        if is_active {
            row_style = row_style.fg(COLOR_ACTIVE_ROW).add_modifier(Modifier::BOLD);
        }
        if is_cursor {
            row_style = row_style.add_modifier(Modifier::REVERSED);
        }
        let spans: Vec<Span> = specs
            .iter()
            .zip(&widths)
            .map(|(spec, width)| {
                Span::styled(
                    pad_cell(&cell_value(record, row_index + 1, spec), width + 2),
                    row_style,
                )
            })
            .collect();
        lines.push(Line::from(spans));
    }

    if app.records.is_empty() {
        lines.push(Line::from(Span::styled(
            "No results. Set a filter and press Enter to fetch.",
            Style::default().fg(COLOR_DIM),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the column-selector overlay listing discovered columns.
pub fn render_column_selector(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_ACCENT))
        .title(" Columns (space: toggle, c/esc: close) ");
    let inner = block.inner(area);
    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(block, area);

    let Some(selector) = &app.column_selector else {
        return;
    };
    let lines: Vec<Line> = selector
        .columns
        .iter()
        .enumerate()
        .skip(selector.cursor.saturating_sub(inner.height.saturating_sub(1) as usize))
        .take(inner.height as usize)
        .map(|(index, name)| {
            let checked = if app.visible_columns.contains(name) {
                "[x]"
            } else {
                "[ ]"
            };
            let mut style = Style::default().fg(COLOR_BORDER);
            if app.visible_columns.contains(name) {
                style = Style::default().fg(COLOR_ACCENT);
            }
            if index == selector.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::from(Span::styled(
                format!(" {} {} ", checked, format_column_label(name)),
                style,
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}
