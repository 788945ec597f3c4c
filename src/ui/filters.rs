//! Filter form: six filter fields plus the API base URL.

use crate::app::{App, Focus, BASE_URL_FIELD};
use crate::query::FILTER_FIELDS;
use super::theme::{COLOR_ACCENT, COLOR_BORDER, COLOR_DIM};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

/// Render one labeled input. The focused field shows a cursor bar and the
/// value tail is kept visible when it overflows.
fn field_line(label: &str, value: &str, focused: bool, width: usize) -> Line<'static> {
    let label_text = format!("{}: ", label);
    let available = width.saturating_sub(label_text.width() + 1);
    let mut shown: String = value.to_string();
    while shown.width() > available && !shown.is_empty() {
        shown.remove(0);
    }
    let value_style = if focused {
        Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(COLOR_ACCENT)
    };
    let mut spans = vec![
        Span::styled(
            label_text,
            if focused {
                Style::default().fg(COLOR_ACCENT)
            } else {
                Style::default().fg(COLOR_DIM)
            },
        ),
        Span::styled(shown, value_style),
    ];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(COLOR_ACCENT)));
    }
    Line::from(spans)
}

/// Render the filter form block: two rows of three filters, then the base
/// URL on its own row.
pub fn render_filter_form(frame: &mut Frame, area: Rect, app: &App) {
    let focused_form = app.focus == Focus::Filters;
    let border = if focused_form { COLOR_ACCENT } else { COLOR_BORDER };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Filters (Enter: fetch, Ctrl+L: clear) ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 3 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    for (row_index, row_area) in rows.iter().take(2).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(33),
                Constraint::Percentage(34),
            ])
            .split(*row_area);
        for (col_index, cell) in cells.iter().enumerate() {
            let field_index = row_index * 3 + col_index;
            let (_, label) = FILTER_FIELDS[field_index];
            let value = app.filters.field(field_index).unwrap_or_default();
            let focused = focused_form && app.form_cursor == field_index;
            frame.render_widget(
                Paragraph::new(field_line(label, value, focused, cell.width as usize)),
                *cell,
            );
        }
    }

    let focused = focused_form && app.form_cursor == BASE_URL_FIELD;
    frame.render_widget(
        Paragraph::new(field_line(
            "API Base URL",
            &app.base_url,
            focused,
            rows[2].width as usize,
        )),
        rows[2],
    );
}
