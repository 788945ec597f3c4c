//! Terminal rendering for the dashboard.
//!
//! Layout: a main column (header, filter form, status line, results table,
//! footer) with the detail panel sliding in from the left and pushing the
//! main column right while it is visible.

pub mod analytics;
pub mod filters;
pub mod json;
pub mod panel;
pub mod table;
pub mod theme;
pub mod transcript;

use crate::app::{App, Focus, Screen};
use crate::models::ChatRecord;
use panel::PanelKind;
use theme::{
    COLOR_ACCENT, COLOR_BORDER, COLOR_DIM, COLOR_ERROR, COLOR_HEADER, COLOR_LOADING,
    COLOR_PANE_LABEL,
};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Draw one frame.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // The panel occupies up to half the terminal; its width animates during
    // open/close transitions and the main column shrinks to make room.
    let panel_target = area.width / 2;
    let panel_width = if app.panel.is_visible() {
        app.panel.width(panel_target).min(area.width.saturating_sub(20))
    } else {
        0
    };
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(panel_width), Constraint::Min(0)])
        .split(area);
    let (panel_area, main_area) = (chunks[0], chunks[1]);

    render_main(frame, main_area, app);
    if panel_width > 0 {
        render_panel(frame, panel_area, app);
    }

    if app.column_selector.is_some() {
        let popup = centered_rect(main_area, 40, 14);
        table::render_column_selector(frame, popup, app);
    }
    if app.chat_prompt.is_some() {
        let popup = centered_rect(main_area, 50, 3);
        render_chat_prompt(frame, popup, app);
    }
}

fn render_main(frame: &mut Frame, area: Rect, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, rows[0], app);
    filters::render_filter_form(frame, rows[1], app);
    render_status(frame, rows[2], app);
    match app.screen {
        Screen::Logs => table::render_table(frame, rows[3], app),
        Screen::Analytics => analytics::render_analytics_table(frame, rows[3], app),
    }
    render_footer(frame, rows[4], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let screen_name = match app.screen {
        Screen::Logs => "Logs",
        Screen::Analytics => "Analytics",
    };
    let line = Line::from(vec![
        Span::styled(
            " chatscope ",
            Style::default()
                .fg(COLOR_HEADER)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("· {} ", screen_name),
            Style::default().fg(COLOR_ACCENT),
        ),
        Span::styled(
            format!("· {}", app.base_url),
            Style::default().fg(COLOR_DIM),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let line = if app.loading {
        let spinner = SPINNER_FRAMES[app.tick_count as usize % SPINNER_FRAMES.len()];
        Line::from(Span::styled(
            format!(" {} Loading...", spinner),
            Style::default().fg(COLOR_LOADING),
        ))
    } else if let Some(error) = &app.error {
        Line::from(Span::styled(
            format!(" {}", error),
            Style::default().fg(COLOR_ERROR),
        ))
    } else {
        Line::from(Span::styled(" ", Style::default()))
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let hints = if app.column_selector.is_some() {
        " j/k move · space toggle · c/esc close"
    } else if app.chat_prompt.is_some() {
        " enter fetch · esc cancel"
    } else {
        match app.focus {
            Focus::Filters => " enter fetch · tab table · ctrl+l clear · ctrl+c quit",
            Focus::Table => {
                " enter view · ←/→ + s sort · c columns · g chat id · a screen · r refresh · q quit"
            }
            Focus::Panel => " j/k select · enter expand · y copy · m metadata · g/G ends · esc close",
        }
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hints,
            Style::default().fg(COLOR_DIM),
        ))),
        area,
    );
}

// ============================================================================
// Detail panel
// ============================================================================

fn meta_value(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "N/A".to_string(),
    }
}

fn metadata_lines(record: &ChatRecord, expanded: bool) -> Vec<Line<'static>> {
    if !expanded {
        return vec![Line::from(Span::styled(
            "▸ Metadata (m)",
            Style::default().fg(COLOR_DIM),
        ))];
    }
    let pairs = [
        ("Chat ID", record.id.as_deref()),
        ("RID", record.rid.as_deref()),
        ("Agent ID", record.agent_id.as_deref()),
        ("Partner ID", record.partner_id.as_deref()),
        ("Mode", record.mode.as_deref()),
        ("Assigned Phone", record.assigned_phone_number.as_deref()),
        ("Caller Phone", record.caller_phone.as_deref()),
        ("Run ID", record.run_id.as_deref()),
    ];
    let timestamp = record.display_timestamp();
    let mut lines = vec![Line::from(Span::styled(
        "▾ Metadata (m)",
        Style::default().fg(COLOR_DIM),
    ))];
    for (label, value) in pairs {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {}: ", label),
                Style::default().fg(COLOR_PANE_LABEL),
            ),
            Span::styled(meta_value(value), Style::default().fg(COLOR_ACCENT)),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("  Timestamp: ", Style::default().fg(COLOR_PANE_LABEL)),
        Span::styled(
            meta_value(Some(timestamp.as_str())),
            Style::default().fg(COLOR_ACCENT),
        ),
    ]));
    lines
}

fn render_panel(frame: &mut Frame, area: Rect, app: &mut App) {
    let title = match app.panel.view.as_ref().map(|v| &v.kind) {
        Some(PanelKind::Analytics { .. }) => " Conversation ",
        _ => " Chat History ",
    };
    let border = if app.focus == Focus::Panel {
        COLOR_ACCENT
    } else {
        COLOR_BORDER
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    if inner.width < 4 || inner.height < 2 {
        return;
    }

    let notice = app.copy_notice.clone();
    let Some(view) = app.panel.view.as_mut() else {
        return;
    };

    let meta: Vec<Line> = match &view.kind {
        PanelKind::Chat { record } => metadata_lines(record, view.metadata_expanded),
        PanelKind::Analytics { .. } => Vec::new(),
    };
    let meta_height = (meta.len() as u16).min(inner.height.saturating_sub(1));
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(meta_height), Constraint::Min(1)])
        .split(inner);
    if meta_height > 0 {
        frame.render_widget(Paragraph::new(meta), sections[0]);
    }
    let transcript_area = sections[1];

    let (lines, ranges) = transcript::render_lines(
        &view.blocks,
        transcript_area.width,
        Some(view.selected),
        notice.as_ref(),
    );
    view.content_height = lines.len();
    view.viewport_height = transcript_area.height as usize;
    view.block_ranges = ranges;
    view.scroll = view.scroll.min(view.max_scroll());

    frame.render_widget(
        Paragraph::new(lines).scroll((view.scroll as u16, 0)),
        transcript_area,
    );

    // Scroll-to-bottom affordance, hidden when already near the bottom.
    if !view.at_bottom() && transcript_area.width > 14 {
        let tag = " ↓ bottom (G) ";
        let tag_area = Rect {
            x: transcript_area.right().saturating_sub(tag.len() as u16 + 1),
            y: transcript_area.bottom().saturating_sub(1),
            width: tag.len() as u16,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(tag, Style::default().fg(COLOR_DIM))),
            tag_area,
        );
    }
}

fn render_chat_prompt(frame: &mut Frame, area: Rect, app: &App) {
    let Some(prompt) = &app.chat_prompt else {
        return;
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_ACCENT))
        .title(" Open chat by ID ");
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(prompt.input.clone(), Style::default().fg(COLOR_ACCENT)),
            Span::styled("▏", Style::default().fg(COLOR_ACCENT)),
        ])),
        inner,
    );
}

/// Center a fixed-size popup inside `area`, clamped to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
