//! Analytics view: fixed-column summary table and simplified transcripts.
//!
//! Operates on the same list endpoint as the logs view but keeps only
//! records carrying an `analytics` payload. The transcript for an
//! analytics record has exactly two visual roles: `user` renders outbound,
//! anything else renders assistant-styled.

use crate::app::App;
use crate::models::{Analytics, ConversationTurn, format_date_flexible};
use super::table::pad_cell;
use super::theme::{COLOR_ACTIVE_ROW, COLOR_DIM, COLOR_TABLE_HEADER};
use super::transcript::{Bubble, BubbleRole, TranscriptBlock};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

/// Fixed column labels of the analytics table.
pub const ANALYTICS_COLUMNS: [&str; 10] = [
    "#",
    "Patient Name",
    "Patient HCN",
    "Patient PN",
    "Appointment Start",
    "Appointment End",
    "Purpose",
    "Reason",
    "Status",
    "Mode",
];

/// Cell values for one analytics record.
pub fn analytics_cells(analytics: &Analytics, ordinal: usize) -> Vec<String> {
    vec![
        ordinal.to_string(),
        analytics.patient_details.name.clone(),
        analytics.patient_details.hcn.clone(),
        analytics.patient_details.pn.clone(),
        format_date_flexible(&analytics.booking_details.slot.start_time),
        format_date_flexible(&analytics.booking_details.slot.end_time),
        analytics.conversation_details.purpose.clone(),
        analytics.booking_details.reason.clone(),
        analytics.status.clone(),
        analytics.mode.clone(),
    ]
}

/// Blocks for the simplified two-role conversation.
pub fn build_conversation_blocks(conversation: &[ConversationTurn]) -> Vec<TranscriptBlock> {
    conversation
        .iter()
        .map(|turn| {
            let role = if turn.role == "user" {
                BubbleRole::User
            } else {
                BubbleRole::Assistant
            };
            TranscriptBlock::Bubble(Bubble {
                role,
                content: turn.content.clone(),
            })
        })
        .collect()
}

/// Render the analytics table.
pub fn render_analytics_table(frame: &mut Frame, area: Rect, app: &mut App) {
    let rows: Vec<Vec<String>> = app
        .records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            record
                .analytics
                .as_ref()
                .map(|analytics| analytics_cells(analytics, index + 1))
        })
        .collect();

    let widths: Vec<usize> = ANALYTICS_COLUMNS
        .iter()
        .enumerate()
        .map(|(col, label)| {
            let mut width = label.width();
            for row in &rows {
                width = width.max(row[col].width());
            }
            width.min(24)
        })
        .collect();

    let title = match rows.len() {
        1 => " Found 1 record ".to_string(),
        n => format!(" Found {} records ", n),
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
    let header: Vec<Span> = ANALYTICS_COLUMNS
        .iter()
        .zip(&widths)
        .map(|(label, width)| {
            Span::styled(
                pad_cell(label, width + 2),
                Style::default()
                    .fg(COLOR_TABLE_HEADER)
                    .add_modifier(Modifier::BOLD),
            )
        })
        .collect();
    lines.push(Line::from(header));

    let visible_rows = inner.height.saturating_sub(1) as usize;
    let first = app
        .table
        .selected
        .saturating_sub(visible_rows.saturating_sub(1))
        .min(rows.len().saturating_sub(visible_rows));
    for (row_index, row) in rows.iter().enumerate().skip(first).take(visible_rows) {
        let is_cursor = row_index == app.table.selected;
        let is_active = app.active_row == Some(row_index);
        let mut row_style = Style::default();
        if is_active {
            row_style = row_style.fg(COLOR_ACTIVE_ROW).add_modifier(Modifier::BOLD);
        }
        if is_cursor {
            row_style = row_style.add_modifier(Modifier::REVERSED);
        }
        let spans: Vec<Span> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| Span::styled(pad_cell(cell, width + 2), row_style))
            .collect();
        lines.push(Line::from(spans));
    }

    if rows.is_empty() {
        lines.push(Line::from(Span::styled(
            "No analytics records. Set a filter and press Enter to fetch.",
            Style::default().fg(COLOR_DIM),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_analytics_cells_layout() {
        let analytics: Analytics = serde_json::from_value(json!({
            "patient_details": { "name": "Jo", "hcn": "H1", "pn": "P1" },
            "booking_details": {
                "reason": "checkup",
                "slot": { "start_time": "2024-01-02T03:04:05Z", "end_time": "" }
            },
            "conversation_details": { "purpose": "booking" },
            "status": "confirmed",
            "mode": "voice"
        }))
        .unwrap();
        let cells = analytics_cells(&analytics, 4);
        assert_eq!(cells.len(), ANALYTICS_COLUMNS.len());
        assert_eq!(cells[0], "4");
        assert_eq!(cells[1], "Jo");
        assert_eq!(cells[4], "2024-01-02 03:04:05");
        assert_eq!(cells[5], "");
        assert_eq!(cells[8], "confirmed");
    }

    #[test]
    fn test_conversation_blocks_two_roles_only() {
        let conversation: Vec<ConversationTurn> = serde_json::from_value(json!([
            { "role": "user", "content": "hi" },
            { "role": "assistant", "content": "hello" },
            { "role": "system", "content": "internal" }
        ]))
        .unwrap();
        let blocks = build_conversation_blocks(&conversation);
        assert_eq!(blocks.len(), 3);
        let roles: Vec<BubbleRole> = blocks
            .iter()
            .map(|b| match b {
                TranscriptBlock::Bubble(bubble) => bubble.role,
                other => panic!("unexpected block {:?}", other),
            })
            .collect();
        // Anything that is not `user` renders assistant-styled.
        assert_eq!(
            roles,
            vec![BubbleRole::User, BubbleRole::Assistant, BubbleRole::Assistant]
        );
    }
}
