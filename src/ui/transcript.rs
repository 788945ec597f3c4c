//! Transcript blocks built from a record's ordered message history.
//!
//! One renderable block per message, input order preserved - no reordering,
//! no deduplication. User bubbles render right-aligned, everything else
//! left-aligned; function messages become collapsible blocks whose JSON
//! panes are produced by [`super::json`]. Unknown roles produce no block.

use crate::clipboard::CopyNotice;
use crate::models::Message;
use super::json::{self, PaneText};
use super::theme::{
    COLOR_ACCENT, COLOR_AGENT, COLOR_ASSISTANT, COLOR_COPIED, COLOR_DIM, COLOR_FILLER,
    COLOR_FUNCTION, COLOR_PANE_LABEL, COLOR_USER,
};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use serde_json::Value;
use unicode_width::UnicodeWidthChar;

/// Visual style class for a plain message bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleRole {
    User,
    Assistant,
    Agent,
    Filler,
}

/// A plain text bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub role: BubbleRole,
    pub content: String,
}

/// One labeled JSON pane inside an expanded function block.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPane {
    /// `Arguments` / `Response`, or `None` for the generic pane.
    pub label: Option<&'static str>,
    pub text: PaneText,
}

/// A collapsible function-call block. The block owns its payload directly;
/// copy serializes it compactly without any shared lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBlock {
    pub name: String,
    pub payload: Option<Value>,
    pub panes: Vec<JsonPane>,
    /// Collapsed by default.
    pub expanded: bool,
}

impl FunctionBlock {
    /// A block with no content renders a placeholder and cannot expand.
    pub fn expandable(&self) -> bool {
        !self.panes.is_empty()
    }

    pub fn toggle(&mut self) {
        if self.expandable() {
            self.expanded = !self.expanded;
        }
    }

    /// Compact JSON for the clipboard; only blocks with content are
    /// copyable.
    pub fn copy_payload(&self) -> Option<String> {
        if !self.expandable() {
            return None;
        }
        self.payload.as_ref().map(json::compact_payload)
    }
}

/// One renderable transcript entry.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptBlock {
    Bubble(Bubble),
    Function(FunctionBlock),
}

/// Build the ordered block list for a message history. Unknown roles are
/// skipped - an explicit no-op, not an error.
pub fn build_blocks(history: &[Message]) -> Vec<TranscriptBlock> {
    history
        .iter()
        .filter_map(|message| match message {
            Message::User { content } => Some(TranscriptBlock::Bubble(Bubble {
                role: BubbleRole::User,
                content: content.clone(),
            })),
            Message::Assistant { content } => Some(TranscriptBlock::Bubble(Bubble {
                role: BubbleRole::Assistant,
                content: content.clone(),
            })),
            Message::AgentMessage { content } => Some(TranscriptBlock::Bubble(Bubble {
                role: BubbleRole::Agent,
                content: content.clone(),
            })),
            Message::Filler { content } => Some(TranscriptBlock::Bubble(Bubble {
                role: BubbleRole::Filler,
                content: content.clone(),
            })),
            Message::Function { name, payload } => {
                Some(TranscriptBlock::Function(function_block(name, payload)))
            }
            Message::Unknown { .. } => None,
        })
        .collect()
}

fn function_block(name: &str, payload: &Option<Value>) -> FunctionBlock {
    let panes = payload.as_ref().map(function_panes).unwrap_or_default();
    FunctionBlock {
        name: name.to_string(),
        payload: payload.clone(),
        panes,
        expanded: false,
    }
}

/// True when the payload is a non-empty object or non-empty array; strings,
/// numbers and empty containers count as "no content".
pub fn payload_has_content(payload: &Value) -> bool {
    match payload {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

/// Loose truthiness for payload fields: empty strings, zero and null all
/// count as absent when deciding whether `arguments` / `function_error`
/// are present.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Decide which panes a function payload renders:
/// arguments + function_error => Arguments and Response panes;
/// arguments alone => Arguments pane; anything else => one generic pane.
fn function_panes(payload: &Value) -> Vec<JsonPane> {
    if !payload_has_content(payload) {
        return Vec::new();
    }
    let object = payload.as_object();
    let arguments = object
        .and_then(|map| map.get("arguments"))
        .filter(|v| is_truthy(v));
    let error = object
        .and_then(|map| map.get("function_error"))
        .filter(|v| is_truthy(v));
    match (arguments, error) {
        (Some(args), Some(err)) => vec![
            JsonPane {
                label: Some("Arguments"),
                text: json::format_payload(args),
            },
            JsonPane {
                label: Some("Response"),
                text: json::format_payload(err),
            },
        ],
        (Some(args), None) => vec![JsonPane {
            label: Some("Arguments"),
            text: json::format_payload(args),
        }],
        _ => vec![JsonPane {
            label: None,
            text: json::format_payload(payload),
        }],
    }
}

// ============================================================================
// Line rendering
// ============================================================================

fn bubble_style(role: BubbleRole) -> Style {
    match role {
        BubbleRole::User => Style::default().fg(COLOR_USER),
        BubbleRole::Assistant => Style::default().fg(COLOR_ASSISTANT),
        BubbleRole::Agent => Style::default().fg(COLOR_AGENT),
        BubbleRole::Filler => Style::default()
            .fg(COLOR_FILLER)
            .add_modifier(Modifier::ITALIC),
    }
}

/// Render all blocks to display lines, returning the lines together with
/// each block's `(first_line, line_count)` range so selection can follow
/// scroll position.
pub fn render_lines(
    blocks: &[TranscriptBlock],
    width: u16,
    selected: Option<usize>,
    notice: Option<&CopyNotice>,
) -> (Vec<Line<'static>>, Vec<(usize, usize)>) {
    let width = width.max(10) as usize;
    let bubble_width = (width * 2 / 3).max(8);
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut ranges: Vec<(usize, usize)> = Vec::new();

    for (index, block) in blocks.iter().enumerate() {
        let start = lines.len();
        let is_selected = selected == Some(index);
        match block {
            TranscriptBlock::Bubble(bubble) => {
                render_bubble(&mut lines, bubble, bubble_width, is_selected);
            }
            TranscriptBlock::Function(function) => {
                let block_notice =
                    notice.filter(|n| n.block_index == index && !n.is_expired());
                render_function(&mut lines, function, is_selected, block_notice);
            }
        }
        lines.push(Line::raw(""));
        ranges.push((start, lines.len() - start));
    }

    (lines, ranges)
}

fn render_bubble(lines: &mut Vec<Line<'static>>, bubble: &Bubble, width: usize, selected: bool) {
    let mut style = bubble_style(bubble.role);
    if selected {
        style = style.add_modifier(Modifier::BOLD);
    }
    let wrapped = wrap_text(&bubble.content, width);
    for (i, text) in wrapped.into_iter().enumerate() {
        let marker = if selected && i == 0 { "› " } else { "" };
        let line = Line::from(vec![
            Span::styled(marker.to_string(), Style::default().fg(COLOR_ACCENT)),
            Span::styled(text, style),
        ]);
        if bubble.role == BubbleRole::User {
            lines.push(line.right_aligned());
        } else {
            lines.push(line);
        }
    }
}

fn render_function(
    lines: &mut Vec<Line<'static>>,
    function: &FunctionBlock,
    selected: bool,
    notice: Option<&CopyNotice>,
) {
    let arrow = if function.expanded { "▾" } else { "▸" };
    let mut title_style = Style::default().fg(COLOR_FUNCTION);
    if selected {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }
    let mut spans = vec![
        Span::styled(
            if selected { "› " } else { "" }.to_string(),
            Style::default().fg(COLOR_ACCENT),
        ),
        Span::styled(format!("{} Function: {}", arrow, function.name), title_style),
    ];
    if let Some(notice) = notice {
        let mut copied_style = Style::default().fg(COLOR_COPIED);
        if notice.is_fading() {
            copied_style = copied_style.add_modifier(Modifier::DIM);
        }
        spans.push(Span::styled("  Copied!".to_string(), copied_style));
    }
    lines.push(Line::from(spans));

    if !function.expandable() {
        lines.push(Line::from(Span::styled(
            "  No content available".to_string(),
            Style::default().fg(COLOR_DIM),
        )));
        return;
    }

    if function.expanded {
        for pane in &function.panes {
            if let Some(label) = pane.label {
                lines.push(Line::from(Span::styled(
                    format!("  {}:", label),
                    Style::default()
                        .fg(COLOR_PANE_LABEL)
                        .add_modifier(Modifier::BOLD),
                )));
            }
            for mut line in json::pane_lines(&pane.text) {
                line.spans.insert(0, Span::raw("    "));
                lines.push(line);
            }
        }
    }
}

/// Greedy word wrap by display width, hard-splitting words longer than the
/// limit.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out: Vec<String> = Vec::new();
    for source_line in text.lines() {
        let mut current = String::new();
        let mut current_width = 0;
        for word in source_line.split_whitespace() {
            let word_width: usize = word.chars().map(|c| c.width().unwrap_or(0)).sum();
            let sep = usize::from(!current.is_empty());
            if current_width + sep + word_width <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += sep + word_width;
                continue;
            }
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
            } else {
                // Hard split an oversized word.
                let mut chunk = String::new();
                let mut chunk_width = 0;
                for c in word.chars() {
                    let w = c.width().unwrap_or(0);
                    if chunk_width + w > width && !chunk.is_empty() {
                        out.push(std::mem::take(&mut chunk));
                        chunk_width = 0;
                    }
                    chunk.push(c);
                    chunk_width += w;
                }
                current = chunk;
                current_width = chunk_width;
            }
        }
        out.push(current);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}
