//! JSON pretty-printing and syntax highlighting for function payloads.
//!
//! String payloads are tried as JSON first: on success they are
//! pretty-printed with 2-space indentation and highlighted, on failure they
//! render as plain text with no highlighting. Highlighting is
//! presentation-only span styling - the text content is never altered, and
//! copy-to-clipboard always serializes the original payload compactly.

use super::theme::{
    COLOR_JSON_BOOL, COLOR_JSON_DEFAULT, COLOR_JSON_KEY, COLOR_JSON_NULL, COLOR_JSON_NUMBER,
    COLOR_JSON_STRING,
};
use once_cell::sync::Lazy;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use regex::Regex;
use serde_json::Value;

/// Matches one highlightable token: a string (optionally a key, i.e.
/// followed by a colon), a boolean, null, or a number including scientific
/// notation.
static JSON_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"("(\\u[a-zA-Z0-9]{4}|\\[^u]|[^\\"])*"(\s*:)?|\b(?:true|false|null)\b|-?\d+(?:\.\d*)?(?:[eE][+-]?\d+)?)"#,
    )
    .expect("JSON token regex must compile")
});

/// Text of a single pane, either highlightable JSON or opaque plain text.
#[derive(Debug, Clone, PartialEq)]
pub enum PaneText {
    Json(String),
    Plain(String),
}

impl PaneText {
    /// The raw text, regardless of kind.
    pub fn as_str(&self) -> &str {
        match self {
            PaneText::Json(s) | PaneText::Plain(s) => s,
        }
    }
}

/// Prepare a payload value for display.
pub fn format_payload(value: &Value) -> PaneText {
    match value {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed) => PaneText::Json(pretty(&parsed)),
            Err(_) => PaneText::Plain(s.clone()),
        },
        other => PaneText::Json(pretty(other)),
    }
}

/// Compact serialization used for clipboard copy. Byte-identical to a
/// direct compact serialization of the stored payload, independent of how
/// it was pretty-printed for display.
pub fn compact_payload(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Render pane text to styled lines. Plain text gets the default style
/// only; JSON gets per-token highlighting.
pub fn pane_lines(text: &PaneText) -> Vec<Line<'static>> {
    match text {
        PaneText::Plain(s) => s
            .lines()
            .map(|line| {
                Line::from(Span::styled(
                    line.to_string(),
                    Style::default().fg(COLOR_JSON_DEFAULT),
                ))
            })
            .collect(),
        PaneText::Json(s) => s.lines().map(highlight_json_line).collect(),
    }
}

/// Highlight one line of pretty-printed JSON into styled spans.
pub fn highlight_json_line(line: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut cursor = 0;
    for token in JSON_TOKEN.find_iter(line) {
        if token.start() > cursor {
            spans.push(Span::styled(
                line[cursor..token.start()].to_string(),
                Style::default().fg(COLOR_JSON_DEFAULT),
            ));
        }
        spans.push(Span::styled(
            token.as_str().to_string(),
            token_style(token.as_str()),
        ));
        cursor = token.end();
    }
    if cursor < line.len() {
        spans.push(Span::styled(
            line[cursor..].to_string(),
            Style::default().fg(COLOR_JSON_DEFAULT),
        ));
    }
    if spans.is_empty() {
        spans.push(Span::raw(String::new()));
    }
    Line::from(spans)
}

fn token_style(token: &str) -> Style {
    let color = if token.starts_with('"') {
        if token.trim_end().ends_with(':') {
            COLOR_JSON_KEY
        } else {
            COLOR_JSON_STRING
        }
    } else if token == "true" || token == "false" {
        COLOR_JSON_BOOL
    } else if token == "null" {
        COLOR_JSON_NULL
    } else {
        COLOR_JSON_NUMBER
    };
    Style::default().fg(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_object_payload_pretty_prints_two_space() {
        let text = format_payload(&json!({ "a": 1 }));
        assert_eq!(text, PaneText::Json("{\n  \"a\": 1\n}".to_string()));
    }

    #[test]
    fn test_string_payload_parsed_as_json() {
        let text = format_payload(&Value::String(r#"{"ok":true}"#.to_string()));
        assert_eq!(text, PaneText::Json("{\n  \"ok\": true\n}".to_string()));
    }

    #[test]
    fn test_string_payload_falls_back_to_plain() {
        let text = format_payload(&Value::String("just words".to_string()));
        assert_eq!(text, PaneText::Plain("just words".to_string()));
    }

    #[test]
    fn test_plain_text_is_not_highlighted() {
        let lines = pane_lines(&PaneText::Plain("true null 42".to_string()));
        assert_eq!(lines.len(), 1);
        // A single span carrying the default style, literals untouched.
        assert_eq!(lines[0].spans.len(), 1);
        assert_eq!(line_text(&lines[0]), "true null 42");
    }

    #[test]
    fn test_highlighting_preserves_text_content() {
        let pretty = "{\n  \"key\": \"value\",\n  \"n\": -1.5e3,\n  \"b\": false,\n  \"z\": null\n}";
        for source_line in pretty.lines() {
            assert_eq!(line_text(&highlight_json_line(source_line)), source_line);
        }
    }

    #[test]
    fn test_key_and_string_get_distinct_styles() {
        let line = highlight_json_line(r#"  "key": "value""#);
        let key = line
            .spans
            .iter()
            .find(|s| s.content.contains("\"key\""))
            .unwrap();
        let value = line
            .spans
            .iter()
            .find(|s| s.content.contains("\"value\""))
            .unwrap();
        assert_eq!(key.style.fg, Some(COLOR_JSON_KEY));
        assert_eq!(value.style.fg, Some(COLOR_JSON_STRING));
    }

    #[test]
    fn test_literal_styles() {
        let line = highlight_json_line("[true, null, 6.02e23]");
        let styles: Vec<_> = line.spans.iter().map(|s| s.style.fg).collect();
        assert!(styles.contains(&Some(COLOR_JSON_BOOL)));
        assert!(styles.contains(&Some(COLOR_JSON_NULL)));
        assert!(styles.contains(&Some(COLOR_JSON_NUMBER)));
    }

    #[test]
    fn test_compact_payload_round_trip() {
        let payload = json!({ "arguments": { "x": 1 }, "function_error": "boom" });
        let compact = compact_payload(&payload);
        // Display pretty-printing must not affect the copy serialization.
        let _ = format_payload(&payload);
        assert_eq!(compact, serde_json::to_string(&payload).unwrap());
        assert_eq!(
            serde_json::from_str::<Value>(&compact).unwrap(),
            payload
        );
    }
}
