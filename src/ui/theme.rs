//! Color theme constants for the chatscope UI.
//!
//! Minimal dark palette; the JSON colors mirror the highlight categories
//! (keys, strings, booleans, numbers, null).

use ratatui::style::Color;

// ============================================================================
// Chrome
// ============================================================================

/// Primary border color.
pub const COLOR_BORDER: Color = Color::DarkGray;

/// Accent color for the focused element.
pub const COLOR_ACCENT: Color = Color::White;

/// Header/title text.
pub const COLOR_HEADER: Color = Color::White;

/// Dim text for secondary info.
pub const COLOR_DIM: Color = Color::DarkGray;

/// Error banner text.
pub const COLOR_ERROR: Color = Color::Red;

/// Loading spinner.
pub const COLOR_LOADING: Color = Color::LightGreen;

// ============================================================================
// Table
// ============================================================================

/// Column header text.
pub const COLOR_TABLE_HEADER: Color = Color::Gray;

/// Header cell currently under the sort cursor.
pub const COLOR_SORT_CURSOR: Color = Color::LightCyan;

/// Row whose transcript is open in the panel.
pub const COLOR_ACTIVE_ROW: Color = Color::LightBlue;

// ============================================================================
// Transcript bubbles
// ============================================================================

/// Outbound (user) bubble text.
pub const COLOR_USER: Color = Color::LightCyan;

/// Inbound (assistant) bubble text.
pub const COLOR_ASSISTANT: Color = Color::White;

/// Agent broadcast bubble text.
pub const COLOR_AGENT: Color = Color::LightMagenta;

/// Filler bubble text.
pub const COLOR_FILLER: Color = Color::Gray;

/// Function block title.
pub const COLOR_FUNCTION: Color = Color::Yellow;

/// Pane labels inside a function block ("Arguments:" / "Response:").
pub const COLOR_PANE_LABEL: Color = Color::LightYellow;

/// Copy acknowledgment text.
pub const COLOR_COPIED: Color = Color::LightGreen;

// ============================================================================
// JSON highlighting
// ============================================================================

/// Object keys.
pub const COLOR_JSON_KEY: Color = Color::LightBlue;

/// String values.
pub const COLOR_JSON_STRING: Color = Color::LightGreen;

/// Boolean literals.
pub const COLOR_JSON_BOOL: Color = Color::Yellow;

/// Null literal.
pub const COLOR_JSON_NULL: Color = Color::LightRed;

/// Numeric literals.
pub const COLOR_JSON_NUMBER: Color = Color::LightMagenta;

/// Punctuation and anything outside the highlighted categories.
pub const COLOR_JSON_DEFAULT: Color = Color::Gray;
