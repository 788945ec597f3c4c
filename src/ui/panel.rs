//! Slide-in detail panel: open/close lifecycle and scroll state.
//!
//! The panel walks `Closed -> Opening -> Open -> Closing -> Closed` with a
//! fixed 300 ms transition driven off the app tick. A single transition
//! deadline is kept, so a rapid open/close sequence replaces the previous
//! timer instead of racing it. Opening while already open swaps content in
//! place without replaying the slide-in.

use crate::models::{Analytics, ChatRecord};
use super::transcript::TranscriptBlock;
use std::time::{Duration, Instant};

/// Length of the slide in/out transition.
pub const TRANSITION: Duration = Duration::from_millis(300);

/// How close to the bottom (in lines) still counts as "at the bottom" for
/// the scroll affordance.
pub const BOTTOM_TOLERANCE: usize = 1;

/// Lifecycle phase of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    Closed,
    Opening { since: Instant },
    Open,
    Closing { since: Instant },
}

/// What the panel is showing.
#[derive(Debug, Clone)]
pub enum PanelKind {
    /// Full chat record: metadata grid plus function-aware transcript.
    Chat { record: ChatRecord },
    /// Analytics record: simplified two-role conversation only.
    Analytics { analytics: Analytics },
}

/// Content and scroll state for an open panel.
#[derive(Debug, Clone)]
pub struct PanelView {
    pub kind: PanelKind,
    pub blocks: Vec<TranscriptBlock>,
    /// Index of the selected block, when any exist.
    pub selected: usize,
    /// Scroll offset in display lines.
    pub scroll: usize,
    pub metadata_expanded: bool,
    /// Measured during the last render.
    pub content_height: usize,
    pub viewport_height: usize,
    /// Per-block `(first_line, line_count)` from the last render.
    pub block_ranges: Vec<(usize, usize)>,
}

impl PanelView {
    pub fn new(kind: PanelKind, blocks: Vec<TranscriptBlock>, metadata_expanded: bool) -> Self {
        Self {
            kind,
            blocks,
            selected: 0,
            scroll: 0,
            metadata_expanded,
            content_height: 0,
            viewport_height: 0,
            block_ranges: Vec::new(),
        }
    }

    /// True when the viewport is within tolerance of the bottom; the
    /// scroll-to-bottom affordance hides in that case.
    pub fn at_bottom(&self) -> bool {
        self.scroll + self.viewport_height + BOTTOM_TOLERANCE >= self.content_height
    }

    pub fn max_scroll(&self) -> usize {
        self.content_height.saturating_sub(self.viewport_height)
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
        self.selected = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
        if !self.blocks.is_empty() {
            self.selected = self.blocks.len() - 1;
        }
    }

    /// Move block selection and keep it visible.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.blocks.len() {
            self.selected += 1;
            self.scroll_selected_into_view();
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_selected_into_view();
        }
    }

    fn scroll_selected_into_view(&mut self) {
        let Some(&(start, len)) = self.block_ranges.get(self.selected) else {
            return;
        };
        if start < self.scroll {
            self.scroll = start;
        } else if self.viewport_height > 0 {
            let end = start + len;
            let visible_end = self.scroll + self.viewport_height;
            if end > visible_end {
                self.scroll = end.saturating_sub(self.viewport_height).min(start);
            }
        }
    }

    pub fn page_down(&mut self) {
        self.scroll = (self.scroll + self.viewport_height.max(1)).min(self.max_scroll());
    }

    pub fn page_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(self.viewport_height.max(1));
    }
}

/// The panel controller.
#[derive(Debug)]
pub struct PanelState {
    pub phase: PanelPhase,
    pub view: Option<PanelView>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            phase: PanelPhase::Closed,
            view: None,
        }
    }
}

impl PanelState {
    /// Visible in any phase except fully closed.
    pub fn is_visible(&self) -> bool {
        self.phase != PanelPhase::Closed
    }

    pub fn is_open(&self) -> bool {
        matches!(self.phase, PanelPhase::Open | PanelPhase::Opening { .. })
    }

    /// Show `view`. If the panel is already visible the content swaps in
    /// place; otherwise the slide-in starts (replacing any close timer).
    pub fn open(&mut self, view: PanelView) {
        match self.phase {
            PanelPhase::Open | PanelPhase::Opening { .. } => {}
            PanelPhase::Closed | PanelPhase::Closing { .. } => {
                self.phase = PanelPhase::Opening {
                    since: Instant::now(),
                };
            }
        }
        self.view = Some(view);
    }

    /// Begin the slide-out; content is dropped when the transition ends.
    pub fn close(&mut self) {
        if self.is_open() {
            self.phase = PanelPhase::Closing {
                since: Instant::now(),
            };
        }
    }

    /// Advance the transition. Returns true when the phase changed (the
    /// caller should redraw).
    pub fn tick(&mut self) -> bool {
        match self.phase {
            PanelPhase::Opening { since } if since.elapsed() >= TRANSITION => {
                self.phase = PanelPhase::Open;
                true
            }
            PanelPhase::Closing { since } if since.elapsed() >= TRANSITION => {
                self.phase = PanelPhase::Closed;
                self.view = None;
                true
            }
            _ => false,
        }
    }

    /// True while a transition is in flight (the tick loop keeps drawing).
    pub fn in_transition(&self) -> bool {
        matches!(
            self.phase,
            PanelPhase::Opening { .. } | PanelPhase::Closing { .. }
        )
    }

    /// Current panel width for a target of `full` columns, interpolated
    /// across the transition.
    pub fn width(&self, full: u16) -> u16 {
        let fraction = |since: Instant| {
            (since.elapsed().as_millis() as f64 / TRANSITION.as_millis() as f64).min(1.0)
        };
        match self.phase {
            PanelPhase::Closed => 0,
            PanelPhase::Open => full,
            PanelPhase::Opening { since } => (full as f64 * fraction(since)).round() as u16,
            PanelPhase::Closing { since } => {
                (full as f64 * (1.0 - fraction(since))).round() as u16
            }
        }
    }
}
