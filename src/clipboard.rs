//! Clipboard copy with an OSC 52 fallback, and the transient copy notice.
//!
//! `arboard` talks to the OS clipboard directly; when that fails (headless
//! or remote sessions), the OSC 52 escape sequence asks the terminal
//! emulator itself to take the text. Either path raises a `Copied!` notice
//! that auto-dismisses after two seconds, dimming over its final 300 ms.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Which mechanism ended up carrying the copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    /// OS clipboard via `arboard`.
    Clipboard,
    /// OSC 52 escape sequence written to the terminal.
    Osc52,
}

/// Both copy paths failed.
#[derive(Debug)]
pub struct CopyError {
    pub clipboard: String,
    pub osc52: String,
}

impl std::fmt::Display for CopyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "copy failed (clipboard: {}; osc52: {})",
            self.clipboard, self.osc52
        )
    }
}

impl std::error::Error for CopyError {}

/// Copy text, preferring the OS clipboard and falling back to OSC 52.
pub fn copy_text(text: &str) -> Result<CopyMethod, CopyError> {
    let clipboard_err = match arboard::Clipboard::new()
        .and_then(|mut clipboard| clipboard.set_text(text.to_string()))
    {
        Ok(()) => return Ok(CopyMethod::Clipboard),
        Err(e) => e.to_string(),
    };
    tracing::debug!("clipboard unavailable ({clipboard_err}), trying OSC 52");
    match osc52_copy(text) {
        Ok(()) => Ok(CopyMethod::Osc52),
        Err(e) => Err(CopyError {
            clipboard: clipboard_err,
            osc52: e.to_string(),
        }),
    }
}

/// Ask the terminal emulator to place `text` on the clipboard (OSC 52).
fn osc52_copy(text: &str) -> io::Result<()> {
    let encoded = BASE64.encode(text.as_bytes());
    let mut stdout = io::stdout();
    write!(stdout, "\x1b]52;c;{}\x07", encoded)?;
    stdout.flush()
}

/// How long the copy notice stays on screen.
pub const NOTICE_DISPLAY: Duration = Duration::from_millis(2000);
/// Tail of the display window during which the notice renders dimmed.
pub const NOTICE_FADE: Duration = Duration::from_millis(300);

/// Transient `Copied!` acknowledgment anchored to the block that was copied.
#[derive(Debug, Clone)]
pub struct CopyNotice {
    created: Instant,
    /// Transcript block index the notice is anchored to.
    pub block_index: usize,
}

impl CopyNotice {
    pub fn new(block_index: usize) -> Self {
        Self {
            created: Instant::now(),
            block_index,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created.elapsed() >= NOTICE_DISPLAY
    }

    /// True once the notice has entered its fade-out window.
    pub fn is_fading(&self) -> bool {
        self.created.elapsed() >= NOTICE_DISPLAY.saturating_sub(NOTICE_FADE)
    }
}
