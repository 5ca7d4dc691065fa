//! Clipboard access
//!
//! The monitor only needs plain-text read and write, expressed by the
//! [`Clipboard`] trait. [`SystemClipboard`] backs it with `arboard`.

use thiserror::Error;

/// Error type for clipboard operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("Clipboard not available: {0}")]
    Unavailable(String),

    #[error("Failed to read clipboard: {0}")]
    Read(String),

    #[error("Failed to write clipboard: {0}")]
    Write(String),
}

/// Plain-text clipboard I/O
pub trait Clipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError>;

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The operating system clipboard
///
/// The `arboard` handle is opened on first use and dropped after a failure,
/// so the next call starts from a fresh connection. Keeping the handle
/// alive matters on X11, where clipboard content is served by its owner.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.handle.is_none() {
            let handle =
                arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.handle = Some(handle);
        }
        self.handle
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("clipboard handle missing".to_string()))
    }
}

impl Clipboard for SystemClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        let result = self.handle()?.get_text();
        result.map_err(|e| {
            if !matches!(e, arboard::Error::ContentNotAvailable) {
                self.handle = None;
            }
            ClipboardError::Read(e.to_string())
        })
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let result = self.handle()?.set_text(text.to_string());
        result.map_err(|e| {
            self.handle = None;
            ClipboardError::Write(e.to_string())
        })
    }
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("connected", &self.handle.is_some())
            .finish()
    }
}
