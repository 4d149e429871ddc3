//! Delivery of copy-all text to the user's clipboard.
use anyhow::Result;
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use std::io::Write;

/// A destination for copied text.
pub trait ClipboardSink: Send {
    /// Places `text` on the clipboard.
    ///
    /// # Errors
    ///
    /// This function will return an error if the text cannot be delivered.
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// Copies through the terminal with an OSC 52 escape sequence.
///
/// Most modern terminal emulators (and tmux with `set-clipboard on`) forward
/// the payload to the system clipboard.
pub struct Osc52Clipboard<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> ClipboardSink for Osc52Clipboard<W> {
    fn copy(&mut self, text: &str) -> Result<()> {
        write!(self.out, "\x1b]52;c;{}\x07", BASE64_STANDARD.encode(text))?;
        self.out.flush()?;
        Ok(())
    }
}
