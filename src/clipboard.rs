// src/clipboard.rs
use crate::errors::Result;
use crate::ui::{DiagnosticSink, OutputRegion};

/// Destination for copied text.
pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// The system clipboard, opened on each write.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}

/// Copies the current output text to the clipboard.
///
/// Failures go to the diagnostic channel only; the user-facing output is left
/// untouched. Returns whether the copy succeeded.
pub fn copy_output(
    output: &dyn OutputRegion,
    clipboard: &mut dyn ClipboardWriter,
    diagnostics: &dyn DiagnosticSink,
) -> bool {
    let text = output.text();
    match clipboard.write_text(&text) {
        Ok(()) => {
            log::debug!("Copied {} bytes to clipboard", text.len());
            true
        }
        Err(e) => {
            diagnostics.error(&format!("Could not copy text: {}", e));
            false
        }
    }
}
