// src/terminal.rs
//! Terminal stand-ins for the page controls. Status goes to stderr so stdout
//! only ever carries the formatted roster.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::ui::{
    ActionLabel, Control, FormView, LogDiagnostics, OutputRegion, ProgressIndicator,
};

#[derive(Debug)]
pub struct TerminalView {
    enabled: AtomicBool,
    spinner: AtomicBool,
    output: Mutex<String>,
    quiet: bool,
}

impl TerminalView {
    pub fn new(quiet: bool) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            spinner: AtomicBool::new(false),
            output: Mutex::new(String::new()),
            quiet,
        }
    }

    /// Wires this view into every slot of a `FormView`, with diagnostics going
    /// to the log.
    pub fn into_form_view(self: Arc<Self>) -> FormView {
        FormView {
            controls: vec![self.clone()],
            label: self.clone(),
            progress: self.clone(),
            output: self,
            diagnostics: Arc::new(LogDiagnostics),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn is_spinner_visible(&self) -> bool {
        self.spinner.load(Ordering::Acquire)
    }

    fn status(&self, line: &str) {
        if self.quiet {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "\r\x1b[2K{}", line);
        let _ = stderr.flush();
    }
}

impl Control for TerminalView {
    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }
}

impl ActionLabel for TerminalView {
    fn set_label(&self, label: &str) {
        if self.is_spinner_visible() {
            self.status(label);
        } else {
            log::debug!("Action label: {}", label);
        }
    }
}

impl ProgressIndicator for TerminalView {
    fn set_visible(&self, visible: bool) {
        let was_visible = self.spinner.swap(visible, Ordering::AcqRel);
        if was_visible && !visible && !self.quiet {
            eprintln!();
        }
    }

    fn notify(&self, message: &str) {
        self.status(&format!("⏳ {}", message));
    }
}

impl OutputRegion for TerminalView {
    fn set_text(&self, text: &str) {
        *self.output.lock().unwrap_or_else(|e| e.into_inner()) = text.to_string();
    }

    fn text(&self) -> String {
        self.output
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
