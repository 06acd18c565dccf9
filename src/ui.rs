// src/ui.rs
//! Controls a `FormController` drives. They are handed in at construction so
//! the controller never looks anything up on its own.

use std::sync::Arc;

/// Lifecycle of a single submission as seen by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending,
    Settled,
}

/// A control that is disabled while a request is pending (upload and copy
/// buttons).
pub trait Control: Send + Sync {
    fn set_enabled(&self, enabled: bool);
}

/// The caption of the action button.
pub trait ActionLabel: Send + Sync {
    fn set_label(&self, label: &str);
}

/// Spinner plus transient notifications.
pub trait ProgressIndicator: Send + Sync {
    fn set_visible(&self, visible: bool);
    fn notify(&self, message: &str);
}

/// Region the response (or failure message) is written into.
pub trait OutputRegion: Send + Sync {
    fn set_text(&self, text: &str);
    fn text(&self) -> String;
}

/// Channel for diagnostics that are not shown to the user.
pub trait DiagnosticSink: Send + Sync {
    fn log(&self, line: &str);
    fn error(&self, message: &str);
}

/// Diagnostics routed to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl DiagnosticSink for LogDiagnostics {
    fn log(&self, line: &str) {
        log::info!(target: "roster_upload::diagnostics", "{}", line);
    }

    fn error(&self, message: &str) {
        log::error!(target: "roster_upload::diagnostics", "{}", message);
    }
}

/// Everything the controller touches on the page.
#[derive(Clone)]
pub struct FormView {
    pub controls: Vec<Arc<dyn Control>>,
    pub label: Arc<dyn ActionLabel>,
    pub progress: Arc<dyn ProgressIndicator>,
    pub output: Arc<dyn OutputRegion>,
    pub diagnostics: Arc<dyn DiagnosticSink>,
}

impl FormView {
    pub(crate) fn set_controls_enabled(&self, enabled: bool) {
        for control in &self.controls {
            control.set_enabled(enabled);
        }
    }
}
