// src/controller.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::Result;
use crate::progress::{Progress, ProgressFn};
use crate::response::{Outcome, ResponseBody, ResponseMode};
use crate::snapshot::FormSnapshot;
use crate::transport::FormTransport;
use crate::ui::{FormView, Phase};

/// A form whose current state can be captured at submit time.
pub trait FormSource: Send + Sync {
    fn snapshot(&self) -> Result<FormSnapshot>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Submit,
    Change,
}

/// The UI event that triggered a submission.
pub struct SubmitEvent<'a> {
    kind: EventKind,
    form: &'a dyn FormSource,
    default_prevented: bool,
}

impl<'a> SubmitEvent<'a> {
    pub fn new(kind: EventKind, form: &'a dyn FormSource) -> Self {
        Self {
            kind,
            form,
            default_prevented: false,
        }
    }

    pub fn submit(form: &'a dyn FormSource) -> Self {
        Self::new(EventKind::Submit, form)
    }

    pub fn change(form: &'a dyn FormSource) -> Self {
        Self::new(EventKind::Change, form)
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn form(&self) -> &'a dyn FormSource {
        self.form
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Captions of the action button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub idle: String,
    pub pending: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            idle: "Upload".to_string(),
            pending: "Uploading...".to_string(),
        }
    }
}

/// What became of a call to `FormController::submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Another submission was still pending; nothing was sent.
    Rejected,
    Completed(Outcome),
}

/// Sends a form to the formatter and renders the answer into the page.
///
/// One request is in flight at a time. The controls are always returned to
/// the idle state, whatever the outcome.
pub struct FormController {
    transport: Arc<dyn FormTransport>,
    view: FormView,
    mode: ResponseMode,
    labels: Labels,
    busy: AtomicBool,
    phase: Mutex<Phase>,
}

impl FormController {
    pub fn new(transport: Arc<dyn FormTransport>, view: FormView, mode: ResponseMode) -> Self {
        Self {
            transport,
            view,
            mode,
            labels: Labels::default(),
            busy: AtomicBool::new(false),
            phase: Mutex::new(Phase::Idle),
        }
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn mode(&self) -> ResponseMode {
        self.mode
    }

    pub fn view(&self) -> &FormView {
        &self.view
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_pending(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Handles a submit (or change) event end to end.
    pub async fn submit(&self, event: &mut SubmitEvent<'_>) -> Submission {
        event.prevent_default();

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("Ignoring {:?} event: a submission is already pending", event.kind());
            return Submission::Rejected;
        }

        let _pending = PendingGuard::enter(self);

        let outcome = match event.form().snapshot() {
            Ok(snapshot) => self.send(snapshot).await,
            Err(e) => {
                log::warn!("Could not capture form: {}", e);
                Outcome::from_error(self.mode, e)
            }
        };

        self.set_phase(Phase::Settled);
        self.render(&outcome);

        Submission::Completed(outcome)
    }

    async fn send(&self, snapshot: FormSnapshot) -> Outcome {
        log::debug!("Submitting form with {} field(s)", snapshot.len());

        let form = snapshot.encode();
        let progress = self.view.progress.clone();
        let on_progress: ProgressFn = Arc::new(move |p: Progress| progress.notify(&p.message()));

        let result = self.transport.post_form(form, on_progress).await;
        Outcome::classify(self.mode, result)
    }

    fn render(&self, outcome: &Outcome) {
        self.view.output.set_text(outcome.display_text());

        match outcome {
            Outcome::Success(ResponseBody::Json(reply)) => {
                for line in reply.debug_lines() {
                    self.view.diagnostics.log(line);
                }
            }
            Outcome::Success(ResponseBody::Text(_)) => {}
            Outcome::Failure { status, message } => {
                log::warn!("Submission failed (status {:?}): {}", status, message);
            }
        }
    }

    fn set_phase(&self, phase: Phase) {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner()) = phase;
    }
}

/// Puts the view into the pending state and restores it on drop, so every
/// exit path leaves the controls usable again.
struct PendingGuard<'a> {
    controller: &'a FormController,
}

impl<'a> PendingGuard<'a> {
    fn enter(controller: &'a FormController) -> Self {
        let view = &controller.view;
        controller.set_phase(Phase::Pending);
        view.set_controls_enabled(false);
        view.progress.set_visible(true);
        view.label.set_label(&controller.labels.pending);
        Self { controller }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let controller = self.controller;
        let view = &controller.view;
        view.set_controls_enabled(true);
        view.progress.set_visible(false);
        view.label.set_label(&controller.labels.idle);
        controller.set_phase(Phase::Idle);
        controller.busy.store(false, Ordering::Release);
    }
}
