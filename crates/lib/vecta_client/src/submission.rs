//! URL submission pipeline.
//!
//! Two independent forms, single URL and batch, each driving its own
//! machine:
//!
//! ```text
//! Idle ──submit──▶ Submitting ──ok──▶ Success(message)
//!                       └─────err──▶ Error(message)
//! ```
//!
//! A non-blank user edit while in `Success`/`Error` drops the message and
//! returns the form to `Idle`. A newer submit on the same form supersedes the effect of
//! an older in-flight one.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{debug, error};
use vecta_core::models::{
    Url, UrlBatchSubmission, UrlBatchSubmissionResponse, UrlReference, UrlSubmission,
};
use vecta_core::validation::{self, Field, ValidationError};

use crate::error::GatewayError;
use crate::state::{EventEmitter, LatestGuard, Signal};
use crate::urls::UrlService;

pub const SINGLE_SUCCESS_MESSAGE: &str = "URL submitted successfully";
pub const DUPLICATE_URL_MESSAGE: &str = "URL already exists in this project";
pub const INVALID_URL_MESSAGE: &str = "Invalid URL format";
pub const PROJECT_NOT_FOUND_MESSAGE: &str = "Project not found";
pub const GENERIC_SUBMISSION_MESSAGE: &str = "An error occurred while submitting URLs";
pub const EMPTY_URL_MESSAGE: &str = "URL cannot be empty";
pub const EMPTY_BATCH_MESSAGE: &str = "URLs cannot be empty";
pub const NO_VALID_URLS_MESSAGE: &str = "No valid URLs provided";

/// State of one submission form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Success(String),
    Error(String),
}

impl SubmissionState {
    /// Result message shown under the form, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            SubmissionState::Success(m) | SubmissionState::Error(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionState::Success(_))
    }
}

/// Outward notifications of the pipeline.
#[derive(Debug, Clone)]
pub enum SubmissionEvent {
    UrlSubmitted(Url),
    BatchSubmitted(UrlBatchSubmissionResponse),
    Error {
        message: String,
        /// Set when the backend rejected the URL as a duplicate of this one.
        existing_url: Option<UrlReference>,
    },
}

impl SubmissionEvent {
    fn error(message: impl Into<String>) -> Self {
        SubmissionEvent::Error {
            message: message.into(),
            existing_url: None,
        }
    }
}

/// Which form is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionMode {
    #[default]
    Single,
    Batch,
}

/// Message for a successful batch.
pub fn batch_success_message(resp: &UrlBatchSubmissionResponse) -> String {
    format!(
        "Batch submitted successfully. {} URLs submitted. {} duplicates found.",
        resp.submitted_urls.len(),
        resp.duplicate_urls.len()
    )
}

/// Map a failed submission to its user-facing message.
pub fn classify_error(err: &GatewayError) -> String {
    match err.status().map(|s| s.as_u16()) {
        Some(409) => DUPLICATE_URL_MESSAGE.to_string(),
        Some(400) => INVALID_URL_MESSAGE.to_string(),
        Some(404) => PROJECT_NOT_FOUND_MESSAGE.to_string(),
        _ => err
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| GENERIC_SUBMISSION_MESSAGE.to_string()),
    }
}

#[derive(Debug, Default)]
struct SubmissionForm {
    input: Signal<Field>,
    state: Signal<SubmissionState>,
    runs: LatestGuard,
}

impl SubmissionForm {
    fn edit(&self, value: &str) {
        self.input.update(|field| field.set(value));
        if value.trim().is_empty() {
            return;
        }
        if self.state.with(|s| s.message().is_some()) {
            self.state.set(SubmissionState::Idle);
        }
    }

    fn clear(&self) {
        self.input.update(Field::reset);
        self.state.set(SubmissionState::Idle);
    }
}

/// Submission forms for one project.
#[derive(Debug)]
pub struct UrlSubmissionPipeline {
    project_id: String,
    urls: Arc<UrlService>,
    single: SubmissionForm,
    batch: SubmissionForm,
    mode: Signal<SubmissionMode>,
    events: EventEmitter<SubmissionEvent>,
}

impl UrlSubmissionPipeline {
    pub fn new(project_id: impl Into<String>, urls: Arc<UrlService>) -> Self {
        Self {
            project_id: project_id.into(),
            urls,
            single: SubmissionForm::default(),
            batch: SubmissionForm::default(),
            mode: Signal::new(SubmissionMode::Single),
            events: EventEmitter::new(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SubmissionEvent> {
        self.events.subscribe()
    }

    pub fn set_single_url(&self, value: &str) {
        self.single.edit(value);
    }

    pub fn set_batch_urls(&self, value: &str) {
        self.batch.edit(value);
    }

    pub fn single_input(&self) -> String {
        self.single.input.with(|f| f.value().to_string())
    }

    pub fn batch_input(&self) -> String {
        self.batch.input.with(|f| f.value().to_string())
    }

    pub fn single_state(&self) -> SubmissionState {
        self.single.state.get()
    }

    pub fn batch_state(&self) -> SubmissionState {
        self.batch.state.get()
    }

    pub fn subscribe_single(&self) -> watch::Receiver<SubmissionState> {
        self.single.state.subscribe()
    }

    pub fn subscribe_batch(&self) -> watch::Receiver<SubmissionState> {
        self.batch.state.subscribe()
    }

    /// Inline error of the single URL field, shown once it was touched.
    pub fn single_field_error(&self) -> Option<ValidationError> {
        self.single.input.with(|field| {
            if !field.is_touched() {
                return None;
            }
            validation::validate_http_url(field.value()).err()
        })
    }

    pub fn can_submit_single(&self) -> bool {
        let valid = self
            .single
            .input
            .with(|f| validation::validate_http_url(f.value()).is_ok());
        valid && self.single_state() != SubmissionState::Submitting
    }

    pub fn can_submit_batch(&self) -> bool {
        let valid = self.batch.input.with(|f| !f.value().trim().is_empty());
        valid && self.batch_state() != SubmissionState::Submitting
    }

    pub fn mode(&self) -> SubmissionMode {
        self.mode.get()
    }

    /// Result message of the active form.
    pub fn result_message(&self) -> Option<String> {
        let state = match self.mode() {
            SubmissionMode::Single => self.single_state(),
            SubmissionMode::Batch => self.batch_state(),
        };
        state.message().map(str::to_string)
    }

    /// Switch forms; both forms and their messages are cleared on change.
    pub fn switch_mode(&self, mode: SubmissionMode) {
        if self.mode.set_if_changed(mode) {
            self.single.clear();
            self.batch.clear();
        }
    }

    pub fn toggle_mode(&self) {
        let next = match self.mode() {
            SubmissionMode::Single => SubmissionMode::Batch,
            SubmissionMode::Batch => SubmissionMode::Single,
        };
        self.switch_mode(next);
    }

    /// Submit the single URL form.
    pub async fn submit_single(&self) {
        let url = self.single.input.with(|f| f.value().trim().to_string());
        if url.is_empty() {
            self.events.emit(SubmissionEvent::error(EMPTY_URL_MESSAGE));
            return;
        }
        if let Err(e) = validation::validate_http_url(&url) {
            self.single.input.update(Field::touch);
            self.events.emit(SubmissionEvent::error(e.to_string()));
            return;
        }

        let ticket = self.single.runs.begin();
        self.single.state.set(SubmissionState::Submitting);
        let result = self
            .urls
            .submit_single(&self.project_id, &UrlSubmission { original_url: url })
            .await;
        if !self.single.runs.is_current(ticket) {
            debug!("single submission superseded");
            return;
        }

        match result {
            Ok(created) => {
                self.single
                    .state
                    .set(SubmissionState::Success(SINGLE_SUCCESS_MESSAGE.into()));
                self.single.input.update(Field::reset);
                self.events.emit(SubmissionEvent::UrlSubmitted(created));
            }
            Err(e) => self.fail(&self.single, &e),
        }
    }

    /// Submit the batch form: one URL per line, blank lines ignored.
    pub async fn submit_batch(&self) {
        let raw = self.batch.input.with(|f| f.value().trim().to_string());
        if raw.is_empty() {
            self.events.emit(SubmissionEvent::error(EMPTY_BATCH_MESSAGE));
            return;
        }
        let urls = validation::parse_url_lines(&raw);
        if urls.is_empty() {
            self.events.emit(SubmissionEvent::error(NO_VALID_URLS_MESSAGE));
            return;
        }

        let ticket = self.batch.runs.begin();
        self.batch.state.set(SubmissionState::Submitting);
        let result = self
            .urls
            .submit_batch(&self.project_id, &UrlBatchSubmission { urls })
            .await;
        if !self.batch.runs.is_current(ticket) {
            debug!("batch submission superseded");
            return;
        }

        match result {
            Ok(resp) => {
                self.batch
                    .state
                    .set(SubmissionState::Success(batch_success_message(&resp)));
                self.batch.input.update(Field::reset);
                self.events.emit(SubmissionEvent::BatchSubmitted(resp));
            }
            Err(e) => self.fail(&self.batch, &e),
        }
    }

    fn fail(&self, form: &SubmissionForm, err: &GatewayError) {
        error!(project_id = %self.project_id, error = %err, "url submission failed");
        let message = classify_error(err);
        form.state.set(SubmissionState::Error(message.clone()));
        self.events.emit(SubmissionEvent::Error {
            message,
            existing_url: err.duplicate().map(|dup| dup.existing_url),
        });
    }
}
