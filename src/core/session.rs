//! Upload session - lifecycle of one candidate file
//!
//! State machine:
//!
//! ```text
//! Empty ──select(ok)──> Ready ──submit──> Submitting ──> Succeeded | Failed
//!   │                     ▲                                   │
//!   └──select(rejected)──> Rejected            select / reset ┘
//! ```
//!
//! Async work (preview derivation, submission) is split into a synchronous
//! `begin_*` step that hands out a ticket tagged with the session generation,
//! the awaitable work on the ticket, and a synchronous `apply_*`/`complete_*`
//! step. Selecting a file or resetting bumps the generation, so completions
//! of superseded tickets are discarded instead of overwriting newer state.

use super::candidate::{CandidateFile, Preview};
use super::errors::{SessionError, ValidationError};
use super::traits::PredictionTransport;
use super::validation::ValidationPolicy;
use crate::api::{PredictionResponse, TransportError};

/// Status message exposed after a successful submission
pub const SUCCESS_MESSAGE: &str = "Prediction completed successfully!";

/// Monotonic tag identifying the selection an async operation belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing selected
    Empty,
    /// Last selection was refused by the validation policy
    Rejected,
    /// Accepted candidate waiting to be submitted
    Ready,
    /// Submission in flight
    Submitting,
    Succeeded,
    Failed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Rejected => "Rejected",
            Self::Ready => "Ready",
            Self::Submitting => "Submitting",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
        }
    }
}

/// Pending preview derivation for one selection
#[derive(Debug)]
pub struct PreviewTicket {
    generation: Generation,
    file: CandidateFile,
}

impl PreviewTicket {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub async fn render(self) -> PreviewOutcome {
        tracing::debug!("Deriving preview for {}", self.file.name());
        let result = Preview::derive(self.file)
            .await
            .map_err(|e| SessionError::Preview(e.to_string()));
        PreviewOutcome {
            generation: self.generation,
            result,
        }
    }
}

#[derive(Debug)]
pub struct PreviewOutcome {
    generation: Generation,
    result: Result<Preview, SessionError>,
}

/// In-flight submission for one selection
#[derive(Debug)]
pub struct SubmitTicket {
    generation: Generation,
    file: CandidateFile,
}

impl SubmitTicket {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn file(&self) -> &CandidateFile {
        &self.file
    }

    pub async fn send(self, transport: &dyn PredictionTransport) -> SubmitOutcome {
        let result = transport.submit(&self.file).await;
        SubmitOutcome {
            generation: self.generation,
            result,
        }
    }
}

#[derive(Debug)]
pub struct SubmitOutcome {
    generation: Generation,
    result: Result<PredictionResponse, TransportError>,
}

impl SubmitOutcome {
    pub fn result(&self) -> &Result<PredictionResponse, TransportError> {
        &self.result
    }
}

/// State of the current upload attempt, owned by the active view
#[derive(Debug)]
pub struct UploadSession {
    policy: ValidationPolicy,
    generation: Generation,
    state: SessionState,
    candidate: Option<CandidateFile>,
    preview: Option<Preview>,
    error: Option<String>,
    result: Option<PredictionResponse>,
}

impl Default for UploadSession {
    fn default() -> Self {
        Self::new(ValidationPolicy::default())
    }
}

impl UploadSession {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            policy,
            generation: Generation::default(),
            state: SessionState::Empty,
            candidate: None,
            preview: None,
            error: None,
            result: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn candidate(&self) -> Option<&CandidateFile> {
        self.candidate.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Last error message (validation, submission, or missing candidate)
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&PredictionResponse> {
        self.result.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SessionState::Submitting
    }

    /// Success banner, shown only after a completed prediction
    pub fn status_message(&self) -> Option<&'static str> {
        (self.state == SessionState::Succeeded).then_some(SUCCESS_MESSAGE)
    }

    /// Select a new candidate, superseding everything tied to the previous one.
    ///
    /// On acceptance the session is `Ready` and the returned ticket derives
    /// the preview. On rejection the session is `Rejected` with the reason as
    /// its error and no candidate, preview or result.
    pub fn select_file(&mut self, file: CandidateFile) -> Result<PreviewTicket, ValidationError> {
        self.generation = self.generation.next();
        self.preview = None;
        self.result = None;

        match self.policy.validate(&file) {
            Ok(format) => {
                tracing::debug!(
                    "Accepted {} as {} ({} bytes)",
                    file.name(),
                    format.mime_type(),
                    file.size()
                );
                self.candidate = Some(file.clone());
                self.error = None;
                self.transition(SessionState::Ready);
                Ok(PreviewTicket {
                    generation: self.generation,
                    file,
                })
            }
            Err(err) => {
                tracing::info!("Rejected {}: {}", file.name(), err);
                self.candidate = None;
                self.error = Some(err.to_string());
                self.transition(SessionState::Rejected);
                Err(err)
            }
        }
    }

    /// Store a derived preview if it still belongs to the current selection.
    ///
    /// Returns `false` when the outcome was stale and discarded.
    pub fn apply_preview(&mut self, outcome: PreviewOutcome) -> bool {
        if outcome.generation != self.generation {
            tracing::debug!(
                "Discarding stale preview (generation {} != {})",
                outcome.generation.value(),
                self.generation.value()
            );
            return false;
        }

        match outcome.result {
            Ok(preview) => self.preview = Some(preview),
            Err(e) => tracing::warn!("{}", e),
        }
        true
    }

    /// Start submitting the current candidate.
    ///
    /// Returns `Ok(None)` if a submission is already in flight (no-op).
    pub fn begin_submit(&mut self) -> Result<Option<SubmitTicket>, SessionError> {
        if self.state == SessionState::Submitting {
            tracing::debug!("Submit ignored: submission already in flight");
            return Ok(None);
        }

        let Some(file) = self.candidate.clone() else {
            self.error = Some(SessionError::NoCandidate.to_string());
            return Err(SessionError::NoCandidate);
        };

        self.error = None;
        self.result = None;
        self.transition(SessionState::Submitting);
        tracing::info!("Submitting {}", file.name());

        Ok(Some(SubmitTicket {
            generation: self.generation,
            file,
        }))
    }

    /// Apply a finished submission if it still belongs to the current selection.
    ///
    /// Returns `false` when the outcome was stale and discarded.
    pub fn complete_submit(&mut self, outcome: SubmitOutcome) -> bool {
        if outcome.generation != self.generation || self.state != SessionState::Submitting {
            tracing::debug!(
                "Discarding stale submission result (generation {}, current {})",
                outcome.generation.value(),
                self.generation.value()
            );
            return false;
        }

        match outcome.result {
            Ok(prediction) => {
                self.result = Some(prediction);
                self.transition(SessionState::Succeeded);
            }
            Err(err) => {
                tracing::warn!("Submission failed: {:?}", err);
                self.error = Some(err.to_string());
                self.transition(SessionState::Failed);
            }
        }
        true
    }

    /// Submit and wait for the outcome in one step.
    ///
    /// Returns the state the session ended up in.
    pub async fn submit(
        &mut self,
        transport: &dyn PredictionTransport,
    ) -> Result<SessionState, SessionError> {
        if let Some(ticket) = self.begin_submit()? {
            let outcome = ticket.send(transport).await;
            self.complete_submit(outcome);
        }
        Ok(self.state)
    }

    /// Discard candidate, preview, error and result ("new scan").
    pub fn reset(&mut self) {
        self.generation = self.generation.next();
        self.candidate = None;
        self.preview = None;
        self.error = None;
        self.result = None;
        self.transition(SessionState::Empty);
    }

    fn transition(&mut self, to: SessionState) {
        if self.state != to {
            tracing::debug!("Session {} -> {}", self.state.as_str(), to.as_str());
        }
        self.state = to;
    }
}
