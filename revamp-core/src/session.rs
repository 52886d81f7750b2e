//! Analysis Session — the upload → analyze → results state machine.
//!
//! ```text
//!            select                begin_analysis            finish(Ok)
//!   Idle ───────────▶ Ready ──────────────────▶ Loading ───────────────▶ Success
//!    ▲                  ▲                          │                       │
//!    │                  │ select                   │ finish(Err)           │
//!    │                  └──────────── Failed ◀─────┘                       │
//!    │                                  ▲  select (from any state) ◀───────┘
//!    └───────────── reset (from any state)
//! ```
//!
//! The state is a single enum, so exactly one phase holds at a time. Each
//! call to [`Session::begin_analysis`] issues a ticket with a fresh token;
//! [`Session::finish`] applies a result only while the session is still
//! loading that same token. A reset or a new selection while a request is
//! in flight therefore turns its eventual result into a no-op.

use std::mem;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::encoder::SelectedImage;
use crate::error::EncodingError;
use crate::preview::{PreviewHandle, PreviewRegistry};
use crate::types::Suggestion;

/// The only failure text ever shown to the user.
pub const USER_ERROR_MESSAGE: &str =
    "Sorry, something went wrong while analyzing your image. Please try again.";

/// Observable phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No image selected.
    Idle,
    /// Image selected, no request in flight.
    Ready,
    /// Request in flight.
    Loading,
    /// Suggestions available (possibly none).
    Success,
    /// The last analysis failed.
    Failed,
}

/// Why an analysis did not produce suggestions. Logged, never displayed.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The selected file could not be encoded.
    #[error("image encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    /// The suggestion service failed (transport, malformed or mis-shaped response).
    #[error("suggestion retrieval failed: {0}")]
    Service(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AnalysisError {
    /// Wrap a service-side error.
    pub fn service(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Service(Box::new(err))
    }
}

/// Permission to run one analysis, tied to the session state that issued it.
#[derive(Debug)]
pub struct AnalysisTicket {
    token: u64,
    image: SelectedImage,
}

impl AnalysisTicket {
    /// Request token; unique per session.
    #[must_use]
    pub fn token(&self) -> u64 {
        self.token
    }

    /// The image to analyze.
    #[must_use]
    pub fn image(&self) -> &SelectedImage {
        &self.image
    }
}

/// What [`Session::finish`] did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result was applied; the session is now in this phase.
    Applied(Phase),
    /// The session moved on before the result arrived; it was dropped.
    Stale,
}

/// Read-only snapshot of the session for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    /// Current phase.
    pub phase: Phase,
    /// File name of the selected image.
    pub image_name: Option<String>,
    /// Preview reference of the selected image.
    pub preview_url: Option<String>,
    /// Suggestions, in model order.
    pub suggestions: Vec<Suggestion>,
    /// Whether a request is in flight.
    pub is_loading: bool,
    /// User-facing error message.
    pub error: Option<String>,
}

struct Selection {
    image: SelectedImage,
    preview: PreviewHandle,
}

enum State {
    Idle,
    Ready(Selection),
    Loading {
        selection: Selection,
        token: u64,
    },
    Success {
        selection: Selection,
        suggestions: Vec<Suggestion>,
    },
    Failed {
        selection: Selection,
        message: &'static str,
    },
}

/// One user's analysis session.
pub struct Session {
    registry: PreviewRegistry,
    state: State,
    next_token: u64,
}

impl Session {
    /// Create an idle session whose previews live in `registry`.
    #[must_use]
    pub fn new(registry: PreviewRegistry) -> Self {
        Self {
            registry,
            state: State::Idle,
            next_token: 1,
        }
    }

    /// Select an image (picker or drop). Valid from any state.
    ///
    /// Registers a new preview, releases the previous one, and clears any
    /// suggestions or error. A request still in flight becomes stale.
    pub fn select_image(&mut self, image: SelectedImage) {
        let preview = self.registry.allocate(&image);
        info!(file = %image.name(), media_type = %image.media_type(), "Image selected");
        let previous = mem::replace(&mut self.state, State::Ready(Selection { image, preview }));
        if let State::Loading { token, .. } = &previous {
            info!(token, "Selection replaced while loading; in-flight result will be discarded");
        }
    }

    /// Start an analysis if the session allows it.
    ///
    /// Allowed from `Ready`, from `Failed` (retry), and from `Success` with
    /// an empty list. Returns `None` when idle, already loading, or when
    /// suggestions are already showing.
    pub fn begin_analysis(&mut self) -> Option<AnalysisTicket> {
        match mem::replace(&mut self.state, State::Idle) {
            State::Ready(selection) | State::Failed { selection, .. } => {
                Some(self.issue_ticket(selection))
            }
            State::Success {
                selection,
                suggestions,
            } if suggestions.is_empty() => Some(self.issue_ticket(selection)),
            other => {
                debug!(phase = ?phase_of(&other), "Analyze request ignored");
                self.state = other;
                None
            }
        }
    }

    fn issue_ticket(&mut self, selection: Selection) -> AnalysisTicket {
        let token = self.next_token;
        self.next_token += 1;
        let ticket = AnalysisTicket {
            token,
            image: selection.image.clone(),
        };
        info!(token, file = %selection.image.name(), "Analysis started");
        self.state = State::Loading { selection, token };
        ticket
    }

    /// Apply the outcome of the analysis `ticket` was issued for.
    ///
    /// Failures are logged with full detail; the session only keeps
    /// [`USER_ERROR_MESSAGE`].
    pub fn finish(
        &mut self,
        ticket: AnalysisTicket,
        outcome: Result<Vec<Suggestion>, AnalysisError>,
    ) -> Completion {
        match mem::replace(&mut self.state, State::Idle) {
            State::Loading { selection, token } if token == ticket.token => match outcome {
                Ok(suggestions) => {
                    info!(token, count = suggestions.len(), "Analysis succeeded");
                    self.state = State::Success {
                        selection,
                        suggestions,
                    };
                    Completion::Applied(Phase::Success)
                }
                Err(err) => {
                    error!(token, file = %ticket.image.name(), error = %err, "Analysis failed");
                    self.state = State::Failed {
                        selection,
                        message: USER_ERROR_MESSAGE,
                    };
                    Completion::Applied(Phase::Failed)
                }
            },
            other => {
                warn!(
                    token = ticket.token,
                    phase = ?phase_of(&other),
                    ok = outcome.is_ok(),
                    "Discarding stale analysis result"
                );
                self.state = other;
                Completion::Stale
            }
        }
    }

    /// Return to `Idle`, releasing the preview. Valid from any state.
    pub fn reset(&mut self) {
        let previous = mem::replace(&mut self.state, State::Idle);
        if let State::Loading { token, .. } = &previous {
            info!(token, "Reset while loading; in-flight result will be discarded");
        }
        debug!(from = ?phase_of(&previous), "Session reset");
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        phase_of(&self.state)
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, State::Loading { .. })
    }

    /// Suggestions of the last successful analysis; empty otherwise.
    #[must_use]
    pub fn suggestions(&self) -> &[Suggestion] {
        match &self.state {
            State::Success { suggestions, .. } => suggestions,
            _ => &[],
        }
    }

    /// User-facing error message, if the last analysis failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            State::Failed { message, .. } => Some(*message),
            _ => None,
        }
    }

    /// The selected image, if any.
    #[must_use]
    pub fn selected_image(&self) -> Option<&SelectedImage> {
        self.selection().map(|s| &s.image)
    }

    /// Preview reference of the selected image, if any.
    #[must_use]
    pub fn preview_url(&self) -> Option<&str> {
        self.selection().map(|s| s.preview.url())
    }

    /// Owned snapshot for rendering.
    #[must_use]
    pub fn snapshot(&self) -> SessionView {
        SessionView {
            phase: self.phase(),
            image_name: self.selected_image().map(|i| i.name().to_string()),
            preview_url: self.preview_url().map(str::to_string),
            suggestions: self.suggestions().to_vec(),
            is_loading: self.is_loading(),
            error: self.error().map(str::to_string),
        }
    }

    fn selection(&self) -> Option<&Selection> {
        match &self.state {
            State::Idle => None,
            State::Ready(selection)
            | State::Loading { selection, .. }
            | State::Success { selection, .. }
            | State::Failed { selection, .. } => Some(selection),
        }
    }
}

fn phase_of(state: &State) -> Phase {
    match state {
        State::Idle => Phase::Idle,
        State::Ready(_) => Phase::Ready,
        State::Loading { .. } => Phase::Loading,
        State::Success { .. } => Phase::Success,
        State::Failed { .. } => Phase::Failed,
    }
}
