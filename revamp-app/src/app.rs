//! Analysis driver — binds the session state machine to a suggestion service.
//!
//! The session lives behind a mutex that is only held for the synchronous
//! transitions; the network call runs with the lock released, so a reset
//! or a new selection can land while a request is in flight. The session's
//! ticket tokens decide whether the late result is applied or dropped.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use revamp_core::encoder::encode_image;
use revamp_core::{
    AnalysisError, AnalysisTicket, Completion, CoreError, Phase, PreviewRegistry, SelectedImage,
    Session, SessionView, Suggestion,
};
use revamp_llm::SuggestionService;
use tokio::task::JoinHandle;
use tracing::debug;

/// Result of one analyze request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeOutcome {
    /// The session did not allow an analysis (idle, loading, or results shown).
    Skipped,
    /// The result was applied; the session is now in this phase.
    Applied(Phase),
    /// The session moved on while the request was in flight.
    Stale,
}

impl From<Completion> for AnalyzeOutcome {
    fn from(completion: Completion) -> Self {
        match completion {
            Completion::Applied(phase) => Self::Applied(phase),
            Completion::Stale => Self::Stale,
        }
    }
}

/// The application: one session plus the service that analyzes its photos.
pub struct Revamp<S> {
    session: Arc<Mutex<Session>>,
    service: Arc<S>,
    registry: PreviewRegistry,
}

impl<S: SuggestionService + 'static> Revamp<S> {
    /// Create an app with a fresh preview registry.
    pub fn new(service: S) -> Self {
        Self::with_registry(service, PreviewRegistry::new())
    }

    /// Create an app whose previews are tracked in `registry`.
    pub fn with_registry(service: S, registry: PreviewRegistry) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new(registry.clone()))),
            service: Arc::new(service),
            registry,
        }
    }

    /// Select a photo by path. Only jpg/jpeg/png/webp are accepted.
    ///
    /// # Errors
    /// Returns [`CoreError::UnsupportedMediaType`] for other files; the
    /// session is left unchanged.
    pub fn select(&self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let image = SelectedImage::from_path(path.as_ref())?;
        self.select_image(image);
        Ok(())
    }

    /// Select an already-typed image.
    pub fn select_image(&self, image: SelectedImage) {
        self.session.lock().select_image(image);
    }

    /// Back to the empty state.
    pub fn reset(&self) {
        self.session.lock().reset();
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> SessionView {
        self.session.lock().snapshot()
    }

    /// Registry holding this app's previews.
    pub fn registry(&self) -> &PreviewRegistry {
        &self.registry
    }

    /// Run one analysis to completion on the current task.
    pub async fn analyze(&self) -> AnalyzeOutcome {
        let Some(ticket) = self.session.lock().begin_analysis() else {
            return AnalyzeOutcome::Skipped;
        };
        let outcome = fetch(self.service.as_ref(), &ticket).await;
        complete(&self.session, ticket, outcome)
    }

    /// Start an analysis in the background.
    ///
    /// Returns `None` when the session does not allow one, which is how a
    /// second analyze while loading becomes a no-op.
    pub fn spawn_analysis(&self) -> Option<JoinHandle<AnalyzeOutcome>> {
        let ticket = self.session.lock().begin_analysis()?;
        let session = Arc::clone(&self.session);
        let service = Arc::clone(&self.service);
        Some(tokio::spawn(async move {
            let outcome = fetch(service.as_ref(), &ticket).await;
            complete(&session, ticket, outcome)
        }))
    }
}

async fn fetch<S: SuggestionService + ?Sized>(
    service: &S,
    ticket: &AnalysisTicket,
) -> Result<Vec<Suggestion>, AnalysisError> {
    let image = ticket.image().clone();
    let encoded = tokio::task::spawn_blocking(move || encode_image(&image))
        .await
        .map_err(AnalysisError::service)??;
    debug!(token = ticket.token(), "Image encoded, calling suggestion service");
    service
        .get_declutter_suggestions(&encoded)
        .await
        .map_err(AnalysisError::service)
}

fn complete(
    session: &Mutex<Session>,
    ticket: AnalysisTicket,
    outcome: Result<Vec<Suggestion>, AnalysisError>,
) -> AnalyzeOutcome {
    session.lock().finish(ticket, outcome).into()
}
