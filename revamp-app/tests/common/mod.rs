//! Shared fixtures: a scriptable suggestion service and photo files.

#![allow(dead_code)]

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use revamp_core::{EncodedImage, Suggestion};
use revamp_llm::{LlmError, SuggestionService, parse_suggestions};
use tokio::sync::oneshot;

pub const DESK_REPLY: &str =
    r#"[{"area":"Desk","suggestionText":"Clear loose papers into a tray."}]"#;

/// What the fake model answers.
pub enum Reply {
    /// Raw model text, validated with the real parser.
    Text(String),
    /// A transport failure.
    Transport(String),
}

/// Scriptable stand-in for the hosted model.
pub struct FakeService {
    reply: Reply,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    calls: Arc<AtomicUsize>,
    images: Arc<Mutex<Vec<EncodedImage>>>,
}

impl FakeService {
    pub fn text(text: &str) -> Self {
        Self::new(Reply::Text(text.to_string()))
    }

    pub fn transport_error(message: &str) -> Self {
        Self::new(Reply::Transport(message.to_string()))
    }

    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            gate: Mutex::new(None),
            calls: Arc::new(AtomicUsize::new(0)),
            images: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Hold the first call until the returned sender fires (or is dropped).
    pub fn gated(mut self) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        self.gate = Mutex::new(Some(rx));
        (self, tx)
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn images(&self) -> Arc<Mutex<Vec<EncodedImage>>> {
        Arc::clone(&self.images)
    }
}

#[async_trait]
impl SuggestionService for FakeService {
    async fn get_declutter_suggestions(
        &self,
        image: &EncodedImage,
    ) -> Result<Vec<Suggestion>, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.images.lock().push(image.clone());
        let gate = self.gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        match &self.reply {
            Reply::Text(text) => parse_suggestions(text),
            Reply::Transport(message) => Err(LlmError::Transport(message.clone())),
        }
    }
}

/// A photo on disk with the given extension.
pub fn photo(suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("room")
        .suffix(suffix)
        .tempfile()
        .expect("temp photo");
    file.write_all(b"\xFF\xD8\xFF not really a jpeg").expect("write photo");
    file
}
