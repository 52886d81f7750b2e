//! Integration tests — a session driven end to end with real files.
//!
//! The service call is replaced by canned outcomes; everything else
//! (selection, encoding, preview lifetime, token checks) is the real thing.

use std::io::Write;

use revamp_core::encoder::encode_image;
use revamp_core::session::USER_ERROR_MESSAGE;
use revamp_core::{
    AnalysisError, Completion, EncodingError, Phase, PreviewRegistry, SelectedImage, Session,
    Suggestion,
};

fn photo(suffix: &str, bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("room")
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(bytes).unwrap();
    file
}

#[test]
fn upload_analyze_show_one_card() {
    let file = photo(".jpg", b"\xFF\xD8\xFF fake jpeg");
    let registry = PreviewRegistry::new();
    let mut session = Session::new(registry.clone());

    session.select_image(SelectedImage::from_path(file.path()).unwrap());
    let ticket = session.begin_analysis().unwrap();
    let encoded = encode_image(ticket.image()).unwrap();
    assert_eq!(encoded.media_type().as_mime(), "image/jpeg");

    let reply = vec![Suggestion::new("Desk", "Clear loose papers into a tray.").unwrap()];
    assert_eq!(session.finish(ticket, Ok(reply)), Completion::Applied(Phase::Success));

    let view = session.snapshot();
    assert_eq!(view.suggestions.len(), 1);
    assert_eq!(view.suggestions[0].suggestion_text(), "Clear loose papers into a tray.");
    assert!(!view.is_loading);
    assert!(view.error.is_none());
}

#[test]
fn unreadable_file_fails_with_the_generic_message() {
    let file = photo(".png", b"png");
    let path = file.path().to_path_buf();
    let mut session = Session::new(PreviewRegistry::new());
    session.select_image(SelectedImage::from_path(&path).unwrap());
    drop(file);

    let ticket = session.begin_analysis().unwrap();
    let err = encode_image(ticket.image()).unwrap_err();
    assert!(matches!(err, EncodingError::Read { .. }));

    let completion = session.finish(ticket, Err(AnalysisError::from(err)));
    assert_eq!(completion, Completion::Applied(Phase::Failed));
    assert_eq!(session.error(), Some(USER_ERROR_MESSAGE));
    assert!(session.suggestions().is_empty());
}

#[test]
fn network_failure_hides_loading_and_keeps_list_empty() {
    let file = photo(".webp", b"webp");
    let mut session = Session::new(PreviewRegistry::new());
    session.select_image(SelectedImage::from_path(file.path()).unwrap());

    let ticket = session.begin_analysis().unwrap();
    let failure = AnalysisError::service(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    ));
    session.finish(ticket, Err(failure));

    let view = session.snapshot();
    assert_eq!(view.phase, Phase::Failed);
    assert!(!view.is_loading);
    assert!(view.suggestions.is_empty());
    assert_eq!(view.error.as_deref(), Some(USER_ERROR_MESSAGE));
}

#[test]
fn previews_do_not_leak_across_a_busy_session() {
    let registry = PreviewRegistry::new();
    let mut session = Session::new(registry.clone());
    let files: Vec<_> = (0..5).map(|_| photo(".jpg", b"jpg")).collect();

    for (i, file) in files.iter().enumerate() {
        session.select_image(SelectedImage::from_path(file.path()).unwrap());
        let ticket = session.begin_analysis().unwrap();
        if i % 2 == 0 {
            session.reset();
            assert_eq!(session.finish(ticket, Ok(vec![])), Completion::Stale);
        } else {
            session.finish(ticket, Ok(vec![]));
        }
        assert!(registry.live_count() <= 1);
    }

    session.reset();
    assert_eq!(registry.live_count(), 0);
    assert_eq!(registry.allocated_total(), registry.released_total());
}
