//! End-to-end flows through the async driver with a fake model.

mod common;

use std::sync::atomic::Ordering;

use common::{DESK_REPLY, FakeService, photo};
use revamp_app::render::render_view;
use revamp_app::{AnalyzeOutcome, Revamp};
use revamp_core::session::USER_ERROR_MESSAGE;
use revamp_core::{CoreError, MediaType, Phase};

#[tokio::test]
async fn desk_photo_shows_one_card() {
    let file = photo(".jpg");
    let service = FakeService::text(DESK_REPLY);
    let images = service.images();
    let app = Revamp::new(service);

    app.select(file.path()).unwrap();
    assert_eq!(app.view().phase, Phase::Ready);
    assert_eq!(app.analyze().await, AnalyzeOutcome::Applied(Phase::Success));

    let view = app.view();
    assert_eq!(view.suggestions.len(), 1);
    assert_eq!(view.suggestions[0].area(), "Desk");
    let screen = render_view(&view, 80);
    assert!(screen.contains("1. Desk"));
    assert!(screen.contains("Clear loose papers into a tray."));

    let images = images.lock();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].media_type(), MediaType::Jpeg);
    assert!(!images[0].data().starts_with("data:"));
}

#[tokio::test]
async fn network_error_shows_generic_message() {
    let file = photo(".png");
    let app = Revamp::new(FakeService::transport_error("connection reset by peer"));
    app.select(file.path()).unwrap();

    assert_eq!(app.analyze().await, AnalyzeOutcome::Applied(Phase::Failed));
    let view = app.view();
    assert_eq!(view.error.as_deref(), Some(USER_ERROR_MESSAGE));
    assert!(!view.is_loading);
    assert!(view.suggestions.is_empty());
    assert!(!render_view(&view, 80).contains("connection reset"));
}

#[tokio::test]
async fn empty_array_is_success() {
    let file = photo(".webp");
    let app = Revamp::new(FakeService::text("[]"));
    app.select(file.path()).unwrap();
    assert_eq!(app.analyze().await, AnalyzeOutcome::Applied(Phase::Success));
    assert!(app.view().suggestions.is_empty());
    assert!(app.view().error.is_none());
}

#[tokio::test]
async fn object_reply_fails() {
    let file = photo(".jpg");
    let app = Revamp::new(FakeService::text(
        r#"{"area":"Desk","suggestionText":"Clear loose papers into a tray."}"#,
    ));
    app.select(file.path()).unwrap();
    assert_eq!(app.analyze().await, AnalyzeOutcome::Applied(Phase::Failed));
    assert!(app.view().suggestions.is_empty());
}

#[tokio::test]
async fn unreadable_photo_fails_without_calling_the_service() {
    let file = photo(".jpg");
    let path = file.path().to_path_buf();
    let service = FakeService::text(DESK_REPLY);
    let calls = service.calls();
    let app = Revamp::new(service);
    app.select(&path).unwrap();
    drop(file);

    assert_eq!(app.analyze().await, AnalyzeOutcome::Applied(Phase::Failed));
    assert_eq!(app.view().error.as_deref(), Some(USER_ERROR_MESSAGE));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unsupported_file_is_rejected_at_selection() {
    let file = photo(".gif");
    let app = Revamp::new(FakeService::text(DESK_REPLY));
    assert!(matches!(
        app.select(file.path()),
        Err(CoreError::UnsupportedMediaType(_))
    ));
    assert_eq!(app.view().phase, Phase::Idle);
}

#[tokio::test]
async fn analyze_while_loading_is_a_no_op() {
    let file = photo(".jpg");
    let (service, release) = FakeService::text(DESK_REPLY).gated();
    let calls = service.calls();
    let app = Revamp::new(service);
    app.select(file.path()).unwrap();

    let first = app.spawn_analysis().expect("first analysis starts");
    assert!(app.view().is_loading);
    assert!(app.spawn_analysis().is_none());
    assert_eq!(app.analyze().await, AnalyzeOutcome::Skipped);

    release.send(()).unwrap();
    assert_eq!(first.await.unwrap(), AnalyzeOutcome::Applied(Phase::Success));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn analyze_with_results_shown_is_a_no_op() {
    let file = photo(".jpg");
    let service = FakeService::text(DESK_REPLY);
    let calls = service.calls();
    let app = Revamp::new(service);
    app.select(file.path()).unwrap();
    app.analyze().await;
    assert_eq!(app.analyze().await, AnalyzeOutcome::Skipped);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn reset_during_loading_discards_the_late_result() {
    let file = photo(".jpg");
    let (service, release) = FakeService::text(DESK_REPLY).gated();
    let app = Revamp::new(service);
    app.select(file.path()).unwrap();

    let in_flight = app.spawn_analysis().unwrap();
    app.reset();
    assert_eq!(app.view().phase, Phase::Idle);
    assert_eq!(app.registry().live_count(), 0);

    release.send(()).unwrap();
    assert_eq!(in_flight.await.unwrap(), AnalyzeOutcome::Stale);
    let view = app.view();
    assert_eq!(view.phase, Phase::Idle);
    assert!(view.suggestions.is_empty());
}

#[tokio::test]
async fn new_photo_during_loading_discards_the_late_result() {
    let old = photo(".jpg");
    let new = photo(".png");
    let (service, release) = FakeService::text(DESK_REPLY).gated();
    let app = Revamp::new(service);
    app.select(old.path()).unwrap();

    let in_flight = app.spawn_analysis().unwrap();
    app.select(new.path()).unwrap();
    release.send(()).unwrap();
    assert_eq!(in_flight.await.unwrap(), AnalyzeOutcome::Stale);

    let view = app.view();
    assert_eq!(view.phase, Phase::Ready);
    assert!(view.suggestions.is_empty());
    assert_eq!(app.registry().live_count(), 1);

    assert_eq!(app.analyze().await, AnalyzeOutcome::Applied(Phase::Success));
    assert_eq!(app.view().suggestions.len(), 1);
}

#[tokio::test]
async fn reselect_after_failure_clears_the_error() {
    let first = photo(".jpg");
    let second = photo(".jpg");
    let app = Revamp::new(FakeService::transport_error("offline"));
    app.select(first.path()).unwrap();
    app.analyze().await;
    assert_eq!(app.view().phase, Phase::Failed);

    app.select(second.path()).unwrap();
    let view = app.view();
    assert_eq!(view.phase, Phase::Ready);
    assert!(view.error.is_none());
    assert_eq!(app.registry().allocated_total(), 2);
    assert_eq!(app.registry().released_total(), 1);
}
