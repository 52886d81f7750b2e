//! Scripted runs of the interactive shell.

mod common;

use common::{DESK_REPLY, FakeService, photo};
use revamp_app::{Revamp, shell};

async fn run_script(app: &Revamp<FakeService>, script: &str) -> String {
    let mut out = Vec::new();
    shell::run(app, tokio::io::BufReader::new(script.as_bytes()), &mut out, 80)
        .await
        .unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn open_analyze_prints_cards() {
    let file = photo(".jpg");
    let app = Revamp::new(FakeService::text(DESK_REPLY));
    let script = format!("open {}\nanalyze\n", file.path().display());

    let out = run_script(&app, &script).await;
    assert!(out.contains("Ready. Type `analyze`"));
    assert!(out.contains("Analyzing your room..."));
    assert!(out.contains("Your Personalized Plan"));
    assert!(out.contains("1. Desk"));
}

#[tokio::test]
async fn analyze_without_photo_is_refused() {
    let app = Revamp::new(FakeService::text(DESK_REPLY));
    let out = run_script(&app, "analyze\nquit\n").await;
    assert!(out.contains("Select a photo first"));
}

#[tokio::test]
async fn bad_commands_and_files_are_reported() {
    let app = Revamp::new(FakeService::text(DESK_REPLY));
    let out = run_script(&app, "dance\nopen notes.txt\nhelp\n").await;
    assert!(out.contains("unknown command `dance`"));
    assert!(out.contains("Unsupported media type"));
    assert!(out.contains("open <path>"));
}

#[tokio::test]
async fn reset_returns_to_the_upload_prompt() {
    let file = photo(".png");
    let app = Revamp::new(FakeService::text("[]"));
    let script = format!("open {}\nreset\n", file.path().display());
    let out = run_script(&app, &script).await;
    assert!(out.matches("Upload a photo of your room").count() >= 2);
    assert_eq!(app.registry().live_count(), 0);
}

#[tokio::test]
async fn second_analyze_after_cards_is_refused() {
    let file = photo(".jpg");
    let service = FakeService::text(DESK_REPLY);
    let calls = service.calls();
    let app = Revamp::new(service);
    let script = format!("open {}\nanalyze\n", file.path().display());
    run_script(&app, &script).await;

    let out = run_script(&app, "analyze\n").await;
    assert!(out.contains("Suggestions are already shown"));
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}
