//! # revamp-app — Room Revamp front end
//!
//! Binds `revamp-core`'s session to `revamp-llm`'s service and puts a
//! terminal face on it.
//!
//! ```text
//!  open <path> ──▶ Revamp::select ──▶ Session (Ready, preview registered)
//!  analyze     ──▶ Revamp::spawn_analysis
//!                    ├─ encode image (blocking pool)
//!                    ├─ SuggestionService::get_declutter_suggestions
//!                    └─ Session::finish (applied, or dropped if stale)
//!  render      ──▶ suggestion cards / status / error line
//! ```
//!
//! ## Modules
//!
//! - `app` — the async driver owning the session and the service
//! - `render` — suggestion cards and status screens
//! - `shell` — line commands for the interactive mode
//! - `logging` — tracing subscriber setup

pub mod app;
pub mod logging;
pub mod render;
pub mod shell;

pub use app::{AnalyzeOutcome, Revamp};
