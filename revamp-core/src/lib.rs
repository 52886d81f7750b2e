//! # Room Revamp Core Library
//!
//! Everything that happens between "the user picked a photo" and "the
//! suggestion cards are on screen", minus the network call itself:
//!
//! - **Suggestion** — one area-plus-advice pair, validated on construction
//! - **Image Encoder** — file bytes → base64 payload + media type
//! - **Preview handles** — registered preview resources released on drop
//! - **Analysis Session** — the Idle → Ready → Loading → Success/Failed
//!   state machine, with request tokens so a stale response can never
//!   overwrite a newer session
//!
//! The service client lives in `revamp-llm`; the async driver and the
//! terminal front end live in `revamp-app`.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod encoder;
pub mod error;
pub mod preview;
pub mod session;
pub mod types;

pub use crate::config::RevampConfig;
pub use encoder::{EncodedImage, SelectedImage};
pub use error::{CoreError, EncodingError};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use session::{AnalysisError, AnalysisTicket, Completion, Phase, Session, SessionView};
pub use types::{MediaType, Suggestion};
