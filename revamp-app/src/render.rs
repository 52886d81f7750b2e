//! Terminal rendering of the session: preview line, status, suggestion cards.

use revamp_core::{Phase, SessionView, Suggestion};
use textwrap::Options;

/// Heading above the suggestion cards.
pub const PLAN_TITLE: &str = "Your Personalized Plan ✨";

const CARD_INDENT: &str = "   ";
const MIN_WIDTH: usize = 20;

/// One suggestion card: numbered area label, then the wrapped advice.
#[must_use]
pub fn render_card(index: usize, suggestion: &Suggestion, width: usize) -> String {
    let width = width.max(MIN_WIDTH);
    let options = Options::new(width)
        .initial_indent(CARD_INDENT)
        .subsequent_indent(CARD_INDENT);
    format!(
        "{}. {}\n{}\n",
        index + 1,
        suggestion.area(),
        textwrap::fill(suggestion.suggestion_text(), options)
    )
}

/// Full screen for the current session state.
#[must_use]
pub fn render_view(view: &SessionView, width: usize) -> String {
    let mut out = String::new();

    if let (Some(name), Some(preview)) = (&view.image_name, &view.preview_url) {
        out.push_str(&format!("Photo: {name} [{preview}]\n"));
    }

    match view.phase {
        Phase::Idle => {
            out.push_str("Upload a photo of your room to get smart, actionable decluttering suggestions.\n");
            out.push_str("Use `open <path>` with a JPEG, PNG or WEBP image.\n");
        }
        Phase::Ready => out.push_str("Ready. Type `analyze` to get suggestions.\n"),
        Phase::Loading => out.push_str("Analyzing your room...\n"),
        Phase::Success if view.suggestions.is_empty() => {
            out.push_str("No clutter found. This room already looks organized.\n");
        }
        Phase::Success => {
            out.push('\n');
            out.push_str(PLAN_TITLE);
            out.push_str("\n\n");
            for (index, suggestion) in view.suggestions.iter().enumerate() {
                out.push_str(&render_card(index, suggestion, width));
                out.push('\n');
            }
        }
        Phase::Failed => {
            if let Some(error) = &view.error {
                out.push_str(error);
                out.push('\n');
            }
        }
    }

    out
}
