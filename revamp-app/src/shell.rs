//! Interactive shell: line commands drive the session while an analysis
//! runs in the background.

use std::io::Write;
use std::path::PathBuf;

use revamp_core::SessionView;
use revamp_llm::SuggestionService;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

use crate::app::{AnalyzeOutcome, Revamp};
use crate::render::render_view;

const HELP: &str = "\
Commands:
  open <path>   select a photo (jpg, png, webp)
  analyze       get decluttering suggestions for the selected photo
  reset         discard the photo and start over (alias: new)
  show          redraw the current state
  help          show this help
  quit          leave (alias: exit)";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `open <path>`
    Open(PathBuf),
    /// `analyze`
    Analyze,
    /// `reset` / `new`
    Reset,
    /// `show`
    Show,
    /// `help` / `?`
    Help,
    /// `quit` / `exit`
    Quit,
    /// Blank line.
    Empty,
    /// Anything else, with the reason.
    Invalid(String),
}

impl Command {
    /// Parse one input line.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));
        match word.to_ascii_lowercase().as_str() {
            "" => Self::Empty,
            "open" | "o" if rest.is_empty() => Self::Invalid("usage: open <path>".into()),
            "open" | "o" => Self::Open(PathBuf::from(unquote(rest))),
            "analyze" | "a" => Self::Analyze,
            "reset" | "new" => Self::Reset,
            "show" | "s" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => Self::Invalid(format!("unknown command `{other}`, type `help`")),
        }
    }
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .or_else(|| text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')))
        .unwrap_or(text)
}

async fn wait_pending(
    pending: &mut Option<JoinHandle<AnalyzeOutcome>>,
) -> Result<AnalyzeOutcome, JoinError> {
    match pending {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

/// Run the shell until `quit` or end of input.
///
/// At end of input an analysis still in flight is awaited and its result
/// shown, so piped scripts see their results.
///
/// # Errors
/// Fails only if reading input or writing output fails.
pub async fn run<S, R, W>(app: &Revamp<S>, input: R, out: &mut W, width: usize) -> anyhow::Result<()>
where
    S: SuggestionService + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut pending: Option<JoinHandle<AnalyzeOutcome>> = None;
    write!(out, "{}", render_view(&app.view(), width))?;

    loop {
        tokio::select! {
            done = wait_pending(&mut pending), if pending.is_some() => {
                pending = None;
                report(app, done, out, width)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    if let Some(handle) = pending.take() {
                        report(app, handle.await, out, width)?;
                    }
                    break;
                };
                match Command::parse(&line) {
                    Command::Empty => {}
                    Command::Open(path) => match app.select(&path) {
                        Ok(()) => write!(out, "{}", render_view(&app.view(), width))?,
                        Err(err) => writeln!(out, "{err}")?,
                    },
                    Command::Analyze => match app.spawn_analysis() {
                        Some(handle) => {
                            pending = Some(handle);
                            write!(out, "{}", render_view(&app.view(), width))?;
                        }
                        None => writeln!(out, "{}", analyze_refusal(&app.view()))?,
                    },
                    Command::Reset => {
                        app.reset();
                        write!(out, "{}", render_view(&app.view(), width))?;
                    }
                    Command::Show => write!(out, "{}", render_view(&app.view(), width))?,
                    Command::Help => writeln!(out, "{HELP}")?,
                    Command::Quit => break,
                    Command::Invalid(reason) => writeln!(out, "{reason}")?,
                }
            }
        }
        out.flush()?;
    }

    out.flush()?;
    Ok(())
}

fn report<S, W>(
    app: &Revamp<S>,
    done: Result<AnalyzeOutcome, JoinError>,
    out: &mut W,
    width: usize,
) -> anyhow::Result<()>
where
    S: SuggestionService + 'static,
    W: Write,
{
    match done {
        Ok(AnalyzeOutcome::Applied(phase)) => {
            debug!(?phase, "Analysis finished");
            write!(out, "{}", render_view(&app.view(), width))?;
        }
        Ok(outcome) => debug!(?outcome, "Analysis result not shown"),
        Err(err) => warn!("Analysis task failed: {}", err),
    }
    Ok(())
}

/// Why `analyze` was refused. Ready and Failed always issue a ticket, so
/// only these three cases reach here.
fn analyze_refusal(view: &SessionView) -> &'static str {
    if view.is_loading {
        "Already analyzing this photo."
    } else if view.image_name.is_none() {
        "Select a photo first: open <path>"
    } else {
        "Suggestions are already shown. Open a new photo or reset."
    }
}
