//! `revamp` — decluttering suggestions for a photo of your room.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use revamp_app::render::render_view;
use revamp_app::{Revamp, logging, shell};
use revamp_core::{Phase, RevampConfig};
use revamp_llm::SuggestionClient;
use tracing::info;

#[derive(Parser)]
#[command(name = "revamp", version, about = "Upload a photo of your room, get decluttering suggestions")]
struct Cli {
    /// Configuration file (defaults to ./revamp.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the model name
    #[arg(long, global = true)]
    model: Option<String>,

    /// Wrap width for suggestion cards
    #[arg(long, global = true, default_value_t = 80)]
    width: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one photo and print the suggestions
    Analyze {
        /// Photo of the room (jpg, jpeg, png, webp)
        image: PathBuf,

        /// Print suggestions as a JSON array instead of cards
        #[arg(long)]
        json: bool,
    },
    /// Interactive session: open, analyze, reset
    Shell {
        /// Photo to open right away
        image: Option<PathBuf>,
    },
    /// Print the effective configuration (without the API key)
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = RevampConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(model) = cli.model {
        config.service.model = model;
    }
    logging::init(&config.general).context("initializing logging")?;

    if let Commands::Config = cli.command {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    config.validate().context("refusing to start")?;
    let client = SuggestionClient::new(config.service.clone())?;
    info!(model = %client.model(), "Suggestion client ready");
    let app = Revamp::new(client);

    match cli.command {
        Commands::Analyze { image, json } => {
            app.select(&image)
                .with_context(|| format!("cannot open {}", image.display()))?;
            app.analyze().await;
            let view = app.view();
            let mut stdout = std::io::stdout().lock();
            if json && view.phase == Phase::Success {
                writeln!(stdout, "{}", serde_json::to_string_pretty(&view.suggestions)?)?;
            } else {
                write!(stdout, "{}", render_view(&view, cli.width))?;
            }
            Ok(if view.phase == Phase::Failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::Shell { image } => {
            if let Some(image) = image {
                app.select(&image)
                    .with_context(|| format!("cannot open {}", image.display()))?;
            }
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            shell::run(&app, input, &mut std::io::stdout(), cli.width).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config => Ok(ExitCode::SUCCESS),
    }
}
