//! Tracing subscriber setup for the binary.
//!
//! Logs go to stderr so rendered cards on stdout stay clean. `RUST_LOG`
//! overrides `general.log_level`.

use anyhow::anyhow;
use revamp_core::config::GeneralConfig;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// # Errors
/// Fails if the configured level is not a valid filter or a subscriber is
/// already installed.
pub fn init(general: &GeneralConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&general.log_level)?,
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match general.log_format.as_str() {
        "json" => builder.json().try_init(),
        "text" => builder.try_init(),
        other => return Err(anyhow!("unknown log format `{other}` (expected text or json)")),
    };
    installed.map_err(|e| anyhow!(e))
}
