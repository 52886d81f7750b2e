//! Configuration for Room Revamp.
//!
//! Maps to `revamp.toml`. Sources, lowest precedence first: built-in
//! defaults, the TOML file, `REVAMP_*` environment variables (`__`
//! separates sections, e.g. `REVAMP_SERVICE__MODEL`), and `API_KEY` for
//! the service credential. A missing credential is a startup error.

use std::fmt;
use std::path::Path;

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the service credential.
pub const API_KEY_ENV: &str = "API_KEY";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "REVAMP";

/// Configuration failures. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No service credential was provided.
    #[error("API_KEY environment variable is not set (or service.api_key is empty)")]
    MissingCredential,

    /// A value is out of range or empty.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Layered sources could not be read or merged.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// A TOML document could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A configuration file could not be read.
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevampConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Suggestion service settings.
    #[serde(default)]
    pub service: ServiceConfig,
}

impl RevampConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load layered configuration: defaults, then `path` (or `revamp.toml`
    /// in the working directory if present), then the environment.
    ///
    /// Does not validate; call [`RevampConfig::validate`] before use.
    ///
    /// # Errors
    /// Returns [`ConfigError::Load`] if an explicit file is missing or any
    /// source is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("revamp").required(false)),
        };
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("service.api_key", std::env::var(API_KEY_ENV).ok())?
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Check that the configuration is usable.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingCredential`] without an API key and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.service.validate()
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log format: "text" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

/// Hosted model settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service credential. Never serialized or printed.
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature; low values favor consistent output.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Hard timeout for the call in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServiceConfig {
    /// Defaults with the given credential.
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Check that the service settings are usable.
    ///
    /// # Errors
    /// See [`RevampConfig::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential);
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("service.base_url is empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("service.model is empty".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "service.temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid("service.request_timeout_ms must be > 0".into()));
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            request_timeout_ms: default_timeout_ms(),
        }
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.api_key.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("ServiceConfig")
            .field("api_key", &key)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_timeout_ms() -> u64 {
    60_000
}
