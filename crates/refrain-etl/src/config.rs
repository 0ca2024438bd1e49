use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::sentiment::ScorerKind;

/// Environment variable read for the Genius token when the config omits it.
pub const GENIUS_TOKEN_ENV: &str = "GENIUS_API_TOKEN";

const DEFAULT_GENIUS_BASE_URL: &str = "https://genius.com";

/// Configuration for refrain.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (REFRAIN_* prefix)
/// 3. Config file (~/.config/refrain/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Genius API token, sent as a bearer credential on search requests.
    ///
    /// Can be set via:
    /// - ENV: REFRAIN_GENIUS_API_TOKEN or GENIUS_API_TOKEN
    /// - Config: genius_api_token = "..."
    pub genius_api_token: Option<String>,

    /// Base URL for search and song-page requests.
    #[serde(default = "default_genius_base_url")]
    pub genius_base_url: String,

    /// Per-request timeout. Unset leaves the HTTP client's default.
    pub request_timeout_secs: Option<u64>,

    /// Upper bound on outbound requests per second. Unset means no pacing.
    pub requests_per_second: Option<u32>,

    /// Which sentiment strategy scores the lyrics.
    #[serde(default)]
    pub scorer: ScorerKind,

    /// VADER-format lexicon replacing the built-in one.
    pub lexicon_path: Option<PathBuf>,

    /// Fitted vectorizer artifact (required by the classifier scorer).
    pub vectorizer_path: Option<PathBuf>,

    /// Trained model artifact (required by the classifier scorer).
    pub model_path: Option<PathBuf>,

    /// Directory holding one streaming-history sub-directory per user.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory the combined and enriched exports are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logger settings applied by the binary at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_coloured")]
    pub coloured: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            coloured: default_coloured(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            genius_api_token: None,
            genius_base_url: default_genius_base_url(),
            request_timeout_secs: None,
            requests_per_second: None,
            scorer: ScorerKind::default(),
            lexicon_path: None,
            vectorizer_path: None,
            model_path: None,
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/refrain/config.toml
    /// Reads environment variables with REFRAIN_ prefix, then falls back to
    /// `GENIUS_API_TOKEN` for the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("refrain");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let mut config: Self = builder.build().context("Failed to build configuration")?;

        config.genius_api_token = resolve_token(
            config.genius_api_token.take(),
            std::env::var(GENIUS_TOKEN_ENV).ok(),
        );

        Ok(config)
    }

    /// The configured request timeout, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Pick the configured token, else the environment one; blank values count
/// as unset.
fn resolve_token(configured: Option<String>, from_env: Option<String>) -> Option<String> {
    configured
        .into_iter()
        .chain(from_env)
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
}

fn default_genius_base_url() -> String {
    DEFAULT_GENIUS_BASE_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_coloured() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Returns: ~/.local/share/refrain/output (or platform equivalent)
fn default_output_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("refrain")
        .join("output")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/refrain/config.toml
/// - macOS: ~/Library/Application Support/refrain/config.toml
/// - Windows: %APPDATA%\refrain\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("refrain")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Refrain Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (REFRAIN_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Genius API token. Optional: searches also work unauthenticated.
#
# Can also be set via:
# - Environment: REFRAIN_GENIUS_API_TOKEN=... or GENIUS_API_TOKEN=...
#genius_api_token = "your-genius-token-here"

# Where searches and song pages are requested from
#genius_base_url = "https://genius.com"

# Per-request timeout in seconds (default: HTTP client default)
#request_timeout_secs = 20

# Space out requests to at most this many per second (default: no pacing)
#requests_per_second = 2

# Sentiment strategy: "lexicon" or "classifier"
scorer = "lexicon"

# Replace the built-in lexicon with a VADER-format file
#lexicon_path = "/path/to/vader_lexicon.txt"

# Classifier artifacts, required when scorer = "classifier"
#vectorizer_path = "/path/to/vectorizer.json"
#model_path = "/path/to/model.json"

# One sub-directory of streaming-history JSON files per user
data_dir = "data"

# Where exports are written
#output_dir = "/path/to/output"

[logging]
level = "info"
coloured = true
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
