//! Bootstrap configuration loading and config file resolution
//!
//! Settings come from, in priority order:
//! 1. Command-line arguments (applied by the binary on top of [`TomlConfig`])
//! 2. Environment variables
//! 3. TOML config file
//! 4. Built-in defaults (code constants)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SONGVID_CONFIG";

/// Environment variable carrying the YouTube Data API key
pub const YOUTUBE_API_KEY_ENV_VAR: &str = "SONGVID_YOUTUBE_API_KEY";

/// Configuration loaded from the TOML file
///
/// Every section is optional; missing keys fall back to built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub logging: LoggingConfig,
    pub acquisition: AcquisitionConfig,
    pub search: SearchConfig,
    pub tools: ToolsConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Acquisition pipeline tuning
#[derive(Debug, Clone, Deserialize)]
pub struct AcquisitionConfig {
    /// Number of songs processed at once (1 = sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Deadline for a single video fetch, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Literal appended to every search query
    #[serde(default = "default_query_suffix")]
    pub query_suffix: String,

    /// Parenthetical artist annotations stripped before searching, e.g. `(wavegroup)`
    #[serde(default = "default_artist_noise_markers")]
    pub artist_noise_markers: Vec<String>,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            query_suffix: default_query_suffix(),
            artist_noise_markers: default_artist_noise_markers(),
        }
    }
}

/// Search collaborator selection
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// `yt-dlp` or `youtube-api`
    #[serde(default = "default_search_backend")]
    pub backend: String,

    /// YouTube Data API key, required by the `youtube-api` backend
    #[serde(default)]
    pub youtube_api_key: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: default_search_backend(),
            youtube_api_key: None,
        }
    }
}

/// External tool locations
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    /// yt-dlp executable (name on PATH or absolute path)
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: default_ytdlp_path(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_concurrency() -> usize {
    1
}

fn default_fetch_timeout_secs() -> u64 {
    600
}

fn default_query_suffix() -> String {
    "music video".to_string()
}

fn default_artist_noise_markers() -> Vec<String> {
    vec!["wavegroup".to_string()]
}

fn default_search_backend() -> String {
    "yt-dlp".to_string()
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration following the resolution order
    ///
    /// An explicitly named file (CLI or environment) must exist. The default
    /// location is optional; without it the built-in defaults are used.
    /// Call [`TomlConfig::validate`] once command-line overrides are applied.
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let mut config = match resolve_config_path(cli_path) {
            ConfigLocation::Explicit(path) => {
                info!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            ConfigLocation::Default(path) if path.is_file() => {
                info!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            ConfigLocation::Default(path) => {
                debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            ConfigLocation::None => Self::default(),
        };

        if let Ok(key) = std::env::var(YOUTUBE_API_KEY_ENV_VAR) {
            if is_valid_key(&key) {
                config.search.youtube_api_key = Some(key);
            }
        }

        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.acquisition.concurrency == 0 {
            return Err(Error::Config("acquisition.concurrency must be at least 1".to_string()));
        }
        if self.acquisition.fetch_timeout_secs == 0 {
            return Err(Error::Config(
                "acquisition.fetch_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where the config file was looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Named by CLI flag or environment variable
    Explicit(PathBuf),
    /// Platform default location, may not exist
    Default(PathBuf),
    /// No candidate location on this platform
    None,
}

/// Resolve the config file location
///
/// Priority: command-line argument, then `SONGVID_CONFIG`, then
/// `<config dir>/songvid/config.toml`.
pub fn resolve_config_path(cli_path: Option<&Path>) -> ConfigLocation {
    if let Some(path) = cli_path {
        return ConfigLocation::Explicit(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return ConfigLocation::Explicit(PathBuf::from(path));
        }
    }

    match dirs::config_dir() {
        Some(dir) => ConfigLocation::Default(dir.join("songvid").join("config.toml")),
        None => ConfigLocation::None,
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
