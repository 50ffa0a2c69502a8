//! Component wiring from configuration
//!
//! Turns a resolved [`TomlConfig`] into the concrete search provider, fetcher
//! and orchestrator. Nothing here reads process state; the binary passes the
//! fully resolved configuration in.

use songvid_common::config::{is_valid_key, AcquisitionConfig, YOUTUBE_API_KEY_ENV_VAR};
use songvid_common::{Error, Result, TomlConfig};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::services::{
    AcquisitionOrchestrator, AcquisitionSettings, QueryBuilder, SearchResolver, YouTubeApiClient,
    YtDlpFetcher, YtDlpSearch,
};
use crate::types::{SearchProvider, VideoFetcher};

/// Search collaborator backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBackend {
    YtDlp,
    YouTubeApi,
}

impl FromStr for SearchBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yt-dlp" | "ytdlp" => Ok(Self::YtDlp),
            "youtube-api" | "youtube" => Ok(Self::YouTubeApi),
            other => Err(Error::Config(format!(
                "Unknown search backend '{}' (expected 'yt-dlp' or 'youtube-api')",
                other
            ))),
        }
    }
}

impl From<&AcquisitionConfig> for AcquisitionSettings {
    fn from(config: &AcquisitionConfig) -> Self {
        Self {
            concurrency: config.concurrency.max(1),
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
        }
    }
}

/// Build the configured search provider
pub fn build_search_provider(config: &TomlConfig) -> Result<Arc<dyn SearchProvider>> {
    match config.search.backend.parse::<SearchBackend>()? {
        SearchBackend::YtDlp => {
            info!("Searching with yt-dlp ({})", config.tools.ytdlp_path.display());
            Ok(Arc::new(YtDlpSearch::new(config.tools.ytdlp_path.clone())))
        }
        SearchBackend::YouTubeApi => {
            let key = config
                .search
                .youtube_api_key
                .as_deref()
                .filter(|k| is_valid_key(k))
                .ok_or_else(|| {
                    Error::Config(format!(
                        "YouTube API key not configured. Please configure using one of:\n\
                         1. Environment: {}=your-key-here\n\
                         2. TOML config: [search] youtube_api_key = \"your-key\"",
                        YOUTUBE_API_KEY_ENV_VAR
                    ))
                })?;
            let client =
                YouTubeApiClient::new(key).map_err(|e| Error::Config(e.to_string()))?;
            info!("Searching with the YouTube Data API");
            Ok(Arc::new(client))
        }
    }
}

/// Build the configured fetcher
pub fn build_fetcher(config: &TomlConfig) -> Arc<dyn VideoFetcher> {
    Arc::new(YtDlpFetcher::new(config.tools.ytdlp_path.clone()))
}

/// Build the query builder from the acquisition section
pub fn build_query_builder(config: &TomlConfig) -> Result<QueryBuilder> {
    QueryBuilder::new(
        config.acquisition.query_suffix.clone(),
        &config.acquisition.artist_noise_markers,
    )
    .map_err(|e| Error::Config(format!("Invalid artist_noise_markers: {}", e)))
}

/// Build the orchestrator with all collaborators wired in
pub fn build_orchestrator(config: &TomlConfig) -> Result<AcquisitionOrchestrator> {
    let resolver = SearchResolver::new(build_search_provider(config)?, build_query_builder(config)?);
    Ok(AcquisitionOrchestrator::new(
        resolver,
        build_fetcher(config),
        AcquisitionSettings::from(&config.acquisition),
    ))
}
