//! Search resolver
//!
//! Turns a song record into its single top-ranked video reference. The query
//! is `name`, the artist with known annotation noise removed, and a fixed
//! suffix that biases results toward official videos over audio uploads.
//!
//! Results are memoized on the record: a second `resolve` on the same record
//! returns the cached reference without calling the provider again.

use regex::Regex;
use std::borrow::Cow;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{SearchReference, SongRecord};
use crate::types::{SearchError, SearchProvider};

/// Resolution errors
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Provider answered with an empty result list
    #[error("No results found for '{query}'")]
    NoResultsFound { query: String },

    /// Provider itself failed
    #[error("Search failed: {0}")]
    Search(#[from] SearchError),
}

/// Builds normalized search queries
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    suffix: String,
    noise: Option<Regex>,
}

impl QueryBuilder {
    /// `markers` are annotation tokens such as `wavegroup`, matched
    /// case-insensitively inside parentheses
    pub fn new(suffix: impl Into<String>, markers: &[String]) -> Result<Self, regex::Error> {
        let tokens: Vec<String> = markers
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .map(regex::escape)
            .collect();

        let noise = if tokens.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(
                r"(?i)\s*\(\s*(?:{})\s*\)\s*",
                tokens.join("|")
            ))?)
        };

        Ok(Self {
            suffix: suffix.into(),
            noise,
        })
    }

    /// Artist with noise annotations and surrounding whitespace removed
    pub fn normalized_artist<'a>(&self, artist: &'a str) -> Cow<'a, str> {
        match &self.noise {
            Some(noise) if noise.is_match(artist) => {
                Cow::Owned(collapse_whitespace(&noise.replace_all(artist, " ")))
            }
            _ => Cow::Borrowed(artist),
        }
    }

    /// Full search query for a record
    pub fn query_for(&self, record: &SongRecord) -> String {
        let artist = self.normalized_artist(&record.artist);
        collapse_whitespace(&format!("{} {} {}", record.name, artist, self.suffix))
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves records to their top link through a [`SearchProvider`]
pub struct SearchResolver {
    provider: Arc<dyn SearchProvider>,
    queries: QueryBuilder,
}

impl SearchResolver {
    pub fn new(provider: Arc<dyn SearchProvider>, queries: QueryBuilder) -> Self {
        Self { provider, queries }
    }

    pub fn queries(&self) -> &QueryBuilder {
        &self.queries
    }

    /// Resolve the record's top link, searching at most once per record
    pub async fn resolve(&self, record: &mut SongRecord) -> Result<SearchReference, ResolveError> {
        if let Some(reference) = record.top_link() {
            return Ok(reference.clone());
        }

        let query = self.queries.query_for(record);
        tracing::debug!(
            provider = self.provider.name(),
            query = %query,
            "Searching for video"
        );

        let reference = self
            .provider
            .search(&query, 1)
            .await?
            .into_iter()
            .next()
            .ok_or(ResolveError::NoResultsFound { query })?;

        Ok(record.remember_top_link(reference).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSearch {
        results: Vec<SearchReference>,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl SearchProvider for FixedSearch {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn search(
            &self,
            _query: &str,
            max_results: usize,
        ) -> Result<Vec<SearchReference>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.results.iter().take(max_results).cloned().collect())
        }
    }

    fn builder() -> QueryBuilder {
        QueryBuilder::new("music video", &["wavegroup".to_string()]).unwrap()
    }

    #[test]
    fn test_query_strips_annotation() {
        let record = SongRecord::new("/music/A", "Foo", "Bar (wavegroup)");
        assert_eq!(builder().query_for(&record), "Foo Bar music video");
        // Stored artist untouched
        assert_eq!(record.artist, "Bar (wavegroup)");
    }

    #[test]
    fn test_strip_is_case_insensitive() {
        let queries = builder();
        assert_eq!(queries.normalized_artist("Bar (WaveGroup)"), "Bar");
        assert_eq!(queries.normalized_artist("Bar( wavegroup )"), "Bar");
        assert_eq!(queries.normalized_artist("Bar (wavegroup) & Baz"), "Bar & Baz");
    }

    #[test]
    fn test_unrelated_parentheses_kept() {
        let queries = builder();
        assert_eq!(queries.normalized_artist("Bar (feat. Baz)"), "Bar (feat. Baz)");
        assert!(matches!(queries.normalized_artist("Bar"), Cow::Borrowed("Bar")));
    }

    #[test]
    fn test_multiple_markers() {
        let queries =
            QueryBuilder::new("music video", &["wavegroup".to_string(), "c3".to_string()]).unwrap();
        assert_eq!(queries.normalized_artist("Bar (C3)"), "Bar");
    }

    #[test]
    fn test_no_markers() {
        let queries = QueryBuilder::new("official video", &[]).unwrap();
        let record = SongRecord::new("/music/A", "Foo", "Bar (wavegroup)");
        assert_eq!(queries.query_for(&record), "Foo Bar (wavegroup) official video");
    }

    #[test]
    fn test_artist_only_annotation() {
        let record = SongRecord::new("/music/A", "Foo", "(wavegroup)");
        assert_eq!(builder().query_for(&record), "Foo music video");
    }

    #[tokio::test]
    async fn test_resolve_is_memoized() {
        let provider = Arc::new(FixedSearch {
            results: vec!["R1".into(), "R2".into()],
            calls: AtomicUsize::new(0),
        });
        let resolver = SearchResolver::new(provider.clone(), builder());
        let mut record = SongRecord::new("/music/A", "Foo", "Bar");

        let first = resolver.resolve(&mut record).await.unwrap();
        let second = resolver.resolve(&mut record).await.unwrap();

        assert_eq!(first, SearchReference::from("R1"));
        assert_eq!(first, second);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_results_is_no_results_found() {
        let provider = Arc::new(FixedSearch {
            results: vec![],
            calls: AtomicUsize::new(0),
        });
        let resolver = SearchResolver::new(provider, builder());
        let mut record = SongRecord::new("/music/A", "Foo", "Bar (wavegroup)");

        let err = resolver.resolve(&mut record).await.unwrap_err();
        match err {
            ResolveError::NoResultsFound { query } => assert_eq!(query, "Foo Bar music video"),
            other => panic!("Expected NoResultsFound, got {:?}", other),
        }
        assert!(record.top_link().is_none());
    }
}
