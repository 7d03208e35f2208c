//! Free-text search over the in-memory catalog.

use crate::catalog::{CatalogStore, ShuffleReport, VideoRecord};
use crate::config::SearchConfig;
use crate::error::QueryError;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Upper bound on the terms of a structured query.
pub const MAX_QUERY_TERMS: usize = 32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Filter by title, category and keywords.
    #[default]
    Substring,
    /// Random draw, with repetition, from the whole catalog.
    Sampling,
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(SearchMode::Substring),
            "sampling" => Ok(SearchMode::Sampling),
            other => Err(format!("unknown search mode: {other}")),
        }
    }
}

/// Records found plus the time the lookup took.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub results: Vec<VideoRecord>,
    pub elapsed_ms: f64,
}

/// Split a raw query into search terms.
///
/// A plain query is a single term, lowercased but otherwise kept as typed, so
/// surrounding spaces take part in the substring match and only the empty string
/// yields no terms. In sampling mode a query that looks like a JSON array must be an
/// array of at most [`MAX_QUERY_TERMS`] strings; blank entries of the array are dropped.
pub fn parse_terms(raw: &str, mode: SearchMode) -> Result<Vec<String>, QueryError> {
    let trimmed = raw.trim();

    if mode == SearchMode::Sampling && trimmed.starts_with('[') {
        let terms: Vec<String> = serde_json::from_str(trimmed).map_err(|_| QueryError::NotATermList)?;
        if terms.len() > MAX_QUERY_TERMS {
            return Err(QueryError::TooManyTerms(terms.len(), MAX_QUERY_TERMS));
        }
        return Ok(terms
            .into_iter()
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect());
    }

    if raw.is_empty() {
        Ok(Vec::new())
    } else {
        Ok(vec![raw.to_lowercase()])
    }
}

/// Whether a lowercased term matches a record.
///
/// Substring of the title, exact category label, or substring of the joined keywords.
pub fn matches(record: &VideoRecord, term: &str) -> bool {
    record.title.to_lowercase().contains(term)
        || record.category.label().to_lowercase() == term
        || record.keywords.join(" ").to_lowercase().contains(term)
}

pub struct QueryService {
    store: Arc<CatalogStore>,
    config: SearchConfig,
}

impl QueryService {
    pub fn new(store: Arc<CatalogStore>, config: SearchConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    /// Answer a raw query. Never fails: a malformed query yields no results.
    pub async fn search(&self, raw_query: &str, limit: Option<usize>, mode: Option<SearchMode>) -> SearchResults {
        let start = Instant::now();
        let mode = mode.unwrap_or(self.config.default_mode);

        let results = match parse_terms(raw_query, mode) {
            Ok(terms) => self.search_terms(&terms, limit, mode).await,
            Err(e) => {
                warn!("Rejected query {:?}: {}", raw_query, e);
                Vec::new()
            }
        };

        info!("🔎 Search for '{}' ({:?}) found {} results", raw_query, mode, results.len());

        if self.config.shuffle_on_search {
            self.store.shuffle().await;
        }

        SearchResults {
            results,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        }
    }

    /// Search with already parsed, lowercased terms.
    ///
    /// Sampling draws at most `search.max_limit` records, whatever the requested limit.
    pub async fn search_terms(&self, terms: &[String], limit: Option<usize>, mode: SearchMode) -> Vec<VideoRecord> {
        let snapshot = self.store.snapshot().await;
        if snapshot.is_empty() {
            return Vec::new();
        }

        if mode == SearchMode::Sampling && !terms.is_empty() {
            let count = limit
                .unwrap_or(self.config.default_sample_size)
                .min(self.config.max_limit);
            let mut rng = rand::thread_rng();
            return (0..count)
                .filter_map(|_| snapshot.choose(&mut rng).cloned())
                .collect();
        }

        let limit = limit.unwrap_or(usize::MAX);
        snapshot
            .iter()
            .filter(|record| terms.is_empty() || terms.iter().any(|term| matches(record, term)))
            .take(limit)
            .cloned()
            .collect()
    }

    pub async fn shuffle(&self) -> ShuffleReport {
        let report = self.store.shuffle().await;
        debug!("Shuffled {} videos in {:.3}ms", report.catalog_size, report.elapsed_ms);
        report
    }
}
