//! Search popularity tracking.
//!
//! Every successful non-empty search bumps a counter for its normalized
//! search term in a remote document store; the trending section shows the
//! terms with the highest counts.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod appwrite;
pub mod memory;
pub mod reader;
pub mod recorder;

pub use appwrite::AppwriteTrendStore;
pub use memory::InMemoryTrendStore;
pub use reader::list_trending;
pub use recorder::{RecorderStopped, TrendRecorderHandle, record_hit, spawn_trend_recorder};

/// Search counter persisted in the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendEntry {
    /// Store-assigned document identifier
    pub id: String,
    /// Normalized search term, unique per store
    pub search_term: String,
    /// Number of recorded hits
    pub count: u64,
    /// Provider identifier of the top result when the entry was created
    pub movie_id: u64,
    /// Poster URL of that movie, empty when it had no poster
    pub poster_url: String,
    /// Time of the last create or increment
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a counter for a term seen for the first time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrendEntry {
    pub search_term: String,
    pub movie_id: u64,
    pub poster_url: String,
}

/// Errors raised by trend store backends.
#[derive(Debug, Error)]
pub enum TrendStoreError {
    /// The request never produced a response.
    #[error("Trend store request failed: {reason}")]
    Request { reason: String },

    /// The store answered with a non-success status.
    #[error("Trend store returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("Failed to decode trend store response: {reason}")]
    Decode { reason: String },

    /// No entry exists with the given identifier.
    #[error("Trend entry not found: {id}")]
    NotFound { id: String },

    /// An entry for the search term already exists.
    #[error("Trend entry already exists for '{search_term}'")]
    Conflict { search_term: String },

    /// The search term is empty after normalization.
    #[error("Search term is empty")]
    EmptySearchTerm,
}

/// Persistence backend for search counters.
///
/// Implementations only need equality lookup, create, single-field update
/// and an ordered listing; the read-modify-write sequence lives in
/// [`record_hit`].
#[async_trait]
pub trait TrendStore: Send + Sync + std::fmt::Debug {
    /// Finds the entry for an already normalized search term.
    ///
    /// # Errors
    /// - `TrendStoreError::Request` - Store unreachable
    /// - `TrendStoreError::Status` - Store rejected the query
    /// - `TrendStoreError::Decode` - Malformed response
    async fn find_by_term(&self, search_term: &str) -> Result<Option<TrendEntry>, TrendStoreError>;

    /// Creates an entry with a count of one.
    ///
    /// # Errors
    /// - `TrendStoreError::Conflict` - Entry for the term already exists
    /// - `TrendStoreError::Request` / `Status` / `Decode` - Transport failures
    async fn create(&self, entry: NewTrendEntry) -> Result<TrendEntry, TrendStoreError>;

    /// Increments the stored count of an existing entry by one.
    ///
    /// # Errors
    /// - `TrendStoreError::NotFound` - Entry was removed from the store
    /// - `TrendStoreError::Request` / `Status` / `Decode` - Transport failures
    async fn increment(&self, entry: &TrendEntry) -> Result<TrendEntry, TrendStoreError>;

    /// Lists up to `limit` entries, highest count first.
    ///
    /// # Errors
    /// - `TrendStoreError::Request` / `Status` / `Decode` - Transport failures
    async fn list_top(&self, limit: usize) -> Result<Vec<TrendEntry>, TrendStoreError>;
}

/// Normalizes a raw query into the key used for counters.
///
/// Trims, collapses inner whitespace and lowercases, so `"  The  Batman"`
/// and `"the batman"` share one counter.
pub fn normalize_search_term(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}

/// Trending order: count descending, then most recently updated, then
/// search term ascending.
pub fn trending_order(a: &TrendEntry, b: &TrendEntry) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| b.updated_at.cmp(&a.updated_at))
        .then_with(|| a.search_term.cmp(&b.search_term))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn entry(term: &str, count: u64, second: u32) -> TrendEntry {
        TrendEntry {
            id: term.to_string(),
            search_term: term.to_string(),
            count,
            movie_id: 1,
            poster_url: String::new(),
            updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, second).unwrap(),
        }
    }

    #[test]
    fn test_normalize_search_term() {
        assert_eq!(normalize_search_term("  The   Batman "), "the batman");
        assert_eq!(normalize_search_term("DUNE"), "dune");
        assert_eq!(normalize_search_term(" \t "), "");
    }

    #[test]
    fn test_trending_order_breaks_ties_by_recency_then_term() {
        let mut entries = vec![
            entry("alien", 3, 0),
            entry("dune", 7, 0),
            entry("heat", 3, 30),
            entry("brazil", 3, 0),
        ];
        entries.sort_by(trending_order);

        let terms: Vec<&str> = entries.iter().map(|e| e.search_term.as_str()).collect();
        assert_eq!(terms, vec!["dune", "heat", "alien", "brazil"]);
    }
}
