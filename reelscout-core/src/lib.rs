//! Reelscout Core - Configuration, debouncing and trend tracking
//!
//! This crate provides the building blocks shared by the search session:
//! explicit configuration, the keystroke debouncer, the movie data model,
//! and the search-popularity store with its recorder and reader.

pub mod config;
pub mod debounce;
pub mod movie;
pub mod tracing_setup;
pub mod trending;

// Re-export main types for convenient access
pub use config::ReelscoutConfig;
pub use debounce::{DebouncerHandle, spawn_debouncer};
pub use movie::MovieSummary;
pub use trending::{
    AppwriteTrendStore, InMemoryTrendStore, TrendEntry, TrendRecorderHandle, TrendStore,
    TrendStoreError, list_trending, record_hit, spawn_trend_recorder,
};

/// Core errors that can bubble up from any Reelscout subsystem.
#[derive(Debug, thiserror::Error)]
pub enum ReelscoutError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results with ReelscoutError.
pub type Result<T> = std::result::Result<T, ReelscoutError>;
