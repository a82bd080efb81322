//! Movie metadata provider implementations.

use async_trait::async_trait;
use reelscout_core::MovieSummary;

use crate::Result;

pub mod demo;
pub mod mock;
pub mod tmdb;

pub use demo::DemoProvider;
#[cfg(test)]
pub use mock::MockProvider;
pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers.
///
/// Implementations provide search and discovery through different backends
/// (the TMDB HTTP API, built-in demo data, scripted mocks for testing).
#[async_trait]
pub trait MovieProvider: Send + Sync + std::fmt::Debug {
    /// Searches movies by title, or lists popular movies when `query` is
    /// empty.
    ///
    /// # Errors
    /// - `MovieQueryError::Transport` - Request failed or returned a bad status
    /// - `MovieQueryError::Provider` - Provider flagged the request as failed
    async fn fetch_movies(&self, query: &str) -> Result<Vec<MovieSummary>>;
}
