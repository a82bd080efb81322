//! Movie query client.
//!
//! Wraps a provider and feeds successful searches into the background trend
//! recorder. Recording is queued, never awaited, so its failures cannot
//! change the outcome of a search.

use std::sync::Arc;

use reelscout_core::{MovieSummary, TrendRecorderHandle};

use crate::Result;
use crate::providers::MovieProvider;

/// Search client combining a movie provider with trend recording.
#[derive(Debug, Clone)]
pub struct SearchClient {
    provider: Arc<dyn MovieProvider>,
    recorder: TrendRecorderHandle,
}

impl SearchClient {
    /// Creates a client over `provider` that reports hits to `recorder`.
    pub fn new(provider: Arc<dyn MovieProvider>, recorder: TrendRecorderHandle) -> Self {
        Self { provider, recorder }
    }

    /// Fetches movies for `query`; an empty query discovers popular movies.
    ///
    /// When the query is non-empty and at least one movie comes back, the
    /// query and its top result are queued for trend recording.
    ///
    /// # Errors
    /// - `MovieQueryError::Transport` - Request failed or returned a bad status
    /// - `MovieQueryError::Provider` - Provider flagged the request as failed
    pub async fn fetch_movies(&self, query: &str) -> Result<Vec<MovieSummary>> {
        let movies = self.provider.fetch_movies(query).await?;

        if !query.is_empty()
            && let Some(top) = movies.first()
        {
            self.recorder.record(query, top);
        }

        Ok(movies)
    }
}

#[cfg(test)]
mod tests {
    use reelscout_core::config::ReelscoutConfig;
    use reelscout_core::{InMemoryTrendStore, spawn_trend_recorder};

    use super::*;
    use crate::errors::MovieQueryError;
    use crate::providers::MockProvider;

    fn client_with(provider: MockProvider) -> (SearchClient, Arc<InMemoryTrendStore>, TrendRecorderHandle) {
        let store = Arc::new(InMemoryTrendStore::new());
        let recorder = spawn_trend_recorder(store.clone(), &ReelscoutConfig::default());
        let client = SearchClient::new(Arc::new(provider), recorder.clone());
        (client, store, recorder)
    }

    #[tokio::test]
    async fn test_successful_search_records_top_result() {
        let results = vec![MockProvider::movie(268, "Batman"), MockProvider::movie(414906, "The Batman")];
        let (client, store, recorder) = client_with(MockProvider::new().reply("batman", Ok(results)));

        let movies = client.fetch_movies("batman").await.unwrap();
        recorder.flush().await.unwrap();

        assert_eq!(movies.len(), 2);
        let entries = store.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].search_term, "batman");
        assert_eq!(entries[0].movie_id, 268);
        assert_eq!(entries[0].count, 1);
    }

    #[tokio::test]
    async fn test_discover_and_empty_results_are_not_recorded() {
        let popular = vec![MockProvider::movie(603, "The Matrix")];
        let (client, store, recorder) = client_with(
            MockProvider::new()
                .reply("", Ok(popular))
                .reply("zzzz", Ok(Vec::new())),
        );

        assert_eq!(client.fetch_movies("").await.unwrap().len(), 1);
        assert!(client.fetch_movies("zzzz").await.unwrap().is_empty());
        recorder.flush().await.unwrap();

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_is_not_recorded() {
        let failure = MovieQueryError::Provider {
            message: "Invalid API key".to_string(),
        };
        let (client, store, recorder) =
            client_with(MockProvider::new().reply("batman", Err(failure.clone())));

        assert_eq!(client.fetch_movies("batman").await, Err(failure));
        recorder.flush().await.unwrap();

        assert!(store.is_empty());
    }
}
