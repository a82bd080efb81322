//! Mock provider implementation for testing.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::time::Duration;

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use parking_lot::Mutex;
#[cfg(test)]
use reelscout_core::MovieSummary;

#[cfg(test)]
use super::MovieProvider;
#[cfg(test)]
use crate::errors::MovieQueryError;

/// Scripted reply for one query.
#[cfg(test)]
#[derive(Debug, Clone)]
struct ScriptedReply {
    delay: Duration,
    result: Result<Vec<MovieSummary>, MovieQueryError>,
}

/// Mock provider for testing.
///
/// Replies are scripted per query, optionally after a delay, and every
/// query is logged. Unscripted queries return an empty list.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockProvider {
    replies: Mutex<HashMap<String, ScriptedReply>>,
    calls: Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockProvider {
    /// Creates a mock with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the reply for `query`.
    pub fn reply(self, query: &str, result: Result<Vec<MovieSummary>, MovieQueryError>) -> Self {
        self.reply_after(query, Duration::ZERO, result)
    }

    /// Scripts the reply for `query`, delivered after `delay`.
    pub fn reply_after(
        self,
        query: &str,
        delay: Duration,
        result: Result<Vec<MovieSummary>, MovieQueryError>,
    ) -> Self {
        self.replies
            .lock()
            .insert(query.to_string(), ScriptedReply { delay, result });
        self
    }

    /// Queries received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Builds a movie with the given id and title.
    pub fn movie(id: u64, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            poster_path: Some(format!("/{id}.jpg")),
            popularity: 10.0,
            vote_average: Some(7.0),
            release_date: Some("2020-01-01".to_string()),
            original_language: Some("en".to_string()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl MovieProvider for MockProvider {
    async fn fetch_movies(&self, query: &str) -> Result<Vec<MovieSummary>, MovieQueryError> {
        self.calls.lock().push(query.to_string());
        let scripted = self.replies.lock().get(query).cloned();

        match scripted {
            Some(reply) => {
                if !reply.delay.is_zero() {
                    tokio::time::sleep(reply.delay).await;
                }
                reply.result
            }
            None => Ok(Vec::new()),
        }
    }
}
