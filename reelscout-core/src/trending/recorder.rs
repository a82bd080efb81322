//! Background recording of search hits.
//!
//! Hits are queued by the search flow and applied to the store by a single
//! worker task, one at a time. Sequential processing means two hits for the
//! same term never race into duplicate counters, and store failures end at
//! the worker where they are logged.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

use super::{NewTrendEntry, TrendEntry, TrendStore, TrendStoreError, normalize_search_term};
use crate::config::ReelscoutConfig;
use crate::movie::MovieSummary;

/// Applies one search hit to the store.
///
/// Looks up the counter for the normalized query; increments it when found,
/// otherwise creates it with a count of one and the chosen movie's
/// identifier and poster URL.
///
/// # Errors
/// - `TrendStoreError::EmptySearchTerm` - Query is blank after normalization
/// - Any error reported by the store while looking up, creating or updating
pub async fn record_hit(
    store: &dyn TrendStore,
    query: &str,
    movie: &MovieSummary,
    image_base_url: &str,
) -> Result<TrendEntry, TrendStoreError> {
    let search_term = normalize_search_term(query);
    if search_term.is_empty() {
        return Err(TrendStoreError::EmptySearchTerm);
    }

    match store.find_by_term(&search_term).await? {
        Some(existing) => {
            tracing::debug!(%search_term, count = existing.count, "Incrementing search counter");
            store.increment(&existing).await
        }
        None => {
            tracing::debug!(%search_term, movie_id = movie.id, "Creating search counter");
            store
                .create(NewTrendEntry {
                    search_term,
                    movie_id: movie.id,
                    poster_url: movie.poster_url(image_base_url).unwrap_or_default(),
                })
                .await
        }
    }
}

/// Returned when the recorder worker is no longer running.
#[derive(Debug, Error)]
#[error("Trend recorder has stopped")]
pub struct RecorderStopped;

/// Commands processed by the recorder worker.
#[derive(Debug)]
enum RecorderCommand {
    /// Record one hit for a query and its top result.
    Record { query: String, movie: MovieSummary },
    /// Reply once every previously queued command has been processed.
    Flush { responder: oneshot::Sender<()> },
}

/// Handle for queueing search hits on the recorder worker.
///
/// Cloning is cheap. The worker stops once every handle is dropped and the
/// queue has drained.
#[derive(Debug, Clone)]
pub struct TrendRecorderHandle {
    sender: mpsc::Sender<RecorderCommand>,
}

impl TrendRecorderHandle {
    /// Queues a hit without waiting.
    ///
    /// Returns false when the hit was dropped because the queue is full or
    /// the worker has stopped; the drop is logged and never surfaces to the
    /// search flow.
    pub fn record(&self, query: &str, movie: &MovieSummary) -> bool {
        let command = RecorderCommand::Record {
            query: query.to_string(),
            movie: movie.clone(),
        };

        match self.sender.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(query, "Trend recorder queue full, dropping hit");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!(query, "Trend recorder stopped, dropping hit");
                false
            }
        }
    }

    /// Waits until every hit queued before this call has been processed.
    ///
    /// # Errors
    /// - `RecorderStopped` - The worker is no longer running
    pub async fn flush(&self) -> Result<(), RecorderStopped> {
        let (responder, rx) = oneshot::channel();
        self.sender
            .send(RecorderCommand::Flush { responder })
            .await
            .map_err(|_| RecorderStopped)?;

        rx.await.map_err(|_| RecorderStopped)
    }
}

/// Spawns the recorder worker and returns its handle.
///
/// Uses the provider's image base to build poster URLs and the session's
/// queue capacity.
pub fn spawn_trend_recorder(
    store: Arc<dyn TrendStore>,
    config: &ReelscoutConfig,
) -> TrendRecorderHandle {
    let (sender, receiver) = mpsc::channel(config.session.recorder_queue_capacity.max(1));
    let image_base_url = config.provider.image_base_url.clone();

    tokio::spawn(async move {
        run_recorder_loop(store, image_base_url, receiver).await;
    });

    TrendRecorderHandle { sender }
}

async fn run_recorder_loop(
    store: Arc<dyn TrendStore>,
    image_base_url: String,
    mut receiver: mpsc::Receiver<RecorderCommand>,
) {
    tracing::debug!("Trend recorder started");

    while let Some(command) = receiver.recv().await {
        match command {
            RecorderCommand::Record { query, movie } => {
                match record_hit(store.as_ref(), &query, &movie, &image_base_url).await {
                    Ok(entry) => {
                        tracing::debug!(
                            search_term = %entry.search_term,
                            count = entry.count,
                            "Search hit recorded"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(%query, error = %e, "Failed to record search hit");
                    }
                }
            }
            RecorderCommand::Flush { responder } => {
                let _ = responder.send(());
            }
        }
    }

    tracing::debug!("Trend recorder stopped");
}
