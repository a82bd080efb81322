//! Session view controller.
//!
//! Owns the view state and drives it from debounced queries and the
//! one-time trending load. State lives in a `watch` channel; every mutation
//! happens under the channel's lock, which makes "issue a new generation"
//! and "apply a response if it is still the latest" atomic with respect to
//! each other.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use reelscout_core::config::SessionConfig;
use reelscout_core::{MovieSummary, TrendEntry, TrendStore, list_trending};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::client::SearchClient;
use crate::errors::MovieQueryError;

/// Main section state: exactly one is active at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchResultState {
    /// No query has settled yet.
    #[default]
    Idle,
    /// A fetch for the current query is in flight.
    Loading,
    /// The last fetch failed; holds the user-facing message.
    Error(String),
    /// The last fetch succeeded; the list may be empty.
    Ready(Vec<MovieSummary>),
}

/// Everything a front-end needs to render the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Debounced query the main section reflects
    pub query: String,
    /// Main section state
    pub results: SearchResultState,
    /// Trending entries, loaded once per session
    pub trending: Vec<TrendEntry>,
    /// Generation of the most recently issued fetch
    pub generation: u64,
}

/// Orchestrates searches and the trending load for one session.
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct ViewController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    client: SearchClient,
    store: Arc<dyn TrendStore>,
    trending_limit: usize,
    state: watch::Sender<ViewState>,
    mounted: AtomicBool,
}

impl std::fmt::Debug for ViewController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewController")
            .field("state", &*self.inner.state.borrow())
            .field("mounted", &self.inner.mounted.load(Ordering::Relaxed))
            .finish()
    }
}

impl ViewController {
    /// Creates a controller in the `Idle` state with an empty trending list.
    pub fn new(client: SearchClient, store: Arc<dyn TrendStore>, config: &SessionConfig) -> Self {
        let (state, _) = watch::channel(ViewState::default());

        Self {
            inner: Arc::new(ControllerInner {
                client,
                store,
                trending_limit: config.trending_limit,
                state,
                mounted: AtomicBool::new(false),
            }),
        }
    }

    /// Subscribes to view state changes.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.state.subscribe()
    }

    /// Returns a copy of the current view state.
    pub fn state(&self) -> ViewState {
        self.inner.state.borrow().clone()
    }

    /// Starts the one-time trending load.
    ///
    /// Returns the load task on the first call and `None` afterwards. A
    /// failed load is logged and leaves the trending list empty.
    pub fn mount(&self) -> Option<JoinHandle<()>> {
        if self.inner.mounted.swap(true, Ordering::SeqCst) {
            tracing::debug!("Session already mounted, trending not reloaded");
            return None;
        }

        let inner = self.inner.clone();
        Some(tokio::spawn(async move {
            match list_trending(inner.store.as_ref(), inner.trending_limit).await {
                Ok(trending) => {
                    inner.state.send_modify(|state| state.trending = trending);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load trending movies");
                }
            }
        }))
    }

    /// Enters `Loading` for a newly settled query and starts its fetch.
    ///
    /// The fetch is tagged with a fresh generation; when it resolves, its
    /// outcome is applied only if no newer query has been issued since.
    pub fn apply_debounced_query(&self, query: String) -> JoinHandle<()> {
        let mut generation = 0;
        self.inner.state.send_modify(|state| {
            state.generation += 1;
            generation = state.generation;
            state.query = query.clone();
            state.results = SearchResultState::Loading;
        });
        tracing::debug!(%query, generation, "Search issued");

        let inner = self.inner.clone();
        tokio::spawn(async move {
            let outcome = inner.client.fetch_movies(&query).await;
            apply_outcome(&inner.state, generation, outcome);
        })
    }

    /// Applies every debounced query until the channel closes.
    pub async fn run(self, mut debounced: mpsc::Receiver<String>) {
        while let Some(query) = debounced.recv().await {
            self.apply_debounced_query(query);
        }
        tracing::debug!("Debounced query stream closed");
    }
}

fn apply_outcome(
    state: &watch::Sender<ViewState>,
    generation: u64,
    outcome: Result<Vec<MovieSummary>, MovieQueryError>,
) {
    let applied = state.send_if_modified(|view| {
        if view.generation != generation {
            return false;
        }

        view.results = match &outcome {
            Ok(movies) => SearchResultState::Ready(movies.clone()),
            Err(e) => SearchResultState::Error(e.user_message()),
        };
        true
    });

    match (&outcome, applied) {
        (_, false) => {
            tracing::debug!(generation, "Discarding response superseded by a newer search");
        }
        (Ok(movies), true) => {
            tracing::debug!(generation, count = movies.len(), "Search results applied");
        }
        (Err(e), true) => {
            tracing::warn!(generation, error = %e, "Search failed");
        }
    }
}
