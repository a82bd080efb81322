//! CLI command implementations

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Subcommand, ValueEnum};
use reelscout_core::{
    AppwriteTrendStore, InMemoryTrendStore, ReelscoutConfig, TrendStore, list_trending,
};
use reelscout_search::{DemoProvider, MovieProvider, TmdbProvider};
use tokio::io::BufReader;

use crate::session;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive search session reading queries from stdin
    Search {
        #[command(flatten)]
        store: StoreArgs,
        /// Use the built-in demo catalog instead of the movie provider
        #[arg(long)]
        demo: bool,
        /// Quiet interval before a typed value is searched
        #[arg(long)]
        debounce_ms: Option<u64>,
        /// Number of trending entries shown
        #[arg(long)]
        trending_limit: Option<usize>,
    },
    /// Print the current trending searches and exit
    Trending {
        #[command(flatten)]
        store: StoreArgs,
        /// Seed the in-memory store with demo counters
        #[arg(long)]
        demo: bool,
        /// Number of entries to print
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

/// Search counter storage selection
#[derive(Args)]
pub struct StoreArgs {
    /// Where search counters are kept
    #[arg(long, value_enum, default_value_t = StoreKind::Memory)]
    pub store: StoreKind,
}

/// Search counter backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Process-local counters, lost on exit
    Memory,
    /// Appwrite documents collection
    Appwrite,
}

/// Handle the CLI command
///
/// # Errors
/// Returns the setup or I/O failure of the command that fails
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let mut config = ReelscoutConfig::from_env();

    match command {
        Commands::Search {
            store,
            demo,
            debounce_ms,
            trending_limit,
        } => {
            if let Some(millis) = debounce_ms {
                config.session.debounce_interval = Duration::from_millis(millis);
            }
            if let Some(limit) = trending_limit {
                config.session.trending_limit = limit;
            }

            let store = build_store(store.store, demo, &config)?;
            let provider = build_provider(demo, &config)?;
            let input = BufReader::new(tokio::io::stdin());
            let mut output = tokio::io::stdout();
            session::run_session(config, store, provider, input, &mut output).await
        }
        Commands::Trending { store, demo, limit } => {
            let limit = limit.unwrap_or(config.session.trending_limit);
            let store = build_store(store.store, demo, &config)?;
            show_trending(store.as_ref(), limit).await
        }
    }
}

/// Build the configured search counter store
///
/// With `demo`, the in-memory store starts with the demo catalog's counters;
/// a remote store is never seeded.
///
/// # Errors
/// - Appwrite store HTTP client cannot be built
pub fn build_store(
    kind: StoreKind,
    demo: bool,
    config: &ReelscoutConfig,
) -> anyhow::Result<Arc<dyn TrendStore>> {
    match kind {
        StoreKind::Memory if demo => {
            let seed = DemoProvider::new().trending_seed(&config.provider.image_base_url);
            Ok(Arc::new(InMemoryTrendStore::seeded(seed)))
        }
        StoreKind::Memory => Ok(Arc::new(InMemoryTrendStore::new())),
        StoreKind::Appwrite => {
            let store_config = &config.trend_store;
            if store_config.project_id.is_empty() || store_config.collection_id.is_empty() {
                tracing::warn!(
                    "APPWRITE_PROJECT_ID or APPWRITE_COLLECTION_ID not set, store requests will fail"
                );
            }
            let store = AppwriteTrendStore::new(store_config)
                .context("Failed to set up the Appwrite trend store")?;
            Ok(Arc::new(store))
        }
    }
}

/// Build the movie provider
///
/// # Errors
/// - Provider HTTP client cannot be built
pub fn build_provider(
    demo: bool,
    config: &ReelscoutConfig,
) -> anyhow::Result<Arc<dyn MovieProvider>> {
    if demo {
        tracing::info!("Using demo movie catalog");
        return Ok(Arc::new(DemoProvider::new()));
    }

    if config.provider.api_key.is_none() {
        tracing::warn!("TMDB_API_KEY not set, movie requests will be rejected");
    }
    let provider =
        TmdbProvider::new(&config.provider).context("Failed to set up the movie provider")?;
    Ok(Arc::new(provider))
}

/// Print the top trending searches
///
/// # Errors
/// - Trend store could not be read
pub async fn show_trending(store: &dyn TrendStore, limit: usize) -> anyhow::Result<()> {
    let entries = list_trending(store, limit)
        .await
        .context("Failed to load trending searches")?;

    if entries.is_empty() {
        println!("No trending searches yet");
        return Ok(());
    }

    println!("Trending Movies");
    for (index, entry) in entries.iter().enumerate() {
        println!(
            "  {}. {} ({} searches)  {}",
            index + 1,
            entry.search_term,
            entry.count,
            entry.poster_url
        );
    }

    Ok(())
}
