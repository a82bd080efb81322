//! Centralized configuration for Reelscout.
//!
//! All endpoints, credentials and timing parameters are defined here and
//! handed to components at construction time. Nothing reads the environment
//! after startup.

use std::time::Duration;

/// Central configuration for all Reelscout components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct ReelscoutConfig {
    pub provider: ProviderConfig,
    pub trend_store: TrendStoreConfig,
    pub session: SessionConfig,
}

/// Movie metadata provider configuration.
///
/// Controls where search and discovery requests are sent and how they
/// are authenticated.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL of the provider API, without trailing slash
    pub base_url: String,
    /// Bearer token sent with every request
    pub api_key: Option<String>,
    /// Prefix joined with a movie's poster path to build a poster URL
    pub image_base_url: String,
    /// Request timeout (None = transport default)
    pub request_timeout: Option<Duration>,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: None,
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            request_timeout: None,
            user_agent: "reelscout/0.1.0",
        }
    }
}

/// Remote document store configuration for search counters.
#[derive(Debug, Clone)]
pub struct TrendStoreConfig {
    /// REST endpoint of the document store
    pub endpoint: String,
    /// Project identifier sent as `X-Appwrite-Project`
    pub project_id: String,
    /// Database holding the counters collection
    pub database_id: String,
    /// Collection holding one document per search term
    pub collection_id: String,
    /// Optional server key sent as `X-Appwrite-Key`
    pub api_key: Option<String>,
}

impl Default for TrendStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: String::new(),
            database_id: String::new(),
            collection_id: String::new(),
            api_key: None,
        }
    }
}

/// Interactive session configuration.
///
/// Controls debounce timing, trending panel size and the trend recording
/// queue.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Quiet interval before a search-box value is acted upon
    pub debounce_interval: Duration,
    /// Number of entries shown in the trending section
    pub trending_limit: usize,
    /// Capacity of the background trend recording queue
    pub recorder_queue_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_interval: Duration::from_millis(500),
            trending_limit: 5,
            recorder_queue_capacity: 64,
        }
    }
}

impl ReelscoutConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Missing credentials are not validated here; requests made without
    /// them fail at runtime like any other request failure.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup.
    ///
    /// Unparseable numeric values are ignored and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Provider overrides
        if let Some(api_key) = lookup("TMDB_API_KEY") {
            config.provider.api_key = Some(api_key);
        }

        if let Some(base_url) = lookup("REELSCOUT_TMDB_BASE_URL") {
            config.provider.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Some(image_base_url) = lookup("REELSCOUT_IMAGE_BASE_URL") {
            config.provider.image_base_url = image_base_url;
        }

        if let Some(timeout) = lookup("REELSCOUT_REQUEST_TIMEOUT_SECS")
            && let Ok(seconds) = timeout.parse::<u64>()
        {
            config.provider.request_timeout = Some(Duration::from_secs(seconds));
        }

        // Trend store overrides
        if let Some(endpoint) = lookup("APPWRITE_ENDPOINT") {
            config.trend_store.endpoint = endpoint.trim_end_matches('/').to_string();
        }

        if let Some(project_id) = lookup("APPWRITE_PROJECT_ID") {
            config.trend_store.project_id = project_id;
        }

        if let Some(database_id) = lookup("APPWRITE_DATABASE_ID") {
            config.trend_store.database_id = database_id;
        }

        if let Some(collection_id) = lookup("APPWRITE_COLLECTION_ID") {
            config.trend_store.collection_id = collection_id;
        }

        if let Some(api_key) = lookup("APPWRITE_API_KEY") {
            config.trend_store.api_key = Some(api_key);
        }

        // Session overrides
        if let Some(debounce) = lookup("REELSCOUT_DEBOUNCE_MS")
            && let Ok(millis) = debounce.parse::<u64>()
        {
            config.session.debounce_interval = Duration::from_millis(millis);
        }

        if let Some(limit) = lookup("REELSCOUT_TRENDING_LIMIT")
            && let Ok(count) = limit.parse::<usize>()
        {
            config.session.trending_limit = count;
        }

        config
    }
}
