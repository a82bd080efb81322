//! TMDB movie metadata provider.

use async_trait::async_trait;
use reelscout_core::MovieSummary;
use reelscout_core::config::ProviderConfig;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;

use super::MovieProvider;
use crate::errors::{MovieQueryError, PROVIDER_FALLBACK_ERROR};

/// TMDB provider for movie search and popularity discovery.
///
/// Sends every request with `accept: application/json` and the configured
/// bearer token. No retries; a failed request is reported once.
#[derive(Debug, Clone)]
pub struct TmdbProvider {
    client: reqwest::Client,
    base_url: String,
}

/// Response body shared by the search and discover endpoints.
#[derive(Debug, Deserialize)]
struct TmdbResponse {
    #[serde(default)]
    results: Option<Vec<MovieSummary>>,
    /// Provider-level status flag, `"False"` on failure
    #[serde(rename = "Response")]
    response: Option<String>,
    /// Error message accompanying a failed status flag
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl TmdbProvider {
    /// Creates a provider from explicit configuration.
    ///
    /// A missing API key is not validated; the provider will reject the
    /// requests and they surface as transport errors.
    ///
    /// # Errors
    /// - `MovieQueryError::Transport` - API key is not a valid header value
    ///   or the HTTP client cannot be built
    pub fn new(config: &ProviderConfig) -> Result<Self, MovieQueryError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(api_key) = &config.api_key {
            let bearer = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                MovieQueryError::Transport {
                    reason: format!("Invalid API key header: {e}"),
                }
            })?;
            headers.insert(AUTHORIZATION, bearer);
        }

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| MovieQueryError::Transport {
            reason: format!("Failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the request URL: title search for a non-empty query, otherwise
    /// discovery sorted by popularity.
    pub fn endpoint_for(&self, query: &str) -> String {
        if query.is_empty() {
            format!("{}/discover/movie?sort_by=popularity.desc", self.base_url)
        } else {
            format!(
                "{}/search/movie?query={}",
                self.base_url,
                urlencoding::encode(query)
            )
        }
    }
}

#[async_trait]
impl MovieProvider for TmdbProvider {
    async fn fetch_movies(&self, query: &str) -> Result<Vec<MovieSummary>, MovieQueryError> {
        let url = self.endpoint_for(query);
        tracing::debug!(%url, "Fetching movies");

        let response = self.client.get(&url).send().await.map_err(|e| {
            MovieQueryError::Transport {
                reason: format!("HTTP request failed: {e}"),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MovieQueryError::Transport {
                reason: format!("Provider returned status {status}"),
            });
        }

        let body: TmdbResponse = response
            .json()
            .await
            .map_err(|e| MovieQueryError::Transport {
                reason: format!("JSON parsing failed: {e}"),
            })?;

        if body.response.as_deref() == Some("False") {
            return Err(MovieQueryError::Provider {
                message: body
                    .error
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| PROVIDER_FALLBACK_ERROR.to_string()),
            });
        }

        Ok(body.results.unwrap_or_default())
    }
}
