//! Error types for movie queries.

use thiserror::Error;

/// Message shown for any transport failure.
pub const GENERIC_FETCH_ERROR: &str = "Error fetching data, Please try again later";

/// Message shown when the provider flags a failure without explaining it.
pub const PROVIDER_FALLBACK_ERROR: &str = "Failed to fetch the movies";

/// Errors that can occur while fetching movies.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MovieQueryError {
    /// The request failed, returned a non-success status, or the body was
    /// not valid JSON.
    #[error("Network error: {reason}")]
    Transport {
        /// The reason for the transport failure
        reason: String,
    },

    /// The provider answered but flagged the request as failed.
    #[error("Provider error: {message}")]
    Provider {
        /// Provider-supplied message, or the generic fallback
        message: String,
    },
}

impl MovieQueryError {
    /// Returns the single-line message shown in place of the result list.
    ///
    /// Transport details stay in the logs; provider messages are shown as
    /// given.
    pub fn user_message(&self) -> String {
        match self {
            MovieQueryError::Transport { .. } => GENERIC_FETCH_ERROR.to_string(),
            MovieQueryError::Provider { message } => message.clone(),
        }
    }
}
