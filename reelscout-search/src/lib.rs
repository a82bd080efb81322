//! Reelscout Search - Movie discovery session

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Queries the movie metadata provider for the debounced search-box value,
//! records popular searches in the background, and keeps a single view
//! state that front-ends subscribe to and render.

pub mod client;
pub mod controller;
pub mod errors;
pub mod providers;
pub mod view;

// Re-export main types
pub use client::SearchClient;
pub use controller::{SearchResultState, ViewController, ViewState};
pub use errors::MovieQueryError;
pub use providers::{DemoProvider, MovieProvider, TmdbProvider};
pub use view::render_view;

/// Convenience type alias for Results with MovieQueryError.
pub type Result<T> = std::result::Result<T, MovieQueryError>;
