//! Tracing setup for Reelscout
//!
//! Console output follows the level the user picked; a second layer writes
//! everything down to TRACE into a per-run log file so swallowed background
//! failures (trend recording, trending loads) can still be inspected.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::ValueEnum;
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::ReelscoutError;

/// File name of the debug log written on every run.
pub const LOG_FILE_NAME: &str = "reelscout-last-run.log";

/// Directory used when no logs directory is given.
pub const DEFAULT_LOGS_DIR: &str = "logs";

/// Install the global subscriber: stderr at `console_level`, debug file at TRACE.
///
/// `RUST_LOG` takes precedence over `console_level` for the console layer.
/// The debug log is truncated on each run; its path is returned.
///
/// # Errors
///
/// - `ReelscoutError::Io` - If the logs directory or log file cannot be created
/// - `ReelscoutError::Configuration` - If a global subscriber is already
///   installed; the existing debug log is left untouched
pub fn init_tracing(console_level: Level, logs_dir: Option<&Path>) -> crate::Result<PathBuf> {
    if tracing::dispatcher::has_been_set() {
        return Err(already_initialized("global subscriber is set"));
    }

    let logs_dir = logs_dir.unwrap_or(Path::new(DEFAULT_LOGS_DIR));
    fs::create_dir_all(logs_dir)?;

    let log_file_path = logs_dir.join(LOG_FILE_NAME);
    let log_file = File::create(&log_file_path)?;

    tracing_subscriber::registry()
        .with(console_layer(console_level))
        .with(debug_file_layer(log_file))
        .try_init()
        .map_err(already_initialized)?;

    tracing::info!(
        console = %console_level,
        debug_file = %log_file_path.display(),
        "Tracing initialized"
    );

    Ok(log_file_path)
}

fn already_initialized(cause: impl std::fmt::Display) -> ReelscoutError {
    ReelscoutError::Configuration {
        reason: format!("tracing already initialized: {cause}"),
    }
}

// stdout is reserved for the rendered view
fn console_layer<S>(level: Level) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(filter)
}

fn debug_file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_ansi(false)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(Mutex::new(file))
        .with_filter(EnvFilter::new("trace"))
}

/// Console verbosity selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliLogLevel {
    /// Failures only
    Error,
    /// Failures and dropped background work
    Warn,
    /// Startup and session lifecycle
    Info,
    /// Search flow and store requests
    Debug,
    /// Everything, including debouncer ticks
    Trace,
}

impl CliLogLevel {
    /// The matching `tracing` level.
    ///
    /// # Examples
    /// ```
    /// use reelscout_core::tracing_setup::CliLogLevel;
    ///
    /// assert_eq!(CliLogLevel::Warn.as_tracing_level(), tracing::Level::WARN);
    /// ```
    pub fn as_tracing_level(self) -> Level {
        Level::from(self)
    }
}

impl From<CliLogLevel> for Level {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }
}

impl std::str::FromStr for CliLogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true).map_err(|_| format!("Invalid log level: {s}"))
    }
}

impl std::fmt::Display for CliLogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.to_possible_value().map(|value| value.get_name().to_string());
        f.write_str(name.as_deref().unwrap_or("info"))
    }
}
