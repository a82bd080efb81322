//! Keystroke debouncing.
//!
//! Collapses a rapidly changing source value into a stable value that is
//! emitted only after the source has been left alone for a full quiet
//! interval. The value present at spawn time counts as the first change, so
//! the first emission happens one quiet interval after mount.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

/// Returned when a value is set after the debouncer task has stopped.
#[derive(Debug, Error)]
#[error("Debouncer has stopped")]
pub struct DebouncerClosed;

/// Handle for feeding source values into a running debouncer.
///
/// Cloning is cheap. When every handle is dropped the debouncer stops and
/// its output channel closes; a value still waiting out its quiet interval
/// at that point is discarded.
#[derive(Debug, Clone)]
pub struct DebouncerHandle<T> {
    sender: mpsc::UnboundedSender<T>,
}

impl<T> DebouncerHandle<T> {
    /// Records a new source value, superseding any value still pending.
    ///
    /// # Errors
    /// - `DebouncerClosed` - The debouncer task is no longer running
    pub fn set(&self, value: T) -> Result<(), DebouncerClosed> {
        self.sender.send(value).map_err(|_| DebouncerClosed)
    }
}

/// Spawns a debouncer seeded with `initial` and returns its input handle and
/// the receiver of stable values.
///
/// A stable value equal to the previously emitted one is not emitted again.
pub fn spawn_debouncer<T>(initial: T, quiet: Duration) -> (DebouncerHandle<T>, mpsc::Receiver<T>)
where
    T: Clone + PartialEq + Send + std::fmt::Debug + 'static,
{
    let (input_sender, input_receiver) = mpsc::unbounded_channel();
    let (output_sender, output_receiver) = mpsc::channel(16);

    tokio::spawn(async move {
        run_debounce_loop(initial, quiet, input_receiver, output_sender).await;
    });

    (
        DebouncerHandle {
            sender: input_sender,
        },
        output_receiver,
    )
}

async fn run_debounce_loop<T>(
    initial: T,
    quiet: Duration,
    mut input: mpsc::UnboundedReceiver<T>,
    output: mpsc::Sender<T>,
) where
    T: Clone + PartialEq + Send + std::fmt::Debug + 'static,
{
    let mut pending = Some(initial);
    let mut last_emitted: Option<T> = None;

    loop {
        let Some(value) = pending.take() else {
            match input.recv().await {
                Some(value) => {
                    pending = Some(value);
                    continue;
                }
                None => break,
            }
        };

        tokio::select! {
            next = input.recv() => match next {
                Some(next) => pending = Some(next),
                None => break,
            },
            () = tokio::time::sleep(quiet) => {
                if last_emitted.as_ref() == Some(&value) {
                    tracing::trace!(?value, "Debounced value unchanged, not emitting");
                    continue;
                }

                tracing::debug!(?value, "Debounced value settled");
                if output.send(value.clone()).await.is_err() {
                    break;
                }
                last_emitted = Some(value);
            }
        }
    }

    tracing::debug!("Debouncer stopped");
}
