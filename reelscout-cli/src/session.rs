//! Interactive search session.
//!
//! Every input line is the new search-box value. The view is written to the
//! output whenever it changes; logs go to stderr.

use std::sync::Arc;
use std::time::Duration;

use reelscout_core::{ReelscoutConfig, TrendStore, spawn_debouncer, spawn_trend_recorder};
use reelscout_search::{
    MovieProvider, SearchClient, SearchResultState, ViewController, ViewState, render_view,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;

/// Upper bound on waiting for the last query to resolve after input ends.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Run a session until `input` is exhausted.
///
/// On end of input the last value is still searched and its view written,
/// then queued trend recordings are flushed before returning.
///
/// # Errors
/// - Reading `input` or writing `output` failed
pub async fn run_session<R, W>(
    config: ReelscoutConfig,
    store: Arc<dyn TrendStore>,
    provider: Arc<dyn MovieProvider>,
    input: R,
    output: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let recorder = spawn_trend_recorder(store.clone(), &config);
    let client = SearchClient::new(provider, recorder.clone());
    let controller = ViewController::new(client, store, &config.session);
    let (search_box, debounced) =
        spawn_debouncer(String::new(), config.session.debounce_interval);

    let mut updates = controller.subscribe();
    controller.mount();
    tokio::spawn(controller.clone().run(debounced));

    tracing::info!("Type a movie title and press enter, an empty line shows popular movies");

    let mut last_value = String::new();
    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    last_value = line.clone();
                    if search_box.set(line).is_err() {
                        tracing::warn!("Debouncer stopped, ending session");
                        break;
                    }
                }
                None => break,
            },
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = updates.borrow_and_update().clone();
                write_view(output, &view).await?;
            }
        }
    }

    let settle = write_until_settled(&mut updates, output, &last_value);
    match tokio::time::timeout(SETTLE_TIMEOUT, settle).await {
        Ok(written) => written?,
        Err(_) => tracing::warn!(query = %last_value, "Gave up waiting for the last search"),
    }
    drop(search_box);

    if recorder.flush().await.is_err() {
        tracing::warn!("Trend recorder stopped before flushing");
    }

    tracing::info!("Session ended");
    Ok(())
}

/// Writes every unseen view until the one for `last_value` has resolved.
async fn write_until_settled<W>(
    updates: &mut watch::Receiver<ViewState>,
    output: &mut W,
    last_value: &str,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    loop {
        let (view, unseen) = {
            let current = updates.borrow_and_update();
            (current.clone(), current.has_changed())
        };
        if unseen {
            write_view(output, &view).await?;
        }
        if is_settled(&view, last_value) || updates.changed().await.is_err() {
            return Ok(());
        }
    }
}

async fn write_view<W>(output: &mut W, view: &ViewState) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(render_view(view).as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}

fn is_settled(state: &ViewState, last_value: &str) -> bool {
    state.query == last_value
        && !matches!(
            state.results,
            SearchResultState::Idle | SearchResultState::Loading
        )
}
