//! Trending list retrieval.

use super::{TrendEntry, TrendStore, TrendStoreError, trending_order};

/// Returns at most `limit` entries ordered by count descending.
///
/// Ties are broken by most recent update, then by search term, regardless
/// of the order the backend returned them in.
///
/// # Errors
/// - Any error reported by the store listing
pub async fn list_trending(
    store: &dyn TrendStore,
    limit: usize,
) -> Result<Vec<TrendEntry>, TrendStoreError> {
    if limit == 0 {
        return Ok(Vec::new());
    }

    let mut entries = store.list_top(limit).await?;
    entries.sort_by(trending_order);
    entries.truncate(limit);

    tracing::debug!(count = entries.len(), limit, "Trending entries loaded");
    Ok(entries)
}
