//! In-process trend store for development sessions and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use super::{NewTrendEntry, TrendEntry, TrendStore, TrendStoreError, trending_order};

/// Trend store keeping counters in memory, keyed by search term.
///
/// Update timestamps are strictly increasing so the recency tie-break is
/// well defined even when two writes land within the same clock tick.
#[derive(Debug, Default)]
pub struct InMemoryTrendStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, TrendEntry>,
    last_stamp: Option<DateTime<Utc>>,
}

impl MemoryState {
    fn next_stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

impl InMemoryTrendStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `(entry, count)` pairs.
    ///
    /// Later pairs get later update stamps, so among equal counts the last
    /// pair ranks first. A term seeded twice keeps its last pair.
    pub fn seeded(entries: impl IntoIterator<Item = (NewTrendEntry, u64)>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock();
            for (entry, count) in entries {
                let seeded = TrendEntry {
                    id: uuid::Uuid::new_v4().to_string(),
                    search_term: entry.search_term,
                    count,
                    movie_id: entry.movie_id,
                    poster_url: entry.poster_url,
                    updated_at: state.next_stamp(),
                };
                state.entries.insert(seeded.search_term.clone(), seeded);
            }
        }
        store
    }

    /// Returns every stored entry in trending order.
    pub fn snapshot(&self) -> Vec<TrendEntry> {
        let mut entries: Vec<TrendEntry> = self.state.lock().entries.values().cloned().collect();
        entries.sort_by(trending_order);
        entries
    }

    /// Number of distinct search terms stored.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether no search term has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }
}

#[async_trait]
impl TrendStore for InMemoryTrendStore {
    async fn find_by_term(&self, search_term: &str) -> Result<Option<TrendEntry>, TrendStoreError> {
        Ok(self.state.lock().entries.get(search_term).cloned())
    }

    async fn create(&self, entry: NewTrendEntry) -> Result<TrendEntry, TrendStoreError> {
        let mut state = self.state.lock();
        if state.entries.contains_key(&entry.search_term) {
            return Err(TrendStoreError::Conflict {
                search_term: entry.search_term,
            });
        }

        let created = TrendEntry {
            id: uuid::Uuid::new_v4().to_string(),
            search_term: entry.search_term,
            count: 1,
            movie_id: entry.movie_id,
            poster_url: entry.poster_url,
            updated_at: state.next_stamp(),
        };
        state
            .entries
            .insert(created.search_term.clone(), created.clone());
        Ok(created)
    }

    async fn increment(&self, entry: &TrendEntry) -> Result<TrendEntry, TrendStoreError> {
        let mut state = self.state.lock();
        let stamp = state.next_stamp();

        let stored = state
            .entries
            .values_mut()
            .find(|stored| stored.id == entry.id)
            .ok_or_else(|| TrendStoreError::NotFound {
                id: entry.id.clone(),
            })?;

        stored.count += 1;
        stored.updated_at = stamp;
        Ok(stored.clone())
    }

    async fn list_top(&self, limit: usize) -> Result<Vec<TrendEntry>, TrendStoreError> {
        let mut entries = self.snapshot();
        entries.truncate(limit);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_entry(term: &str) -> NewTrendEntry {
        NewTrendEntry {
            search_term: term.to_string(),
            movie_id: 414906,
            poster_url: "https://image.tmdb.org/t/p/w500/batman.jpg".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let store = InMemoryTrendStore::new();
        let created = store.create(new_entry("batman")).await.unwrap();

        assert_eq!(created.count, 1);
        assert_eq!(created.movie_id, 414906);

        let found = store.find_by_term("batman").await.unwrap();
        assert_eq!(found, Some(created));
        assert!(store.find_by_term("joker").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_create_is_rejected() {
        let store = InMemoryTrendStore::new();
        store.create(new_entry("batman")).await.unwrap();

        let result = store.create(new_entry("batman")).await;
        assert!(matches!(result, Err(TrendStoreError::Conflict { .. })));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_increment_bumps_count_and_timestamp() {
        let store = InMemoryTrendStore::new();
        let created = store.create(new_entry("batman")).await.unwrap();
        let incremented = store.increment(&created).await.unwrap();

        assert_eq!(incremented.count, 2);
        assert!(incremented.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_increment_unknown_entry_fails() {
        let store = InMemoryTrendStore::new();
        let created = store.create(new_entry("batman")).await.unwrap();
        let other = InMemoryTrendStore::new();

        let result = other.increment(&created).await;
        assert!(matches!(result, Err(TrendStoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_top_respects_limit_and_order() {
        let store = InMemoryTrendStore::new();
        for term in ["alien", "batman", "casablanca"] {
            store.create(new_entry(term)).await.unwrap();
        }
        let batman = store.find_by_term("batman").await.unwrap().unwrap();
        store.increment(&batman).await.unwrap();

        let top = store.list_top(2).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].search_term, "batman");
        // Most recently created wins the tie at count 1
        assert_eq!(top[1].search_term, "casablanca");
    }

    #[tokio::test]
    async fn test_seeded_store_ranks_by_count_then_recency() {
        let store = InMemoryTrendStore::seeded([
            (new_entry("dune"), 4),
            (new_entry("heat"), 2),
            (new_entry("alien"), 4),
        ]);

        let terms: Vec<String> = store
            .list_top(10)
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.search_term)
            .collect();
        assert_eq!(terms, vec!["alien", "dune", "heat"]);

        let dune = store.find_by_term("dune").await.unwrap().unwrap();
        assert_eq!(store.increment(&dune).await.unwrap().count, 5);
    }
}
