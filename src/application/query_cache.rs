// src/application/query_cache.rs
use crate::domain::{DomainError, NotesPage, QueryKey};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Fresh,
    Stale,
    Loading,
}

/// Snapshot of one cache entry. `page` is the latest data regardless of status.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPage {
    pub page: Option<NotesPage>,
    pub status: EntryStatus,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct Entry {
    page: Option<NotesPage>,
    fetched_at: Option<Instant>,
    in_flight: Option<u64>,
    invalidated: bool,
    error: Option<String>,
    failed_at: Option<Instant>,
}

impl Entry {
    fn status(&self, stale_time: Duration) -> EntryStatus {
        if self.in_flight.is_some() {
            return EntryStatus::Loading;
        }
        match (self.page.is_some(), self.fetched_at) {
            (true, Some(at))
                if !self.invalidated && self.error.is_none() && at.elapsed() < stale_time =>
            {
                EntryStatus::Fresh
            }
            _ => EntryStatus::Stale,
        }
    }

    /// A failed key is not requested again until it is invalidated or the
    /// stale window has passed.
    fn cooling_down(&self, stale_time: Duration) -> bool {
        !self.invalidated && self.failed_at.is_some_and(|at| at.elapsed() < stale_time)
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<QueryKey, Entry>,
    next_seq: u64,
}

/// Query key -> notes page cache shared by the list and mutation coordinators.
///
/// Cloning yields another handle to the same cache. The lock is only taken
/// for short synchronous sections, never across an await.
#[derive(Debug, Clone)]
pub struct QueryCache {
    state: Arc<Mutex<CacheState>>,
    stale_time: Duration,
}

impl QueryCache {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
            stale_time,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a new request for `key`.
    ///
    /// Returns its sequence number, or `None` when a request for the key is
    /// already in flight, the cached page is still fresh, or the last request
    /// failed within the stale window.
    #[instrument(level = "trace", skip(self))]
    pub fn begin(&self, key: &QueryKey) -> Option<u64> {
        let stale_time = self.stale_time;
        let mut guard = self.lock();
        let state = &mut *guard;
        let seq = state.next_seq + 1;
        let entry = state.entries.entry(key.clone()).or_default();

        match entry.status(stale_time) {
            EntryStatus::Loading | EntryStatus::Fresh => None,
            EntryStatus::Stale if entry.cooling_down(stale_time) => {
                debug!(?key, "Last request failed recently, not retrying");
                None
            }
            EntryStatus::Stale => {
                entry.in_flight = Some(seq);
                state.next_seq = seq;
                Some(seq)
            }
        }
    }

    /// Record the result of request `seq`.
    ///
    /// Only the latest request issued for the key is applied; anything else is
    /// dropped. On failure the previous page is kept and the entry stays stale.
    pub fn complete(
        &self,
        key: &QueryKey,
        seq: u64,
        result: &Result<NotesPage, DomainError>,
    ) -> bool {
        let mut state = self.lock();
        let Some(entry) = state.entries.get_mut(key) else {
            return false;
        };
        if entry.in_flight != Some(seq) {
            debug!(?key, seq, "Discarding superseded response");
            return false;
        }

        entry.in_flight = None;
        match result {
            Ok(page) => {
                entry.page = Some(page.clone());
                entry.fetched_at = Some(Instant::now());
                entry.invalidated = false;
                entry.error = None;
                entry.failed_at = None;
            }
            Err(e) => {
                entry.error = Some(e.to_string());
                entry.failed_at = Some(Instant::now());
                entry.invalidated = false;
            }
        }
        true
    }

    pub fn get(&self, key: &QueryKey) -> Option<CachedPage> {
        let state = self.lock();
        state.entries.get(key).map(|entry| CachedPage {
            page: entry.page.clone(),
            status: entry.status(self.stale_time),
            error: entry.error.clone(),
        })
    }

    /// Mark every entry stale and forget in-flight requests, so responses
    /// that may predate a mutation are never applied.
    #[instrument(level = "debug", skip(self))]
    pub fn invalidate_all(&self) -> usize {
        let mut state = self.lock();
        for entry in state.entries.values_mut() {
            entry.invalidated = true;
            entry.in_flight = None;
        }
        debug!(entries = state.entries.len(), "Invalidated cached pages");
        state.entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: u32) -> NotesPage {
        NotesPage {
            items: vec![],
            page: n,
            per_page: 12,
            total_items: 0,
            total_pages: 0,
        }
    }

    fn cache() -> QueryCache {
        QueryCache::new(Duration::from_secs(30))
    }

    #[test]
    fn given_request_in_flight_when_beginning_same_key_then_deduplicates() {
        let cache = cache();
        let key = QueryKey::new(1, "");

        let first = cache.begin(&key);
        let second = cache.begin(&key);

        assert!(first.is_some());
        assert_eq!(second, None);
        assert_eq!(cache.get(&key).unwrap().status, EntryStatus::Loading);
    }

    #[test]
    fn given_fresh_page_when_beginning_then_serves_from_cache() {
        let cache = cache();
        let key = QueryKey::new(1, "");
        let seq = cache.begin(&key).unwrap();
        assert!(cache.complete(&key, seq, &Ok(page(1))));

        assert_eq!(cache.begin(&key), None);
        assert_eq!(cache.get(&key).unwrap().status, EntryStatus::Fresh);
    }

    #[tokio::test(start_paused = true)]
    async fn given_page_older_than_stale_time_when_beginning_then_refetches() {
        let cache = cache();
        let key = QueryKey::new(1, "");
        let seq = cache.begin(&key).unwrap();
        cache.complete(&key, seq, &Ok(page(1)));

        tokio::time::advance(Duration::from_secs(31)).await;

        assert_eq!(cache.get(&key).unwrap().status, EntryStatus::Stale);
        assert!(cache.begin(&key).is_some());
    }

    #[test]
    fn given_invalidation_when_old_response_arrives_then_discarded() {
        let cache = cache();
        let key = QueryKey::new(1, "");
        let old = cache.begin(&key).unwrap();

        cache.invalidate_all();
        let new = cache.begin(&key).unwrap();

        assert!(!cache.complete(&key, old, &Ok(page(7))));
        assert!(cache.complete(&key, new, &Ok(page(1))));
        assert_eq!(cache.get(&key).unwrap().page.unwrap().page, 1);
    }

    #[test]
    fn given_failed_refresh_when_completing_then_keeps_previous_page() {
        let cache = cache();
        let key = QueryKey::new(1, "");
        let seq = cache.begin(&key).unwrap();
        cache.complete(&key, seq, &Ok(page(1)));
        cache.invalidate_all();

        let seq = cache.begin(&key).unwrap();
        let applied = cache.complete(&key, seq, &Err(DomainError::Network("boom".into())));

        let entry = cache.get(&key).unwrap();
        assert!(applied);
        assert_eq!(entry.status, EntryStatus::Stale);
        assert_eq!(entry.error.as_deref(), Some("boom"));
        assert!(entry.page.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn given_failed_request_when_beginning_again_then_waits_for_invalidation_or_stale_time() {
        let cache = cache();
        let key = QueryKey::new(1, "");
        let seq = cache.begin(&key).unwrap();
        cache.complete(&key, seq, &Err(DomainError::Network("offline".into())));

        assert_eq!(cache.begin(&key), None);
        assert_eq!(cache.get(&key).unwrap().status, EntryStatus::Stale);

        cache.invalidate_all();
        let seq = cache.begin(&key).expect("invalidation allows a new request");
        cache.complete(&key, seq, &Err(DomainError::Network("offline".into())));
        assert_eq!(cache.begin(&key), None);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(cache.begin(&key).is_some());
    }

    #[test]
    fn given_cloned_handle_when_invalidating_then_original_sees_stale() {
        let cache = cache();
        let other = cache.clone();
        let key = QueryKey::new(1, "");
        let seq = cache.begin(&key).unwrap();
        cache.complete(&key, seq, &Ok(page(1)));

        assert_eq!(other.invalidate_all(), 1);

        assert_eq!(cache.get(&key).unwrap().status, EntryStatus::Stale);
    }

    #[test]
    fn given_unknown_key_when_completing_then_ignored() {
        let cache = cache();

        assert!(!cache.complete(&QueryKey::new(3, ""), 1, &Ok(page(3))));
        assert!(cache.is_empty());
    }
}
