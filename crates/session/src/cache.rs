//! Per-list cache of fetched, ranked lists.
//!
//! Keyed by list id. Entries older than the TTL read as absent. Clearing
//! bumps a generation counter so a fetch issued before the clear cannot
//! repopulate the cache when its response arrives late.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use colorboxd_core::types::List;

struct CachedList {
    list: List,
    stored_at: Instant,
}

pub struct ListCache {
    entries: HashMap<String, CachedList>,
    ttl: Duration,
    generation: u64,
}

impl ListCache {
    /// Empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            generation: 0,
        }
    }

    /// Incremented on every [`clear`](Self::clear).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A copy of the cached list, if present and not expired.
    pub fn get(&mut self, list_id: &str) -> Option<List> {
        let expired = match self.entries.get(list_id) {
            Some(cached) => cached.stored_at.elapsed() >= self.ttl,
            None => return None,
        };
        if expired {
            tracing::debug!(list_id, "Cached list expired");
            self.entries.remove(list_id);
            return None;
        }
        self.entries.get(list_id).map(|c| c.list.clone())
    }

    /// Store `list` under its id, replacing any older copy.
    pub fn set(&mut self, list: List) {
        self.entries.insert(
            list.summary.id.clone(),
            CachedList {
                list,
                stored_at: Instant::now(),
            },
        );
    }

    /// Store `list` only if the cache has not been cleared since
    /// `generation` was read. Returns whether it was stored.
    pub fn set_if_current(&mut self, generation: u64, list: List) -> bool {
        if generation != self.generation {
            tracing::debug!(list_id = %list.summary.id, "Dropping list fetched before cache was cleared");
            return false;
        }
        self.set(list);
        true
    }

    /// Evict one list, returning it if it was cached.
    pub fn remove(&mut self, list_id: &str) -> Option<List> {
        self.entries.remove(list_id).map(|c| c.list)
    }

    /// Evict everything and bump the generation.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation += 1;
    }

    /// Whether an unexpired copy of the list is cached.
    pub fn contains(&self, list_id: &str) -> bool {
        self.entries
            .get(list_id)
            .is_some_and(|c| c.stored_at.elapsed() < self.ttl)
    }

    /// Ids of every stored list, expired or not.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of stored lists, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no list is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use colorboxd_core::types::ListSummary;

    use super::*;

    fn list(id: &str) -> List {
        List {
            summary: ListSummary {
                id: id.into(),
                name: id.into(),
                version: 1,
                film_count: 0,
                description: String::new(),
            },
            entries: vec![],
        }
    }

    #[test]
    fn get_set_remove() {
        let mut cache = ListCache::new(Duration::from_secs(60));
        assert!(cache.get("a").is_none());

        cache.set(list("a"));
        cache.set(list("b"));
        assert_eq!(cache.get("a").map(|l| l.summary.id), Some("a".to_string()));
        assert_eq!(cache.len(), 2);

        assert!(cache.remove("a").is_some());
        assert!(cache.get("a").is_none());
        assert!(cache.contains("b"));
    }

    #[test]
    fn expired_entries_read_as_absent() {
        let mut cache = ListCache::new(Duration::ZERO);
        cache.set(list("a"));
        assert!(!cache.contains("a"));
        assert!(cache.get("a").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_bumps_generation_and_blocks_stale_writes() {
        let mut cache = ListCache::new(Duration::from_secs(60));
        let before = cache.generation();
        cache.set(list("a"));

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.generation(), before + 1);

        assert!(!cache.set_if_current(before, list("a")));
        assert!(cache.is_empty());

        assert!(cache.set_if_current(cache.generation(), list("a")));
        assert!(cache.contains("a"));
    }
}
