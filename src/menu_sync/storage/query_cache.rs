// src/menu_sync/storage/query_cache.rs
// Process-local query cache: last known server values with staleness and
// per-key fetch generations for cancellation.

use crate::error::SyncError;
use crate::models::common::TimestampMs;
use crate::storage::keys::{CachedValue, QueryKey};
use crate::utils::time::now_millis;
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::debug;

#[derive(Clone, Debug, Default)]
pub struct CacheEntry {
    pub value: Option<CachedValue>,
    pub stale: bool,
    pub updated_at: Option<TimestampMs>,
    /// Message of the last failed fetch, cleared by the next successful write.
    pub last_error: Option<String>,
    generation: u64,
    fetching: bool,
}

/// Proof that a fetch was started for `key` at a given generation.
/// A fetch whose ticket is older than the key's generation was cancelled.
#[derive(Debug)]
#[must_use = "complete or fail the fetch with this ticket"]
pub struct FetchTicket {
    key: QueryKey,
    generation: u64,
}

impl FetchTicket {
    pub fn key(&self) -> QueryKey {
        self.key
    }
}

/// Single-threaded cache shared by reference with the sync client.
/// Callers never hold a borrow across an await point.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: RefCell<HashMap<QueryKey, CacheEntry>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &QueryKey) -> Option<CachedValue> {
        self.entries.borrow().get(key).and_then(|entry| entry.value.clone())
    }

    pub fn entry(&self, key: &QueryKey) -> Option<CacheEntry> {
        self.entries.borrow().get(key).cloned()
    }

    /// Whether the key has been observed (fetched, written or is being fetched).
    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.borrow().contains_key(key)
    }

    /// Writes a value and marks it fresh. Does not touch in-flight fetches.
    pub fn set(&self, key: &QueryKey, value: CachedValue) {
        let mut entries = self.entries.borrow_mut();
        let entry = entries.entry(*key).or_default();
        entry.value = Some(value);
        entry.stale = false;
        entry.updated_at = Some(now_millis());
        entry.last_error = None;
        debug!(%key, "cache write");
    }

    /// Marks the entry stale. Returns `false` when the key was never observed.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        match self.entries.borrow_mut().get_mut(key) {
            Some(entry) => {
                entry.stale = true;
                debug!(%key, "cache invalidated");
                true
            }
            None => false,
        }
    }

    /// Missing entries and entries without a value count as stale.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries
            .borrow()
            .get(key)
            .map_or(true, |entry| entry.stale || entry.value.is_none())
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.entries.borrow().get(key).map_or(false, |entry| entry.fetching)
    }

    pub fn begin_fetch(&self, key: &QueryKey) -> FetchTicket {
        let mut entries = self.entries.borrow_mut();
        let entry = entries.entry(*key).or_insert_with(|| CacheEntry {
            stale: true,
            ..CacheEntry::default()
        });
        entry.fetching = true;
        FetchTicket {
            key: *key,
            generation: entry.generation,
        }
    }

    /// Stores a fetched value unless the fetch was cancelled in the meantime.
    /// Returns whether the value was applied.
    pub fn complete_fetch(&self, ticket: FetchTicket, value: CachedValue) -> bool {
        let mut entries = self.entries.borrow_mut();
        let Some(entry) = entries.get_mut(&ticket.key) else {
            debug!(key = %ticket.key, "fetch result dropped, entry removed");
            return false;
        };
        if entry.generation != ticket.generation {
            debug!(key = %ticket.key, "fetch result dropped, fetch was cancelled");
            return false;
        }
        entry.value = Some(value);
        entry.stale = false;
        entry.fetching = false;
        entry.updated_at = Some(now_millis());
        entry.last_error = None;
        true
    }

    /// Ends a failed fetch. The previous value, if any, stays in place.
    pub fn fail_fetch(&self, ticket: FetchTicket, error: &SyncError) {
        if let Some(entry) = self.entries.borrow_mut().get_mut(&ticket.key) {
            if entry.generation == ticket.generation {
                entry.fetching = false;
                entry.last_error = Some(error.to_string());
            }
        }
    }

    /// Cancels any in-flight fetch for the key: their results will be discarded.
    /// Returns whether a fetch was in flight.
    pub fn cancel(&self, key: &QueryKey) -> bool {
        match self.entries.borrow_mut().get_mut(key) {
            Some(entry) => {
                entry.generation += 1;
                let was_fetching = std::mem::replace(&mut entry.fetching, false);
                if was_fetching {
                    debug!(%key, "in-flight fetch cancelled");
                }
                was_fetching
            }
            None => false,
        }
    }

    pub fn remove(&self, key: &QueryKey) -> Option<CachedValue> {
        self.entries.borrow_mut().remove(key).and_then(|entry| entry.value)
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
        debug!("cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn keys(&self) -> Vec<QueryKey> {
        self.entries.borrow().keys().copied().collect()
    }
}
