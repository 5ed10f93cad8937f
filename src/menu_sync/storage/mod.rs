// src/menu_sync/storage/mod.rs
// Client-side state: the query cache the sync layer reads and writes.

pub mod keys;
pub mod query_cache;

pub use keys::{CachedValue, QueryKey};
pub use query_cache::{CacheEntry, FetchTicket, QueryCache};
