//! Sliding-expiry LRU cache.
//!
//! Process-wide read-mostly caches (alias set, assembled site views) go
//! through this abstraction so writers can invalidate explicitly and
//! tests can substitute empty instances. Entries are replaced wholesale;
//! readers observe either the old or the new complete value, never a
//! partial one.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::types::Timestamp;

struct Entry<V> {
	value: V,
	expires_at: Timestamp,
}

/// LRU cache whose entries expire after `ttl_secs` of inactivity.
///
/// Every successful `get` pushes the expiry forward (sliding expiration).
pub struct Cache<K: std::hash::Hash + Eq, V: Clone> {
	entries: Arc<parking_lot::RwLock<LruCache<K, Entry<V>>>>,
	ttl_secs: i64,
}

impl<K: std::hash::Hash + Eq, V: Clone> Cache<K, V> {
	pub fn new(capacity: usize, ttl_secs: i64) -> Self {
		let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
		Self { entries: Arc::new(parking_lot::RwLock::new(LruCache::new(capacity))), ttl_secs }
	}

	pub fn get(&self, key: &K) -> Option<V> {
		let mut entries = self.entries.write();
		match entries.get_mut(key) {
			Some(entry) if entry.expires_at > Timestamp::now() => {
				entry.expires_at = Timestamp::now().add_seconds(self.ttl_secs);
				Some(entry.value.clone())
			}
			Some(_) => {
				entries.pop(key);
				None
			}
			None => None,
		}
	}

	pub fn put(&self, key: K, value: V) {
		let entry = Entry { value, expires_at: Timestamp::now().add_seconds(self.ttl_secs) };
		self.entries.write().put(key, entry);
	}

	pub fn invalidate(&self, key: &K) {
		self.entries.write().pop(key);
	}

	pub fn clear(&self) {
		self.entries.write().clear();
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}


// vim: ts=4
