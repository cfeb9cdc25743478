//! TTL cache for provider route results
//!
//! Keys are `"{provider_id}:{normalized request}"`, so concurrent requests
//! for the same quote share entries per provider namespace. Reads after
//! expiry behave as a miss. There is no cross-request locking: two
//! concurrent misses may both fetch upstream and the last writer wins.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use stablepay_types::RouteOption;

/// Cached routes with their expiry instant
#[derive(Debug, Clone)]
struct CacheEntry {
	routes: Vec<RouteOption>,
	expires_at: Instant,
}

impl CacheEntry {
	fn is_expired(&self) -> bool {
		Instant::now() >= self.expires_at
	}
}

/// Thread-safe TTL cache for route results
///
/// A performance optimization, not a correctness dependency: dropping all
/// entries (e.g. on restart) is always safe.
#[derive(Clone, Debug)]
pub struct RouteCache {
	entries: Arc<DashMap<String, CacheEntry>>,
	default_ttl: Duration,
}

impl RouteCache {
	/// Create a cache with the default 60-second TTL
	pub fn new() -> Self {
		Self::with_ttl(Duration::from_secs(60))
	}

	pub fn with_ttl(default_ttl: Duration) -> Self {
		Self {
			entries: Arc::new(DashMap::new()),
			default_ttl,
		}
	}

	/// Look up a key, treating expired entries as a miss
	pub fn get(&self, key: &str) -> Option<Vec<RouteOption>> {
		// Atomic check-and-remove so an expired entry is dropped exactly once
		self.entries
			.remove_if(key, |_, entry| entry.is_expired());

		let entry_ref = self.entries.get(key)?;
		let entry = entry_ref.value();
		debug!("Route cache hit for {}", key);
		Some(entry.routes.clone())
	}

	/// Store routes under the default TTL
	pub fn set(&self, key: impl Into<String>, routes: Vec<RouteOption>) {
		self.set_with_ttl(key, routes, self.default_ttl);
	}

	/// Store routes under an explicit TTL
	pub fn set_with_ttl(&self, key: impl Into<String>, routes: Vec<RouteOption>, ttl: Duration) {
		let key = key.into();
		debug!("Caching {} route(s) for {}", routes.len(), key);
		self.entries.insert(
			key,
			CacheEntry {
				routes,
				expires_at: Instant::now() + ttl,
			},
		);
	}

	/// Drop all expired entries, returning how many were removed
	pub fn cleanup_expired(&self) -> usize {
		let before = self.entries.len();
		self.entries.retain(|_, entry| !entry.is_expired());
		before - self.entries.len()
	}

	pub fn clear(&self) {
		self.entries.clear();
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn default_ttl(&self) -> Duration {
		self.default_ttl
	}
}

impl Default for RouteCache {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn route(provider: &str) -> RouteOption {
		RouteOption::new("base -> arbitrum", "0.30 USDC", "~2 min", provider)
	}

	#[test]
	fn test_get_returns_what_was_set() {
		let cache = RouteCache::new();
		cache.set("lifi:key", vec![route("lifi")]);

		let hit = cache.get("lifi:key").unwrap();
		assert_eq!(hit.len(), 1);
		assert_eq!(hit[0].provider, "lifi");
	}

	#[test]
	fn test_expired_entry_is_a_miss() {
		let cache = RouteCache::with_ttl(Duration::from_millis(0));
		cache.set("lifi:key", vec![route("lifi")]);

		assert!(cache.get("lifi:key").is_none());
		assert!(cache.is_empty());
	}

	#[tokio::test]
	async fn test_entries_expire_after_ttl() {
		let cache = RouteCache::with_ttl(Duration::from_millis(30));
		cache.set("lifi:key", vec![route("lifi")]);
		assert!(cache.get("lifi:key").is_some());

		tokio::time::sleep(Duration::from_millis(60)).await;
		assert!(cache.get("lifi:key").is_none());
	}

	#[test]
	fn test_last_writer_wins() {
		let cache = RouteCache::new();
		cache.set("key", vec![route("lifi")]);
		cache.set("key", vec![route("cctp")]);

		let hit = cache.get("key").unwrap();
		assert_eq!(hit[0].provider, "cctp");
	}

	#[test]
	fn test_cleanup_removes_only_expired() {
		let cache = RouteCache::new();
		cache.set_with_ttl("old", vec![route("lifi")], Duration::from_millis(0));
		cache.set_with_ttl("live", vec![route("cctp")], Duration::from_secs(60));

		assert_eq!(cache.cleanup_expired(), 1);
		assert!(cache.get("live").is_some());
	}

	#[test]
	fn test_identical_reads_within_ttl_are_bit_identical() {
		let cache = RouteCache::new();
		cache.set("key", vec![route("lifi"), route("cctp")]);

		let first = cache.get("key").unwrap();
		let second = cache.get("key").unwrap();
		assert_eq!(first, second);
	}
}
