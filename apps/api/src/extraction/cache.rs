//! Extraction cache — bounded memo of description fingerprint → extracted skills.
//!
//! Eviction policy: when an insert would take the cache past its capacity the whole
//! table is cleared first. Entries are never evicted one at a time. Callers may rely on
//! a hit being identical to a fresh extraction, never on an entry surviving.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Full-content fingerprint of a description (SHA-256, hex).
pub fn fingerprint(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub clears: u64,
}

#[derive(Debug)]
pub struct ExtractionCache {
    entries: Mutex<HashMap<String, Vec<String>>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    clears: AtomicU64,
}

impl ExtractionCache {
    /// `capacity` is clamped to at least one entry.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(HashMap::with_capacity(capacity)),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            clears: AtomicU64::new(0),
        }
    }

    pub fn get(&self, fingerprint: &str) -> Option<Vec<String>> {
        let hit = self.entries.lock().get(fingerprint).cloned();
        match hit {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        hit
    }

    /// Inserts under the same lock that performs the overflow clear.
    pub fn put(&self, fingerprint: String, skills: Vec<String>) {
        let mut entries = self.entries.lock();
        if !entries.contains_key(&fingerprint) && entries.len() >= self.capacity {
            debug!(entries = entries.len(), "Extraction cache full, clearing");
            entries.clear();
            self.clears.fetch_add(1, Ordering::Relaxed);
        }
        entries.insert(fingerprint, skills);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fingerprint_covers_whole_text() {
        // Same first 100 chars and same length: the weak prefix key would collide.
        let prefix = "a".repeat(100);
        let a = format!("{prefix} uses Rust");
        let b = format!("{prefix} uses Java");
        assert_eq!(a.len(), b.len());
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_fingerprint_is_stable_hex() {
        let fp = fingerprint("React and Redux");
        assert_eq!(fp, fingerprint("React and Redux"));
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_get_after_put_hits() {
        let cache = ExtractionCache::new(4);
        cache.put("k".to_string(), skills(&["Rust"]));
        assert_eq!(cache.get("k"), Some(skills(&["Rust"])));
        assert_eq!(cache.get("missing"), None);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_overflow_clears_everything_then_inserts() {
        let cache = ExtractionCache::new(2);
        cache.put("a".to_string(), skills(&["A"]));
        cache.put("b".to_string(), skills(&["B"]));
        assert_eq!(cache.len(), 2);

        cache.put("c".to_string(), skills(&["C"]));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("c"), Some(skills(&["C"])));
        assert_eq!(cache.stats().clears, 1);
    }

    #[test]
    fn test_overwriting_existing_key_does_not_clear() {
        let cache = ExtractionCache::new(2);
        cache.put("a".to_string(), skills(&["A"]));
        cache.put("b".to_string(), skills(&["B"]));
        cache.put("b".to_string(), skills(&["B2"]));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().clears, 0);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cache = ExtractionCache::new(0);
        assert_eq!(cache.stats().capacity, 1);
        cache.put("a".to_string(), skills(&["A"]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_size_never_exceeds_capacity_under_contention() {
        let cache = Arc::new(ExtractionCache::new(16));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..200 {
                        cache.put(format!("{t}-{i}"), skills(&["X"]));
                        assert!(cache.len() <= 16);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= cache.stats().capacity);
    }
}
