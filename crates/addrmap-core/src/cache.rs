//! Bounded render cache keyed by raw token text.
//!
//! When the entry count exceeds the capacity the whole map is dropped
//! rather than evicting single entries.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

/// Default entry ceiling.
pub const DEFAULT_CAPACITY: usize = 3000;

/// Statistics about cache usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
    pub capacity: usize,
    /// Wholesale clears, on overflow or on request.
    pub clears: usize,
}

/// Rendered annotations keyed by the token text they were rendered for.
#[derive(Debug, Clone)]
pub struct RenderCache {
    entries: HashMap<String, String>,
    capacity: usize,
    hits: usize,
    misses: usize,
    clears: usize,
}

impl RenderCache {
    /// Create an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
            hits: 0,
            misses: 0,
            clears: 0,
        }
    }

    /// Look up the rendered text for a raw token.
    pub fn lookup(&mut self, raw_token: &str) -> Option<String> {
        self.enforce_bound();
        match self.entries.get(raw_token) {
            Some(text) => {
                self.hits += 1;
                Some(text.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store rendered text for a raw token.
    pub fn store(&mut self, raw_token: impl Into<String>, rendered: impl Into<String>) {
        self.entries.insert(raw_token.into(), rendered.into());
        self.enforce_bound();
    }

    /// Drop every entry. Safe to call at any time.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.clears += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn statistics(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
            capacity: self.capacity,
            clears: self.clears,
        }
    }

    fn enforce_bound(&mut self) {
        if self.entries.len() > self.capacity {
            debug!(
                entries = self.entries.len(),
                capacity = self.capacity,
                "render cache overflow, clearing"
            );
            self.clear();
        }
    }
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
