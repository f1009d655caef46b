//! Per-class cache of localized field sets.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::catalog::FieldSet;

/// Write-once cache of localized field sets keyed by class name.
///
/// The first computation for a class wins; concurrent callers racing on the
/// same class observe a single stored value. Entries live as long as the
/// cache and are never invalidated.
#[derive(Debug, Default)]
pub struct FieldSetCache {
    entries: DashMap<String, Arc<FieldSet>>,
    stats: FieldSetCacheStats,
}

/// Hit/miss counters for [`FieldSetCache`].
#[derive(Debug, Default)]
pub struct FieldSetCacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl FieldSetCacheStats {
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

impl FieldSetCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached set for `class`, computing and storing it on first use.
    pub fn get_or_compute<F>(&self, class: &str, compute: F) -> Arc<FieldSet>
    where
        F: FnOnce() -> FieldSet,
    {
        if let Some(existing) = self.entries.get(class) {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(existing.value());
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        let computed = Arc::new(compute());
        // Insert-if-absent: a value stored by a racing caller is kept.
        let entry = self
            .entries
            .entry(class.to_string())
            .or_insert(computed);
        Arc::clone(entry.value())
    }

    /// Get the cached set for `class` without computing it.
    pub fn get(&self, class: &str) -> Option<Arc<FieldSet>> {
        self.entries.get(class).map(|e| Arc::clone(e.value()))
    }

    pub fn contains(&self, class: &str) -> bool {
        self.entries.contains_key(class)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &FieldSetCacheStats {
        &self.stats
    }
}
