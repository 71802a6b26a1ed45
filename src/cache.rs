//! Memoization for resolved variants.
//!
//! [`resolve`](crate::resolve::resolve) is pure, so the only reason to
//! recompute is that an input changed. A UI layer re-renders far more often
//! than image fields change; this cache lets it call resolve on every render
//! and only pay for the work when the inputs actually differ.
//!
//! # Cache keys
//!
//! The key is the full input tuple: project details, asset reference, crop,
//! hotspot, aspect ratio, and variant options. Floats are keyed by bit
//! pattern, so two crops that compare equal but differ in sign of zero are
//! distinct entries (they resolve to the same output, just twice).
//!
//! The hotspot is part of the key even though it never changes the size: it
//! moves the source rectangle and therefore the URL.
//!
//! Errors are never cached. Every failing call re-runs the resolver, so a
//! malformed reference is reported on each attempt.
//!
//! # Capacity
//!
//! The table is bounded. Once it holds [`DEFAULT_CAPACITY`] entries (or the
//! capacity given to [`ResolveCache::with_capacity`]) the least recently used
//! entry is evicted, so a long-lived cache fed with ever-changing aspect
//! ratios keeps a fixed footprint.

use crate::resolve::{ResolveError, VariantOptions, resolve_with};
use crate::types::{ImageDescriptor, ProjectDetails, ResolvedImage};
use log::debug;
use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

/// Entries kept by [`ResolveCache::new`] and [`ResolveCache::with_options`].
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    project: ProjectDetails,
    reference: String,
    crop: Option<[u64; 4]>,
    hotspot: Option<[u64; 4]>,
    aspect_ratio: Option<u64>,
    options: VariantOptions,
}

impl CacheKey {
    fn new(
        project: &ProjectDetails,
        image: &ImageDescriptor,
        aspect_ratio: Option<f64>,
        options: &VariantOptions,
    ) -> Self {
        Self {
            project: project.clone(),
            reference: image.asset_reference().to_string(),
            crop: image
                .crop
                .map(|c| [c.left, c.right, c.top, c.bottom].map(f64::to_bits)),
            hotspot: image
                .hotspot
                .map(|h| [h.x, h.y, h.width, h.height].map(f64::to_bits)),
            aspect_ratio: aspect_ratio.map(f64::to_bits),
            options: *options,
        }
    }
}

/// Counters for a [`ResolveCache`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits = self.hits.saturating_add(1);
    }

    pub fn miss(&mut self) {
        self.misses = self.misses.saturating_add(1);
    }

    pub fn total(&self) -> u64 {
        self.hits.saturating_add(self.misses)
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} resolved ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(f, "{} resolved", self.misses)
        }
    }
}

#[derive(Debug)]
struct CacheInner {
    entries: LruCache<CacheKey, ResolvedImage>,
    stats: CacheStats,
}

/// Thread-safe, bounded memo table in front of the resolver.
#[derive(Debug)]
pub struct ResolveCache {
    options: VariantOptions,
    inner: Mutex<CacheInner>,
}

impl Default for ResolveCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolveCache {
    pub fn new() -> Self {
        Self::with_options(VariantOptions::default())
    }

    /// Cache whose entries all carry the given URL options.
    pub fn with_options(options: VariantOptions) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, options)
    }

    /// Cache holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize, options: VariantOptions) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            options,
            inner: Mutex::new(CacheInner {
                entries: LruCache::new(capacity),
                stats: CacheStats::default(),
            }),
        }
    }

    /// Return the cached variant for these inputs, resolving on a miss.
    pub fn resolve(
        &self,
        project: &ProjectDetails,
        image: &ImageDescriptor,
        aspect_ratio: Option<f64>,
    ) -> Result<ResolvedImage, ResolveError> {
        let key = CacheKey::new(project, image, aspect_ratio, &self.options);

        {
            let mut inner = self.lock();
            if let Some(hit) = inner.entries.get(&key).cloned() {
                inner.stats.hit();
                debug!("cache hit: {}", image.asset_reference());
                return Ok(hit);
            }
        }

        // Resolve outside the lock; concurrent misses on the same key just
        // compute the same value twice.
        let resolved = resolve_with(project, image, aspect_ratio, &self.options)?;

        let mut inner = self.lock();
        inner.stats.miss();
        inner.entries.put(key, resolved.clone());
        Ok(resolved)
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().entries.cap().get()
    }

    /// Drop all entries and reset the counters.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.stats = CacheStats::default();
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        // Every mutation is a single LRU call, so a poisoned table is still consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
