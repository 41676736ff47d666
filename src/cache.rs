//! Single-entry, short-lived layout memoization.

use crate::layout::Layout;
use std::time::{Duration, Instant};

/// How long a computed layout may be reused for the same width
pub const LAYOUT_CACHE_TTL: Duration = Duration::from_millis(50);

#[derive(Debug)]
struct CacheEntry {
    width: usize,
    computed_at: Instant,
    layout: Layout,
}

impl CacheEntry {
    fn is_fresh(&self, width: usize, now: Instant, ttl: Duration) -> bool {
        self.width == width && now.saturating_duration_since(self.computed_at) < ttl
    }
}

/// Remembers the last layout for a few milliseconds.
///
/// Hosts may redraw many times per second without the underlying data
/// changing. Callers must [`invalidate`](LayoutCache::invalidate) whenever the
/// preset or the data behind the context changes.
#[derive(Debug)]
pub struct LayoutCache {
    entry: Option<CacheEntry>,
    ttl: Duration,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::with_ttl(LAYOUT_CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    /// Returns the cached layout for `width`, or runs `compute` and caches its result.
    pub fn get<F>(&mut self, width: usize, compute: F) -> &Layout
    where
        F: FnOnce() -> Layout,
    {
        self.get_at(width, Instant::now(), compute)
    }

    fn get_at<F>(&mut self, width: usize, now: Instant, compute: F) -> &Layout
    where
        F: FnOnce() -> Layout,
    {
        let entry = match self.entry.take() {
            Some(entry) if entry.is_fresh(width, now, self.ttl) => entry,
            _ => CacheEntry {
                width,
                computed_at: now,
                layout: compute(),
            },
        };
        &self.entry.insert(entry).layout
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn layout(tag: &str) -> Layout {
        Layout {
            top_content: tag.to_string(),
            secondary_content: String::new(),
        }
    }

    #[test]
    fn test_reuses_within_ttl() {
        let mut cache = LayoutCache::new();
        let calls = Cell::new(0);
        let start = Instant::now();
        let compute = || {
            calls.set(calls.get() + 1);
            layout("a")
        };

        let first = cache.get_at(80, start, compute).clone();
        let second = cache
            .get_at(80, start + Duration::from_millis(49), compute)
            .clone();
        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_recomputes_after_ttl() {
        let mut cache = LayoutCache::new();
        let start = Instant::now();
        cache.get_at(80, start, || layout("old"));
        let later = cache.get_at(80, start + LAYOUT_CACHE_TTL, || layout("new"));
        assert_eq!(later.top_content, "new");
    }

    #[test]
    fn test_recomputes_on_width_change() {
        let mut cache = LayoutCache::new();
        let start = Instant::now();
        cache.get_at(80, start, || layout("wide"));
        assert_eq!(cache.get_at(40, start, || layout("narrow")).top_content, "narrow");
        // the narrow result replaced the wide one
        assert_eq!(cache.get_at(80, start, || layout("wide again")).top_content, "wide again");
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let mut cache = LayoutCache::new();
        let start = Instant::now();
        cache.get_at(80, start, || layout("before"));
        assert!(!cache.is_empty());
        cache.invalidate();
        assert!(cache.is_empty());
        assert_eq!(cache.get_at(80, start, || layout("after")).top_content, "after");
    }

    #[test]
    fn test_get_uses_wall_clock() {
        let mut cache = LayoutCache::with_ttl(Duration::from_secs(3600));
        cache.get(100, || layout("x"));
        let mut called = false;
        let hit = cache.get(100, || {
            called = true;
            layout("y")
        });
        assert_eq!(hit.top_content, "x");
        assert!(!called);
    }
}
