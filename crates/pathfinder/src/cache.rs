//! Sub-path cache keyed by exact (point, goal) tile pairs.

use crate::search::{breadth_first, PathResult};
use limo_common::{GridMap, GridPosition, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A cached route from some point to a goal, with its hop count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPath {
    pub path: Vec<GridPosition>,
    pub cost: u32,
}

impl CachedPath {
    pub fn new(path: Vec<GridPosition>) -> Self {
        let cost = path.len().saturating_sub(1) as u32;
        Self { path, cost }
    }
}

/// Counters for cache effectiveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Tiles dequeued across all searches
    pub expanded: u64,
}

/// Populate-only store of point-to-goal routes.
///
/// Entries are dropped only by [`PathCache::reset`] or when the cache is
/// used against a map with a different revision than the one it was
/// filled from.
#[derive(Debug, Default)]
pub struct PathCache {
    entries: HashMap<(GridPosition, GridPosition), CachedPath>,
    map_revision: Option<u64>,
    stats: CacheStats,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, point: GridPosition, goal: GridPosition) -> Option<&CachedPath> {
        self.entries.get(&(point, goal))
    }

    pub fn contains(&self, point: GridPosition, goal: GridPosition) -> bool {
        self.entries.contains_key(&(point, goal))
    }

    /// Insert unless the pair is already cached. Returns whether it was
    /// inserted; an existing entry always wins.
    pub fn insert_if_absent(
        &mut self,
        point: GridPosition,
        goal: GridPosition,
        entry: CachedPath,
    ) -> bool {
        use std::collections::hash_map::Entry;
        match self.entries.entry((point, goal)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    /// Cache every suffix of a found path under `(p, goal)`.
    pub fn insert_suffixes(&mut self, path: &[GridPosition]) -> usize {
        let mut inserted = 0;
        for (point, goal, entry) in suffix_entries(path) {
            if self.insert_if_absent(point, goal, entry) {
                inserted += 1;
            }
        }
        inserted
    }

    /// Drop every entry and the statistics.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.map_revision = None;
        self.stats = CacheStats::default();
    }

    /// Clear the cache if it was filled from a different map revision.
    pub fn sync_revision(&mut self, revision: u64) {
        match self.map_revision {
            Some(current) if current == revision => {}
            Some(current) => {
                debug!(
                    old_revision = current,
                    new_revision = revision,
                    dropped = self.entries.len(),
                    "Map changed, invalidating path cache"
                );
                self.entries.clear();
                self.map_revision = Some(revision);
            }
            None => self.map_revision = Some(revision),
        }
    }

    pub fn map_revision(&self) -> Option<u64> {
        self.map_revision
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub(crate) fn record_hit(&mut self) {
        self.stats.hits += 1;
    }

    pub(crate) fn record_miss(&mut self, expanded: usize) {
        self.stats.misses += 1;
        self.stats.expanded += expanded as u64;
    }
}

/// `(p, goal, p..=goal)` for every tile `p` on `path` except the goal.
fn suffix_entries(
    path: &[GridPosition],
) -> impl Iterator<Item = (GridPosition, GridPosition, CachedPath)> + '_ {
    let goal = path.last().copied();
    path.iter()
        .enumerate()
        .take(path.len().saturating_sub(1))
        .filter_map(move |(i, point)| {
            goal.map(|goal| (*point, goal, CachedPath::new(path[i..].to_vec())))
        })
}

/// A [`PathCache`] shared between limos running on different threads.
///
/// Lookups and inserts each take the lock once; the search itself runs
/// unlocked and its results are merged with check-then-insert under a
/// single write lock, so racing searches never overwrite each other.
#[derive(Debug, Clone, Default)]
pub struct SharedPathCache {
    inner: Arc<RwLock<PathCache>>,
}

impl SharedPathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn get(&self, point: GridPosition, goal: GridPosition) -> Option<CachedPath> {
        self.inner.read().get(point, goal).cloned()
    }

    pub fn insert_if_absent(
        &self,
        point: GridPosition,
        goal: GridPosition,
        entry: CachedPath,
    ) -> bool {
        self.inner.write().insert_if_absent(point, goal, entry)
    }

    pub fn reset(&self) {
        self.inner.write().reset();
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.read().stats()
    }

    /// Run `f` with exclusive access to the underlying cache.
    pub fn with<R>(&self, f: impl FnOnce(&mut PathCache) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Shortest path from `start` to `goal`, shared with every other
    /// holder of this cache.
    pub fn compute_path<M: GridMap + ?Sized>(
        &self,
        map: &M,
        start: GridPosition,
        goal: GridPosition,
    ) -> Result<PathResult> {
        if start == goal {
            return Ok(PathResult::already_there(start));
        }

        {
            let mut cache = self.inner.write();
            cache.sync_revision(map.revision());
            if let Some(hit) = cache.get(start, goal).cloned() {
                cache.record_hit();
                return Ok(PathResult::from_cache(hit));
            }
        }

        let revision = map.revision();
        let outcome = breadth_first(map, start, goal)?;

        let mut cache = self.inner.write();
        cache.record_miss(outcome.expanded);
        if cache.map_revision() != Some(revision) {
            // moved to another map while we searched unlocked
            debug!(
                searched_revision = revision,
                cache_revision = ?cache.map_revision(),
                "Map changed during search, not caching result"
            );
            return Ok(PathResult::searched(CachedPath::new(outcome.path)));
        }
        cache.insert_suffixes(&outcome.path);
        // Another thread may have cached this pair first; hand out the
        // stored entry so every caller sees the same route.
        let stored = cache
            .get(start, goal)
            .cloned()
            .unwrap_or_else(|| CachedPath::new(outcome.path));
        Ok(PathResult::searched(stored))
    }
}

impl From<PathCache> for SharedPathCache {
    fn from(cache: PathCache) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cache)),
        }
    }
}
