//! FIFO breadth-first search over the four cardinal directions.

use crate::cache::{CachedPath, PathCache};
use limo_common::{GridMap, GridPosition, LimoError, Result};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, trace};

/// A route together with its hop cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    /// Tiles from start to goal, both inclusive
    pub path: Vec<GridPosition>,

    /// Number of moves (`path.len() - 1`)
    pub cost: u32,

    /// Whether the answer came straight from the cache
    pub from_cache: bool,
}

impl PathResult {
    pub(crate) fn already_there(start: GridPosition) -> Self {
        Self {
            path: vec![start],
            cost: 0,
            from_cache: false,
        }
    }

    pub(crate) fn from_cache(entry: CachedPath) -> Self {
        Self {
            path: entry.path,
            cost: entry.cost,
            from_cache: true,
        }
    }

    pub(crate) fn searched(entry: CachedPath) -> Self {
        Self {
            path: entry.path,
            cost: entry.cost,
            from_cache: false,
        }
    }
}

/// Raw result of one search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub path: Vec<GridPosition>,
    /// Tiles dequeued before the goal was discovered
    pub expanded: usize,
}

/// Breadth-first search from `start` to `goal`, uncached.
///
/// Neighbours are enumerated west, east, north, south and the search stops
/// as soon as the goal is discovered, so among equally short routes the
/// one found first in that order wins. The start tile itself does not need
/// to be traversable. Fails with [`LimoError::PathNotFound`] once the
/// frontier is exhausted.
pub fn breadth_first<M: GridMap + ?Sized>(
    map: &M,
    start: GridPosition,
    goal: GridPosition,
) -> Result<SearchOutcome> {
    if start == goal {
        return Ok(SearchOutcome {
            path: vec![start],
            expanded: 0,
        });
    }

    // parent links double as the seen set
    let mut parents: HashMap<GridPosition, GridPosition> = HashMap::new();
    let mut frontier = VecDeque::from([start]);
    parents.insert(start, start);
    let mut expanded = 0;

    while let Some(current) = frontier.pop_front() {
        expanded += 1;
        for next in current.neighbors() {
            if parents.contains_key(&next) || !map.is_traversable(next) {
                continue;
            }
            parents.insert(next, current);
            if next == goal {
                let path = walk_back(&parents, start, goal);
                trace!(%start, %goal, hops = path.len() - 1, expanded, "Search reached goal");
                return Ok(SearchOutcome { path, expanded });
            }
            frontier.push_back(next);
        }
    }

    debug!(%start, %goal, expanded, "Frontier exhausted without reaching goal");
    Err(LimoError::PathNotFound { start, goal })
}

fn walk_back(
    parents: &HashMap<GridPosition, GridPosition>,
    start: GridPosition,
    goal: GridPosition,
) -> Vec<GridPosition> {
    let mut path = vec![goal];
    let mut at = goal;
    while at != start {
        at = parents[&at];
        path.push(at);
    }
    path.reverse();
    path
}

/// Pathfinder over one map, backed by a caller-owned cache.
pub struct PathFinder<'a, M: GridMap + ?Sized> {
    map: &'a M,
    cache: &'a mut PathCache,
    caching: bool,
}

impl<'a, M: GridMap + ?Sized> PathFinder<'a, M> {
    /// Bind a finder to a map. Entries cached against another revision of
    /// the map are dropped here.
    pub fn new(map: &'a M, cache: &'a mut PathCache) -> Self {
        cache.sync_revision(map.revision());
        Self {
            map,
            cache,
            caching: true,
        }
    }

    /// Turn cache lookups and inserts on or off.
    pub fn caching(mut self, enabled: bool) -> Self {
        self.caching = enabled;
        self
    }

    pub fn map(&self) -> &M {
        self.map
    }

    /// Shortest route from `start` to `goal`, both inclusive.
    pub fn compute_path(&mut self, start: GridPosition, goal: GridPosition) -> Result<PathResult> {
        if start == goal {
            return Ok(PathResult::already_there(start));
        }

        if self.caching {
            if let Some(hit) = self.cache.get(start, goal).cloned() {
                self.cache.record_hit();
                debug!(%start, %goal, cost = hit.cost, "Path cache hit");
                return Ok(PathResult::from_cache(hit));
            }
        }

        let outcome = breadth_first(self.map, start, goal)?;
        let entry = CachedPath::new(outcome.path);

        if self.caching {
            self.cache.record_miss(outcome.expanded);
            let added = self.cache.insert_suffixes(&entry.path);
            debug!(
                %start,
                %goal,
                cost = entry.cost,
                cached = added,
                "Path cache miss, searched"
            );
        }

        Ok(PathResult::searched(entry))
    }

    /// Hop count only.
    pub fn cost(&mut self, start: GridPosition, goal: GridPosition) -> Result<u32> {
        self.compute_path(start, goal).map(|r| r.cost)
    }
}
