//! Breadth-first grid pathfinding for the limo dispatch controller.
//!
//! Every move costs one hop, so a plain FIFO breadth-first search finds a
//! shortest route the first time it discovers the goal. Each successful
//! search also fills the cache with the route from every tile on the found
//! path to the same goal, so later queries from anywhere along it are free.
//!
//! # Architecture
//!
//! ```text
//! compute_path(start, goal)
//!      │
//!      ▼
//! ┌────────────────┐  hit   ┌─────────────────────────────┐
//! │   PathCache    │ ─────► │ (path, cost) returned as-is │
//! └───────┬────────┘        └─────────────────────────────┘
//!         │ miss
//!         ▼
//! ┌────────────────┐  goal found  ┌──────────────────────────────┐
//! │ BFS (W,E,N,S)  │ ───────────► │ cache every (p, goal) suffix │
//! └───────┬────────┘              └──────────────────────────────┘
//!         │ frontier empty
//!         ▼
//!   PathNotFound
//! ```
//!
//! The cache is an explicit value owned by the caller. [`SharedPathCache`]
//! wraps one for hosts that drive several limos from different threads.

pub mod cache;
pub mod search;

pub use cache::{CacheStats, CachedPath, PathCache, SharedPathCache};
pub use search::{breadth_first, PathFinder, PathResult, SearchOutcome};
