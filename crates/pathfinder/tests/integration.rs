//! Property and scenario tests for the breadth-first pathfinder.
//!
//! Distances are checked against an independent full-grid BFS on small
//! random maps.

use limo_common::{GridMap, GridPosition, LimoError, TileMap};
use limo_pathfinder::{PathCache, PathFinder};
use proptest::prelude::*;
use std::collections::{HashMap, VecDeque};
use std::sync::mpsc;
use std::time::Duration;

fn p(x: i32, y: i32) -> GridPosition {
    GridPosition::new(x, y)
}

/// Distance from `start` to every reachable tile.
fn reference_distances(map: &TileMap, start: GridPosition) -> HashMap<GridPosition, u32> {
    let mut dist = HashMap::from([(start, 0)]);
    let mut queue = VecDeque::from([start]);
    while let Some(at) = queue.pop_front() {
        let d = dist[&at];
        for next in at.neighbors() {
            if map.is_traversable(next) && !dist.contains_key(&next) {
                dist.insert(next, d + 1);
                queue.push_back(next);
            }
        }
    }
    dist
}

fn grid_from_bits(width: usize, height: usize, bits: &[bool]) -> TileMap {
    let rows: Vec<String> = bits
        .chunks(width)
        .take(height)
        .map(|row| row.iter().map(|&open| if open { '.' } else { '#' }).collect())
        .collect();
    TileMap::from_rows(&rows).unwrap()
}

fn assert_valid_route(
    map: &TileMap,
    path: &[GridPosition],
    start: GridPosition,
    goal: GridPosition,
) {
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&goal));
    for pair in path.windows(2) {
        assert_eq!(pair[0].manhattan(pair[1]), 1, "non-adjacent step {:?}", pair);
    }
    for tile in &path[1..] {
        assert!(map.is_traversable(*tile), "route crosses blocked tile {}", tile);
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_three_by_three_room() {
    let map = TileMap::open(3, 3);
    let mut cache = PathCache::new();
    let result = PathFinder::new(&map, &mut cache)
        .compute_path(p(0, 0), p(2, 2))
        .unwrap();

    assert_eq!(result.cost, 4);
    assert_valid_route(&map, &result.path, p(0, 0), p(2, 2));
}

#[test]
fn test_sub_path_reused_from_other_query() {
    let map = TileMap::from_rows(&[
        "......",
        ".####.",
        "......",
    ])
    .unwrap();
    let mut cache = PathCache::new();
    let mut finder = PathFinder::new(&map, &mut cache);

    let full = finder.compute_path(p(0, 0), p(5, 2)).unwrap();
    let mid = full.path[2];
    let from_mid = finder.compute_path(mid, p(5, 2)).unwrap();

    assert!(from_mid.from_cache);
    assert_eq!(from_mid.path, full.path[2..].to_vec());
    assert_eq!(from_mid.cost, full.cost - 2);
}

#[test]
fn test_unreachable_terminates() {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        // a walled-off pocket in the middle of a large open map
        let mut map = TileMap::open(60, 60);
        for pos in p(30, 30).neighbors() {
            map.set_traversable(pos, false).unwrap();
        }
        let mut cache = PathCache::new();
        let result = PathFinder::new(&map, &mut cache).compute_path(p(0, 0), p(30, 30));
        let _ = tx.send(result);
    });

    let result = rx
        .recv_timeout(Duration::from_secs(10))
        .expect("search did not terminate");
    assert!(matches!(result, Err(LimoError::PathNotFound { .. })));
}

#[test]
fn test_irregular_map_with_off_map_goal() {
    let map = TileMap::from_rows(&["..", ".."]).unwrap();
    let mut cache = PathCache::new();
    let err = PathFinder::new(&map, &mut cache)
        .compute_path(p(0, 0), p(5, 5))
        .unwrap_err();
    assert!(matches!(err, LimoError::PathNotFound { .. }));
}

// ============================================================================
// Properties
// ============================================================================

fn arb_grid() -> impl Strategy<Value = (usize, usize, Vec<bool>)> {
    (2_usize..8, 2_usize..8).prop_flat_map(|(w, h)| {
        (
            Just(w),
            Just(h),
            prop::collection::vec(prop::bool::weighted(0.75), w * h),
        )
    })
}

proptest! {
    #[test]
    fn property_hop_count_matches_reference(
        (w, h, bits) in arb_grid(),
        sx in 0_i32..8, sy in 0_i32..8, gx in 0_i32..8, gy in 0_i32..8,
    ) {
        let map = grid_from_bits(w, h, &bits);
        let start = p(sx % w as i32, sy % h as i32);
        let goal = p(gx % w as i32, gy % h as i32);
        let reference = reference_distances(&map, start);

        let mut cache = PathCache::new();
        let result = PathFinder::new(&map, &mut cache).compute_path(start, goal);

        match reference.get(&goal) {
            Some(&distance) => {
                let found = result.unwrap();
                prop_assert_eq!(found.cost, distance);
                prop_assert_eq!(found.path.len() as u32, distance + 1);
                prop_assert!(found.cost >= start.manhattan(goal));
                assert_valid_route(&map, &found.path, start, goal);
            }
            None => {
                let is_not_found = matches!(result, Err(LimoError::PathNotFound { .. }));
                prop_assert!(is_not_found);
            }
        }
    }

    #[test]
    fn property_cache_hit_equals_miss(
        (w, h, bits) in arb_grid(),
        sx in 0_i32..8, sy in 0_i32..8, gx in 0_i32..8, gy in 0_i32..8,
    ) {
        let map = grid_from_bits(w, h, &bits);
        let start = p(sx % w as i32, sy % h as i32);
        let goal = p(gx % w as i32, gy % h as i32);

        let mut cache = PathCache::new();
        let mut finder = PathFinder::new(&map, &mut cache);
        if let Ok(miss) = finder.compute_path(start, goal) {
            let hit = finder.compute_path(start, goal).unwrap();
            prop_assert_eq!(&miss.path, &hit.path);
            prop_assert_eq!(miss.cost, hit.cost);
        }
    }

    #[test]
    fn property_cached_suffixes_are_shortest(
        (w, h, bits) in arb_grid(),
        sx in 0_i32..8, sy in 0_i32..8, gx in 0_i32..8, gy in 0_i32..8,
    ) {
        let map = grid_from_bits(w, h, &bits);
        let start = p(sx % w as i32, sy % h as i32);
        let goal = p(gx % w as i32, gy % h as i32);

        let mut cache = PathCache::new();
        let found = PathFinder::new(&map, &mut cache).compute_path(start, goal);
        if let Ok(found) = found {
            for point in &found.path[..found.path.len() - 1] {
                let entry = cache.get(*point, goal).unwrap();
                let reference = reference_distances(&map, *point);
                prop_assert_eq!(entry.cost, reference[&goal]);
            }
        }
    }
}
