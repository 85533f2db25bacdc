//! Grid coordinates and a simple tile map.

use crate::error::{LimoError, Result};
use crate::traits::GridMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tile coordinate on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    /// Neighbour offsets in enumeration order: west, east, north, south.
    pub const OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// `None` when the shifted coordinate does not fit in an `i32`.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// The cardinal neighbours in west, east, north, south order. Neighbours
    /// past the edge of the coordinate space are skipped.
    pub fn neighbors(self) -> impl Iterator<Item = GridPosition> {
        Self::OFFSETS
            .into_iter()
            .filter_map(move |(dx, dy)| self.offset(dx, dy))
    }

    pub fn manhattan(self, other: GridPosition) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl From<(i32, i32)> for GridPosition {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A rectangular map of driveable and blocked tiles.
///
/// Rows are parsed from text: `#` is blocked, `.` is road and `B` is a
/// bus stop (also driveable). Anything outside the rectangle is off-map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    width: usize,
    height: usize,
    tiles: Vec<bool>,
    revision: u64,
}

impl TileMap {
    /// A fully driveable map.
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![true; width * height],
            revision: 0,
        }
    }

    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(LimoError::InvalidMap("map has no tiles".into()));
        }

        let mut tiles = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                return Err(LimoError::InvalidMap(format!(
                    "row {} has {} tiles, expected {}",
                    y,
                    row.chars().count(),
                    width
                )));
            }
            for (x, c) in row.chars().enumerate() {
                let driveable = match c {
                    '.' | 'B' => true,
                    '#' => false,
                    other => {
                        return Err(LimoError::InvalidMap(format!(
                            "unexpected tile '{}' at ({}, {})",
                            other, x, y
                        )))
                    }
                };
                tiles.push(driveable);
            }
        }

        Ok(Self {
            width,
            height,
            tiles,
            revision: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: GridPosition) -> bool {
        self.index(pos).is_some()
    }

    /// Open or close a tile. Bumps the map revision so cached paths
    /// computed against the old layout are dropped.
    pub fn set_traversable(&mut self, pos: GridPosition, driveable: bool) -> Result<()> {
        let idx = self
            .index(pos)
            .ok_or_else(|| LimoError::InvalidMap(format!("{} is off the map", pos)))?;
        if self.tiles[idx] != driveable {
            self.tiles[idx] = driveable;
            self.revision += 1;
        }
        Ok(())
    }

    fn index(&self, pos: GridPosition) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }
}

impl GridMap for TileMap {
    fn is_traversable(&self, pos: GridPosition) -> bool {
        self.index(pos).map(|idx| self.tiles[idx]).unwrap_or(false)
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}
