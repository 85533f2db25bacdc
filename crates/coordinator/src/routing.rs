//! Target decisions and route post-processing.

use limo_common::{GridPosition, TaskId};
use serde::{Deserialize, Serialize};

/// Why the controller picked a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetReason {
    /// Drive to the lobby of the best-ranked passenger
    NextPickup,
    /// Drive the passenger on board to its destination
    Deliver,
    /// Drop-off was refused, try another company
    AvoidRefusal,
}

/// The result of mapping a status event to a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDecision {
    /// Tile to drive to
    pub destination: GridPosition,

    /// Fresh pickup queue, best first. Empty means "unchanged".
    pub pickup: Vec<TaskId>,

    pub reason: TargetReason,
}

impl RouteDecision {
    pub fn pickup(destination: GridPosition, pickup: Vec<TaskId>) -> Self {
        Self {
            destination,
            pickup,
            reason: TargetReason::NextPickup,
        }
    }

    pub fn deliver(destination: GridPosition, pickup: Vec<TaskId>) -> Self {
        Self {
            destination,
            pickup,
            reason: TargetReason::Deliver,
        }
    }

    pub fn avoid_refusal(destination: GridPosition) -> Self {
        Self {
            destination,
            pickup: Vec::new(),
            reason: TargetReason::AvoidRefusal,
        }
    }
}

/// Append the second-to-last waypoint so the limo still has a move queued
/// when it reaches the end of the route.
///
/// `[p0, p1, p2, p3, p4]` becomes `[p0, p1, p2, p3, p4, p3]`. Routes of
/// fewer than two points are left alone.
pub fn pad_route(mut path: Vec<GridPosition>) -> Vec<GridPosition> {
    if path.len() > 1 {
        let back = path[path.len() - 2];
        path.push(back);
    }
    path
}
