//! Orders sent back to the host simulation.

use crate::grid::GridPosition;
use crate::task::TaskId;
use serde::{Deserialize, Serialize};

/// Order tag understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// First order of the game
    Ready,
    /// Any later change of route or pickup queue
    Move,
}

/// A route plus the pickup priority queue for the limo to follow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub kind: OrderKind,

    /// Tiles to drive through, in order
    pub path: Vec<GridPosition>,

    /// Passengers to pick up, best first
    pub pickup: Vec<TaskId>,
}

impl Order {
    pub fn ready(path: Vec<GridPosition>, pickup: Vec<TaskId>) -> Self {
        Self {
            kind: OrderKind::Ready,
            path,
            pickup,
        }
    }

    pub fn moving(path: Vec<GridPosition>, pickup: Vec<TaskId>) -> Self {
        Self {
            kind: OrderKind::Move,
            path,
            pickup,
        }
    }
}
