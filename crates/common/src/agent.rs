//! The limo (agent) as reported by the host.

use crate::grid::GridPosition;
use crate::task::TaskId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type AgentId = String;

/// A limo and its owning player's bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Unique limo ID
    pub id: AgentId,

    /// Player name
    #[serde(default)]
    pub name: String,

    /// Tile the limo is on
    pub position: GridPosition,

    /// Passenger in the limo, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger: Option<TaskId>,

    /// Passengers this limo has already delivered
    #[serde(default)]
    pub delivered: BTreeSet<TaskId>,

    /// Pickup priority queue last sent to the host
    #[serde(default)]
    pub pickup: Vec<TaskId>,

    /// Route last sent to the host
    #[serde(default)]
    pub path: Vec<GridPosition>,
}

impl Agent {
    pub fn new(id: impl Into<AgentId>, position: GridPosition) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            position,
            passenger: None,
            delivered: BTreeSet::new(),
            pickup: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn carrying(mut self, passenger: impl Into<TaskId>) -> Self {
        self.passenger = Some(passenger.into());
        self
    }

    pub fn with_delivered(mut self, passenger: impl Into<TaskId>) -> Self {
        self.delivered.insert(passenger.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.passenger.is_none()
    }

    pub fn is_carrying(&self, passenger: &str) -> bool {
        self.passenger.as_deref() == Some(passenger)
    }

    pub fn has_delivered(&self, passenger: &str) -> bool {
        self.delivered.contains(passenger)
    }
}
