//! Passengers and the companies they travel between.

use crate::agent::AgentId;
use crate::grid::GridPosition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type TaskId = String;
pub type CompanyId = String;

/// A passenger waiting for (or riding in) a limo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique passenger ID
    pub id: TaskId,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Company lobby the passenger waits at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lobby: Option<CompanyId>,

    /// Company the passenger wants to go to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<CompanyId>,

    /// Points awarded on delivery
    pub points: f64,

    /// Passengers this one refuses to share a destination lobby with
    #[serde(default)]
    pub enemies: BTreeSet<TaskId>,

    /// Limo currently carrying the passenger
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car: Option<AgentId>,

    #[serde(default)]
    pub delivered: bool,

    #[serde(default)]
    pub abandoned: bool,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, points: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            lobby: None,
            destination: None,
            points,
            enemies: BTreeSet::new(),
            car: None,
            delivered: false,
            abandoned: false,
        }
    }

    pub fn with_route(
        mut self,
        lobby: impl Into<CompanyId>,
        destination: impl Into<CompanyId>,
    ) -> Self {
        self.lobby = Some(lobby.into());
        self.destination = Some(destination.into());
        self
    }

    pub fn with_enemy(mut self, enemy: impl Into<TaskId>) -> Self {
        self.enemies.insert(enemy.into());
        self
    }

    pub fn in_car(mut self, agent: impl Into<AgentId>) -> Self {
        self.car = Some(agent.into());
        self
    }

    pub fn is_carried(&self) -> bool {
        self.car.is_some()
    }

    pub fn is_enemy(&self, other: &str) -> bool {
        self.enemies.contains(other)
    }
}

/// A company building with a bus stop and a lobby of waiting passengers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,

    #[serde(default)]
    pub name: String,

    /// Tile where limos pick up and drop off
    pub bus_stop: GridPosition,

    /// Passengers currently in the lobby
    #[serde(default)]
    pub passengers: Vec<TaskId>,
}

impl Company {
    pub fn new(id: impl Into<CompanyId>, bus_stop: GridPosition) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            bus_stop,
            passengers: Vec::new(),
        }
    }

    pub fn with_passenger(mut self, passenger: impl Into<TaskId>) -> Self {
        self.passengers.push(passenger.into());
        self
    }

    /// Number of passengers waiting in the lobby.
    pub fn queued(&self) -> usize {
        self.passengers.len()
    }
}
