//! Snapshot of the roster the host sends with every event.

use crate::agent::Agent;
use crate::error::{LimoError, Result};
use crate::task::{Company, Task};
use serde::{Deserialize, Serialize};

/// All limos, companies and passengers as last reported by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    #[serde(default)]
    pub agents: Vec<Agent>,

    #[serde(default)]
    pub companies: Vec<Company>,

    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl WorldSnapshot {
    pub fn new(agents: Vec<Agent>, companies: Vec<Company>, tasks: Vec<Task>) -> Self {
        Self {
            agents,
            companies,
            tasks,
        }
    }

    pub fn agent(&self, id: &str) -> Result<&Agent> {
        self.agents
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| LimoError::UnknownAgent(id.to_string()))
    }

    pub fn company(&self, id: &str) -> Result<&Company> {
        self.companies
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| LimoError::UnknownCompany(id.to_string()))
    }

    pub fn task(&self, id: &str) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| LimoError::UnknownTask(id.to_string()))
    }

    /// Lobby company of a passenger; fails if the passenger has none.
    pub fn lobby_of(&self, task: &Task) -> Result<&Company> {
        let id = task
            .lobby
            .as_deref()
            .ok_or_else(|| LimoError::UnknownCompany(format!("{} has no lobby", task.id)))?;
        self.company(id)
    }

    /// Destination company of a passenger; fails if the passenger has none.
    pub fn destination_of(&self, task: &Task) -> Result<&Company> {
        let id = task.destination.as_deref().ok_or_else(|| {
            LimoError::UnknownCompany(format!("{} has no destination", task.id))
        })?;
        self.company(id)
    }
}
