//! Scenario files: a starting world plus a script of host events.
//!
//! ```toml
//! agent = "me"
//! map = [
//!     "B...B",
//!     ".#.#.",
//!     "B...B",
//! ]
//!
//! [[companies]]
//! id = "acme"
//! bus_stop = { x = 0, y = 0 }
//!
//! [[tasks]]
//! id = "alice"
//! points = 40.0
//! lobby = "acme"
//! destination = "globex"
//!
//! [[agents]]
//! id = "me"
//! position = { x = 2, y = 0 }
//!
//! [[events]]
//! status = "PASSENGER_PICKED_UP"
//! moves = [{ agent = "me", to = { x = 0, y = 0 } }]
//! pick_up = [{ agent = "me", passenger = "alice" }]
//! ```

use limo_common::{
    Agent, AgentId, Company, FnSink, GridPosition, LimoError, Order, Task, TaskId, TileMap,
    WorldSnapshot,
};
use limo_coordinator::{CoordinatorConfig, DecisionController};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// A starting world and the events to replay against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Limo driven by the controller
    pub agent: AgentId,

    /// Map rows, `.`/`B` driveable and `#` blocked
    pub map: Vec<String>,

    #[serde(default)]
    pub companies: Vec<Company>,

    #[serde(default)]
    pub tasks: Vec<Task>,

    #[serde(default)]
    pub agents: Vec<Agent>,

    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

/// One status message from the host, with the world changes that led to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioEvent {
    /// Wire status, e.g. `PASSENGER_DELIVERED`
    pub status: String,

    /// Limo the status is about; the controlled limo if omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<AgentId>,

    #[serde(default)]
    pub moves: Vec<Move>,

    #[serde(default)]
    pub pick_up: Vec<Boarding>,

    /// Limos dropping their passenger at its destination
    #[serde(default)]
    pub deliver: Vec<AgentId>,

    /// Limos whose passenger got out before arriving
    #[serde(default)]
    pub abandon: Vec<AgentId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Move {
    pub agent: AgentId,
    pub to: GridPosition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boarding {
    pub agent: AgentId,
    pub passenger: TaskId,
}

impl Scenario {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read scenario file '{}': {}", path.display(), e)
        })?;
        let scenario = Self::from_toml(&content)?;
        debug!(
            path = %path.display(),
            events = scenario.events.len(),
            "Loaded scenario"
        );
        Ok(scenario)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let scenario: Scenario = toml::from_str(content)?;
        if !scenario.agents.iter().any(|a| a.id == scenario.agent) {
            anyhow::bail!("Controlled agent '{}' is not in the agent list", scenario.agent);
        }
        Ok(scenario)
    }

    pub fn tile_map(&self) -> limo_common::Result<TileMap> {
        TileMap::from_rows(&self.map)
    }

    /// World before the first event.
    pub fn initial_world(&self) -> WorldSnapshot {
        WorldSnapshot::new(self.agents.clone(), self.companies.clone(), self.tasks.clone())
    }

    /// Run setup and every event, writing each order to `out` as one JSON
    /// line. Returns the orders in the order they were sent.
    ///
    /// Events the controller cannot handle are logged and skipped, as a
    /// live host would.
    pub fn replay<W: Write>(
        &self,
        config: CoordinatorConfig,
        out: &mut W,
    ) -> anyhow::Result<Vec<Order>> {
        let mut controller = DecisionController::new(self.agent.clone(), self.tile_map()?, config)?;
        let mut world = self.initial_world();
        let mut sent = Vec::new();

        let mut sink = FnSink(|order: Order| -> limo_common::Result<()> {
            serde_json::to_writer(&mut *out, &order)?;
            writeln!(out)?;
            sent.push(order);
            Ok(())
        });

        controller.on_setup(&world, &mut sink)?;

        for (index, event) in self.events.iter().enumerate() {
            event.apply(&mut world)?;
            let about = event.about.as_deref().unwrap_or(&self.agent);
            debug!(index, status = %event.status, about, "Replaying event");
            controller.handle_status(&event.status, about, &world, &mut sink);
        }
        drop(sink);

        info!(
            events = self.events.len(),
            orders = sent.len(),
            cache_entries = controller.cache().len(),
            "Scenario finished"
        );
        Ok(sent)
    }
}

impl ScenarioEvent {
    /// Apply this event's world changes: moves first, then pickups,
    /// deliveries and abandonments.
    pub fn apply(&self, world: &mut WorldSnapshot) -> limo_common::Result<()> {
        for m in &self.moves {
            agent_mut(world, &m.agent)?.position = m.to;
        }
        for boarding in &self.pick_up {
            board(world, &boarding.agent, &boarding.passenger)?;
        }
        for agent in &self.deliver {
            deliver(world, agent)?;
        }
        for agent in &self.abandon {
            abandon(world, agent)?;
        }
        Ok(())
    }
}

fn agent_mut<'a>(world: &'a mut WorldSnapshot, id: &str) -> limo_common::Result<&'a mut Agent> {
    world
        .agents
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| LimoError::UnknownAgent(id.to_string()))
}

fn task_mut<'a>(world: &'a mut WorldSnapshot, id: &str) -> limo_common::Result<&'a mut Task> {
    world
        .tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| LimoError::UnknownTask(id.to_string()))
}

fn board(world: &mut WorldSnapshot, agent: &str, passenger: &str) -> limo_common::Result<()> {
    task_mut(world, passenger)?.car = Some(agent.to_string());
    agent_mut(world, agent)?.passenger = Some(passenger.to_string());
    for company in &mut world.companies {
        company.passengers.retain(|waiting| waiting != passenger);
    }
    Ok(())
}

/// The passenger waits at its destination lobby with no onward trip.
fn deliver(world: &mut WorldSnapshot, agent: &str) -> limo_common::Result<()> {
    let Some(passenger) = agent_mut(world, agent)?.passenger.take() else {
        return Ok(());
    };
    agent_mut(world, agent)?.delivered.insert(passenger.clone());

    let task = task_mut(world, &passenger)?;
    task.car = None;
    task.delivered = true;
    task.lobby = task.destination.take();
    let lobby = task.lobby.clone();

    if let Some(company) = world.companies.iter_mut().find(|c| Some(&c.id) == lobby.as_ref()) {
        company.passengers.push(passenger);
    }
    Ok(())
}

/// The passenger goes back to its lobby queue.
fn abandon(world: &mut WorldSnapshot, agent: &str) -> limo_common::Result<()> {
    let Some(passenger) = agent_mut(world, agent)?.passenger.take() else {
        return Ok(());
    };

    let task = task_mut(world, &passenger)?;
    task.car = None;
    task.abandoned = true;
    let lobby = task.lobby.clone();

    if let Some(company) = world.companies.iter_mut().find(|c| Some(&c.id) == lobby.as_ref()) {
        company.passengers.push(passenger);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORRIDOR: &str = r#"
agent = "me"
map = ["B...B....B"]

[[companies]]
id = "x"
bus_stop = { x = 0, y = 0 }
passengers = ["alice"]

[[companies]]
id = "y"
bus_stop = { x = 4, y = 0 }

[[companies]]
id = "z"
bus_stop = { x = 9, y = 0 }

[[tasks]]
id = "alice"
points = 40.0
lobby = "x"
destination = "z"

[[agents]]
id = "me"
position = { x = 2, y = 0 }

[[agents]]
id = "rival"
position = { x = 9, y = 0 }
"#;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::from_toml(CORRIDOR).unwrap();
        assert_eq!(scenario.agent, "me");
        assert_eq!(scenario.companies.len(), 3);
        assert_eq!(scenario.tasks[0].points, 40.0);
        assert!(scenario.events.is_empty());
        assert_eq!(scenario.tile_map().unwrap().width(), 10);
    }

    #[test]
    fn test_controlled_agent_must_exist() {
        let toml = CORRIDOR.replace("agent = \"me\"", "agent = \"ghost\"");
        assert!(Scenario::from_toml(&toml).is_err());
    }

    #[test]
    fn test_pick_up_then_deliver() {
        let scenario = Scenario::from_toml(CORRIDOR).unwrap();
        let mut world = scenario.initial_world();

        let pick_up = ScenarioEvent {
            status: "PASSENGER_PICKED_UP".into(),
            moves: vec![Move {
                agent: "me".into(),
                to: GridPosition::new(0, 0),
            }],
            pick_up: vec![Boarding {
                agent: "me".into(),
                passenger: "alice".into(),
            }],
            ..Default::default()
        };
        pick_up.apply(&mut world).unwrap();
        assert_eq!(world.agent("me").unwrap().passenger.as_deref(), Some("alice"));
        assert_eq!(world.task("alice").unwrap().car.as_deref(), Some("me"));
        assert_eq!(world.company("x").unwrap().queued(), 0);

        let deliver = ScenarioEvent {
            status: "PASSENGER_DELIVERED".into(),
            deliver: vec!["me".into()],
            ..Default::default()
        };
        deliver.apply(&mut world).unwrap();
        let me = world.agent("me").unwrap();
        assert!(me.is_empty());
        assert!(me.has_delivered("alice"));
        let alice = world.task("alice").unwrap();
        assert!(alice.delivered);
        assert_eq!(alice.lobby.as_deref(), Some("z"));
        assert!(alice.destination.is_none());
        assert_eq!(world.company("z").unwrap().passengers, vec!["alice".to_string()]);
    }

    #[test]
    fn test_abandon_returns_to_lobby() {
        let scenario = Scenario::from_toml(CORRIDOR).unwrap();
        let mut world = scenario.initial_world();
        board(&mut world, "me", "alice").unwrap();

        abandon(&mut world, "me").unwrap();
        let alice = world.task("alice").unwrap();
        assert!(alice.abandoned);
        assert!(alice.car.is_none());
        assert_eq!(world.company("x").unwrap().passengers, vec!["alice".to_string()]);
    }

    #[test]
    fn test_unknown_agent_in_event() {
        let scenario = Scenario::from_toml(CORRIDOR).unwrap();
        let mut world = scenario.initial_world();
        let event = ScenarioEvent {
            status: "NO_PATH".into(),
            moves: vec![Move {
                agent: "ghost".into(),
                to: GridPosition::new(0, 0),
            }],
            ..Default::default()
        };
        assert!(matches!(event.apply(&mut world), Err(LimoError::UnknownAgent(_))));
    }

    #[test]
    fn test_replay_setup_only() {
        let scenario = Scenario::from_toml(CORRIDOR).unwrap();
        let mut out = Vec::new();

        let orders = scenario
            .replay(CoordinatorConfig::default().with_seed(1), &mut out)
            .unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].pickup, vec!["alice".to_string()]);

        let text = String::from_utf8(out).unwrap();
        let line: Order = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(line, orders[0]);
    }
}
