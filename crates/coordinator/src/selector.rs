//! Passenger eligibility and cost/benefit ranking.
//!
//! A passenger's score is its delivery points divided by a weighted trip
//! cost:
//!
//! ```text
//! cost  = pickup_weight   * hops(limo  -> lobby)
//!       + delivery_weight * hops(lobby -> destination)
//!       + enemy_penalty   * enemies already waiting at the destination
//! score = points / cost
//! ```
//!
//! Candidates are ranked by score, then by how many passengers already
//! wait at their destination, then at random. Passengers whose trip cannot
//! be costed (no route, unknown company) rank after every costed one and
//! are ordered among themselves by destination queue and the random draw.

use crate::config::{CoordinatorConfig, ScoringConfig};
use limo_common::{Agent, GridMap, Result, Task, TaskId, WorldSnapshot};
use limo_pathfinder::PathFinder;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Cost breakdown for one passenger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Hops from the limo to the lobby
    pub pickup_hops: u32,
    /// Hops from the lobby to the destination
    pub delivery_hops: u32,
    /// Enemies waiting at the destination
    pub enemies_waiting: usize,
    pub estimated_cost: f64,
    pub value: f64,
}

/// A candidate passenger with its ranking keys.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTask {
    pub task_id: TaskId,

    /// `None` when the trip could not be costed
    pub score: Option<Score>,

    /// Passengers already waiting at the destination
    pub destination_queue: usize,

    tie_break: u64,
}

impl RankedTask {
    pub fn value(&self) -> Option<f64> {
        self.score.map(|s| s.value)
    }

    fn rank(&self, other: &Self) -> Ordering {
        let by_score = match (self.value(), other.value()) {
            (Some(a), Some(b)) => b.total_cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_score
            .then_with(|| other.destination_queue.cmp(&self.destination_queue))
            .then_with(|| self.tie_break.cmp(&other.tie_break))
    }
}

/// Ranks the passengers a limo could pick up next.
pub struct TaskSelector<R = StdRng> {
    weights: ScoringConfig,
    rng: R,
}

impl TaskSelector<StdRng> {
    /// Selector seeded from `config.seed`, or from OS entropy if unset.
    pub fn from_config(config: &CoordinatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(config.scoring, rng)
    }
}

impl<R: Rng> TaskSelector<R> {
    pub fn new(weights: ScoringConfig, rng: R) -> Self {
        Self { weights, rng }
    }

    pub fn weights(&self) -> &ScoringConfig {
        &self.weights
    }

    /// Whether `agent` may pick up `task`: not already delivered by it,
    /// not on board, not in anyone's car, with both ends of the trip known.
    pub fn is_eligible(agent: &Agent, task: &Task) -> bool {
        !agent.has_delivered(&task.id)
            && !agent.is_carrying(&task.id)
            && !task.is_carried()
            && task.lobby.is_some()
            && task.destination.is_some()
    }

    /// Cost and value of picking up `task` from where `agent` stands.
    pub fn score<M: GridMap + ?Sized>(
        &self,
        finder: &mut PathFinder<'_, M>,
        agent: &Agent,
        task: &Task,
        world: &WorldSnapshot,
    ) -> Result<Score> {
        let lobby = world.lobby_of(task)?;
        let destination = world.destination_of(task)?;

        let pickup_hops = finder.cost(agent.position, lobby.bus_stop)?;
        let delivery_hops = finder.cost(lobby.bus_stop, destination.bus_stop)?;

        let enemies_waiting = destination
            .passengers
            .iter()
            .filter(|waiting| **waiting != task.id && task.is_enemy(waiting))
            .count();

        let estimated_cost = self.weights.pickup_weight * pickup_hops as f64
            + self.weights.delivery_weight * delivery_hops as f64
            + self.weights.enemy_penalty * enemies_waiting as f64;

        let value = if estimated_cost > 0.0 {
            task.points / estimated_cost
        } else if task.points > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        Ok(Score {
            pickup_hops,
            delivery_hops,
            enemies_waiting,
            estimated_cost,
            value,
        })
    }

    /// Eligible passengers for `agent`, best first. Never mutates the
    /// world; may be empty.
    pub fn eligible_tasks<M: GridMap + ?Sized>(
        &mut self,
        finder: &mut PathFinder<'_, M>,
        agent: &Agent,
        world: &WorldSnapshot,
    ) -> Vec<RankedTask> {
        let mut ranked: Vec<RankedTask> = world
            .tasks
            .iter()
            .filter(|task| Self::is_eligible(agent, task))
            .map(|task| {
                let score = match self.score(finder, agent, task, world) {
                    Ok(score) => {
                        debug!(
                            task_id = %task.id,
                            pickup_hops = score.pickup_hops,
                            delivery_hops = score.delivery_hops,
                            enemies = score.enemies_waiting,
                            value = score.value,
                            "Scored passenger"
                        );
                        Some(score)
                    }
                    Err(e) => {
                        warn!(
                            task_id = %task.id,
                            error = %e,
                            "Could not cost passenger, ranking by queue only"
                        );
                        None
                    }
                };
                let destination_queue = task
                    .destination
                    .as_deref()
                    .and_then(|id| world.company(id).ok())
                    .map(|company| company.queued())
                    .unwrap_or(0);
                RankedTask {
                    task_id: task.id.clone(),
                    score,
                    destination_queue,
                    tie_break: self.rng.gen(),
                }
            })
            .collect();

        ranked.sort_by(RankedTask::rank);
        ranked
    }

    /// Ids only, best first.
    pub fn pickup_order<M: GridMap + ?Sized>(
        &mut self,
        finder: &mut PathFinder<'_, M>,
        agent: &Agent,
        world: &WorldSnapshot,
    ) -> Vec<TaskId> {
        self.eligible_tasks(finder, agent, world)
            .into_iter()
            .map(|ranked| ranked.task_id)
            .collect()
    }
}
