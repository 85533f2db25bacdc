//! Event-driven decision controller for one limo.

use crate::config::CoordinatorConfig;
use crate::routing::{pad_route, RouteDecision};
use crate::selector::TaskSelector;
use limo_common::{
    Agent, AgentId, GridMap, GridPosition, LimoError, Order, OrderSink, Result, Status, TaskId,
    TileMap, WorldSnapshot,
};
use limo_pathfinder::{PathCache, PathFinder};
use tracing::{debug, error, info, warn};

/// Reacts to host events for one limo and answers with orders.
///
/// The controller owns the map, the path cache and its working copy of
/// the route and pickup queue. Everything else (limos, companies,
/// passengers) arrives with each event as a [`WorldSnapshot`].
///
/// | status (about me)                 | target                                   |
/// |-----------------------------------|------------------------------------------|
/// | `NO_PATH` / `PASSENGER_NO_ACTION` | carried passenger's destination, else next pickup |
/// | `PASSENGER_DELIVERED` / `_ABANDONED` | next pickup (when empty)              |
/// | `PASSENGER_REFUSED`               | first company that isn't the refused one |
/// | `PASSENGER_PICKED_UP` / `_DELIVERED_AND_PICKED_UP` | carried passenger's destination |
/// | `UPDATE`                          | nothing                                  |
///
/// When another limo picks up, delivers or abandons and ends up empty,
/// this limo re-plans toward its own next pickup.
pub struct DecisionController<M: GridMap = TileMap> {
    me: AgentId,
    map: M,
    cache: PathCache,
    selector: TaskSelector,
    config: CoordinatorConfig,
    route: Vec<GridPosition>,
    pickup: Vec<TaskId>,
}

impl<M: GridMap> DecisionController<M> {
    /// Create a controller for limo `me` on `map`.
    pub fn new(me: impl Into<AgentId>, map: M, config: CoordinatorConfig) -> Result<Self> {
        config.validate()?;
        let me = me.into();

        info!(
            agent = %me,
            seed = ?config.seed,
            cache_enabled = config.pathfinding.cache_enabled,
            pad_path = config.routing.pad_path,
            "Initializing decision controller"
        );

        Ok(Self {
            selector: TaskSelector::from_config(&config),
            me,
            map,
            cache: PathCache::new(),
            config,
            route: Vec::new(),
            pickup: Vec::new(),
        })
    }

    /// Start from an existing cache, e.g. one warmed by an earlier game on
    /// the same map.
    pub fn with_cache(mut self, cache: PathCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn me(&self) -> &str {
        &self.me
    }

    /// Route last sent to the host.
    pub fn route(&self) -> &[GridPosition] {
        &self.route
    }

    /// Pickup queue last sent to the host.
    pub fn pickup(&self) -> &[TaskId] {
        &self.pickup
    }

    pub fn cache(&self) -> &PathCache {
        &self.cache
    }

    pub fn reset_cache(&mut self) {
        info!(entries = self.cache.len(), "Resetting path cache");
        self.cache.reset();
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    /// Swap in a new map. Cached paths are dropped on the next search if
    /// the map revision differs.
    pub fn replace_map(&mut self, map: M) {
        self.map = map;
    }

    /// Answer the host's setup call with a `ready` order.
    ///
    /// If there is nothing to pick up yet, or no route to it, the limo
    /// reports ready with an empty route and waits for the next event.
    pub fn on_setup(&mut self, world: &WorldSnapshot, sink: &mut dyn OrderSink) -> Result<Order> {
        let me = world.agent(&self.me)?;
        info!(
            agent = %self.me,
            position = %me.position,
            passengers = world.tasks.len(),
            companies = world.companies.len(),
            "Game setup"
        );

        let planned = self.next_pickup(me, world).and_then(|decision| {
            let path = self.route_to(me.position, decision.destination)?;
            Ok((path, decision.pickup))
        });

        let (path, pickup) = match planned {
            Ok(planned) => planned,
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "No initial route, reporting ready in place");
                (Vec::new(), Vec::new())
            }
            Err(e) => return Err(e),
        };

        let order = Order::ready(path, pickup);
        sink.send(order.clone())?;
        self.commit(&order.path, &order.pickup);
        Ok(order)
    }

    /// React to a status event about limo `about` (which may not be us).
    ///
    /// Returns the order sent, or `None` if the event needs no new route.
    /// On error nothing is sent and the previous route and pickup queue
    /// are kept.
    pub fn on_status(
        &mut self,
        status: Status,
        about: &str,
        world: &WorldSnapshot,
        sink: &mut dyn OrderSink,
    ) -> Result<Option<Order>> {
        let decision = match self.decide(status, about, world)? {
            Some(decision) => decision,
            None => {
                debug!(%status, about, "No re-plan needed");
                return Ok(None);
            }
        };

        let me = world.agent(&self.me)?;
        let path = self.route_to(me.position, decision.destination)?;

        info!(
            %status,
            about,
            reason = ?decision.reason,
            destination = %decision.destination,
            waypoints = path.len(),
            pickups = decision.pickup.len(),
            "Sending move order"
        );

        let order = Order::moving(path, decision.pickup);
        sink.send(order.clone())?;
        self.commit(&order.path, &order.pickup);
        Ok(Some(order))
    }

    /// Host-facing entry point: parses the wire status and never fails.
    ///
    /// Errors are logged and the event is skipped so the next one can
    /// still be processed.
    pub fn handle_status(
        &mut self,
        status: &str,
        about: &str,
        world: &WorldSnapshot,
        sink: &mut dyn OrderSink,
    ) -> Option<Order> {
        let result = status
            .parse::<Status>()
            .and_then(|status| self.on_status(status, about, world, sink));

        match result {
            Ok(order) => order,
            Err(e @ LimoError::UnknownStatus(_)) => {
                error!(status, about, error = %e, "Unrecognized status from host, skipping event");
                None
            }
            Err(LimoError::EmptySelection) => {
                info!(status, about, "Nothing to pick up, idling on current route");
                None
            }
            Err(e) if e.is_recoverable() => {
                warn!(status, about, error = %e, "Keeping previous route");
                None
            }
            Err(e) => {
                error!(status, about, error = %e, "Failed to handle status");
                None
            }
        }
    }

    fn decide(
        &mut self,
        status: Status,
        about: &str,
        world: &WorldSnapshot,
    ) -> Result<Option<RouteDecision>> {
        let me = world.agent(&self.me)?;

        if about != self.me {
            let other = world.agent(about)?;
            return match status {
                Status::PassengerPickedUp | Status::PassengerDelivered | Status::PassengerAbandoned
                    if other.is_empty() =>
                {
                    debug!(other = about, %status, "Another limo is free, re-planning");
                    self.next_pickup(me, world).map(Some)
                }
                _ => Ok(None),
            };
        }

        match status {
            Status::Update => Ok(None),
            Status::NoPath | Status::PassengerNoAction => match me.passenger.as_deref() {
                None => self.next_pickup(me, world).map(Some),
                Some(carried) => Ok(Some(RouteDecision::deliver(
                    destination_stop(carried, world)?,
                    Vec::new(),
                ))),
            },
            Status::PassengerDelivered | Status::PassengerAbandoned => {
                if me.is_empty() {
                    self.next_pickup(me, world).map(Some)
                } else {
                    Ok(None)
                }
            }
            Status::PassengerRefused => {
                let carried = me
                    .passenger
                    .as_deref()
                    .ok_or(LimoError::NoAlternativeDestination)?;
                let refused = world.task(carried)?.destination.as_deref();
                let alternative = world
                    .companies
                    .iter()
                    .find(|company| Some(company.id.as_str()) != refused)
                    .ok_or(LimoError::NoAlternativeDestination)?;
                debug!(
                    passenger = carried,
                    refused = ?refused,
                    retry = %alternative.id,
                    "Drop-off refused"
                );
                Ok(Some(RouteDecision::avoid_refusal(alternative.bus_stop)))
            }
            Status::PassengerPickedUp | Status::PassengerDeliveredAndPickedUp => {
                let pickup = self.ranked_pickups(me, world);
                match me.passenger.as_deref() {
                    Some(carried) => Ok(Some(RouteDecision::deliver(
                        destination_stop(carried, world)?,
                        pickup,
                    ))),
                    None => {
                        warn!(
                            %status,
                            "No passenger on board after pickup, heading to next pickup"
                        );
                        self.next_pickup(me, world).map(Some)
                    }
                }
            }
        }
    }

    fn ranked_pickups(&mut self, me: &Agent, world: &WorldSnapshot) -> Vec<TaskId> {
        let mut finder = PathFinder::new(&self.map, &mut self.cache)
            .caching(self.config.pathfinding.cache_enabled);
        self.selector.pickup_order(&mut finder, me, world)
    }

    /// Head for the lobby of the best-ranked passenger.
    fn next_pickup(&mut self, me: &Agent, world: &WorldSnapshot) -> Result<RouteDecision> {
        let pickup = self.ranked_pickups(me, world);
        let top = pickup.first().ok_or(LimoError::EmptySelection)?;
        let lobby = world.lobby_of(world.task(top)?)?.bus_stop;
        Ok(RouteDecision::pickup(lobby, pickup))
    }

    fn route_to(&mut self, from: GridPosition, to: GridPosition) -> Result<Vec<GridPosition>> {
        let result = PathFinder::new(&self.map, &mut self.cache)
            .caching(self.config.pathfinding.cache_enabled)
            .compute_path(from, to)?;
        if self.config.routing.pad_path {
            Ok(pad_route(result.path))
        } else {
            Ok(result.path)
        }
    }

    /// Empty values never overwrite the working copy.
    fn commit(&mut self, path: &[GridPosition], pickup: &[TaskId]) {
        if !path.is_empty() {
            self.route = path.to_vec();
        }
        if !pickup.is_empty() {
            self.pickup = pickup.to_vec();
        }
    }
}

fn destination_stop(passenger: &str, world: &WorldSnapshot) -> Result<GridPosition> {
    let task = world.task(passenger)?;
    Ok(world.destination_of(task)?.bus_stop)
}
