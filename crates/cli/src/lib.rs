//! Offline driver for the limo decision controller.
//!
//! Loads a [`Scenario`] (map, roster and a script of host events) and
//! replays it against a [`limo_coordinator::DecisionController`], printing
//! every order the controller sends.

pub mod scenario;

pub use scenario::{Boarding, Move, Scenario, ScenarioEvent};
