//! Passenger selection and decision making for one limo.
//!
//! The coordinator is the limo's brain. It:
//! 1. Receives setup and status events from the host simulation
//! 2. Ranks waiting passengers by points per weighted trip cost
//! 3. Routes the limo with the breadth-first pathfinder
//! 4. Sends `ready` / `move` orders back to the host
//!
//! # Architecture
//!
//! ```text
//!  Host simulation
//!       │ setup / status
//!       ▼
//! ┌────────────────────┐
//! │ DecisionController │ ──► Order { ready | move, path, pickup }
//! └─────────┬──────────┘
//!           │
//!     ┌─────┴──────┐
//!     ▼            ▼
//! [TaskSelector] [PathFinder + PathCache]
//!     │            ▲
//!     └── costs ───┘
//! ```

pub mod avatar;
pub mod config;
pub mod controller;
pub mod routing;
pub mod selector;

pub use avatar::{avatar, AVATAR_SIZE};
pub use config::{CoordinatorConfig, PathfindingConfig, RoutingConfig, ScoringConfig};
pub use controller::DecisionController;
pub use routing::{pad_route, RouteDecision, TargetReason};
pub use selector::{RankedTask, Score, TaskSelector};
