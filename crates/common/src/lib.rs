//! Common types and traits shared across the limo dispatch crates.
//!
//! This crate holds the vocabulary every other crate speaks: grid
//! coordinates and the map query surface, the passenger/company/limo
//! model supplied by the host simulation, the status events it sends
//! and the orders the controller answers with.

pub mod agent;
pub mod error;
pub mod grid;
pub mod order;
pub mod status;
pub mod task;
pub mod traits;
pub mod world;

pub use agent::{Agent, AgentId};
pub use error::{LimoError, Result};
pub use grid::{GridPosition, TileMap};
pub use order::{Order, OrderKind};
pub use status::Status;
pub use task::{Company, CompanyId, Task, TaskId};
pub use traits::{FnSink, GridMap, OrderSink};
pub use world::WorldSnapshot;
