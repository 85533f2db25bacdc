//! Error types for the limo dispatch controller.

use crate::grid::GridPosition;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LimoError {
    #[error("No path from {start} to {goal}")]
    PathNotFound {
        start: GridPosition,
        goal: GridPosition,
    },

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("No eligible passenger to pick up")]
    EmptySelection,

    #[error("No alternative destination to retry a refused drop-off")]
    NoAlternativeDestination,

    #[error("Unknown passenger: {0}")]
    UnknownTask(String),

    #[error("Unknown company: {0}")]
    UnknownCompany(String),

    #[error("Unknown limo: {0}")]
    UnknownAgent(String),

    #[error("Invalid map: {0}")]
    InvalidMap(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LimoError {
    /// Whether this error only means "nothing to do right now".
    ///
    /// The controller keeps its previous route for these instead of
    /// treating them as a fault.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LimoError::PathNotFound { .. } | LimoError::EmptySelection
        )
    }
}

pub type Result<T> = std::result::Result<T, LimoError>;
