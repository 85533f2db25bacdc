//! Configuration for the decision controller.
//!
//! Every field has a default, so an empty TOML file is a valid
//! configuration:
//!
//! ```toml
//! seed = 42
//!
//! [scoring]
//! pickup_weight = 0.7
//! delivery_weight = 0.3
//! enemy_penalty = 1000.0
//!
//! [pathfinding]
//! cache_enabled = true
//!
//! [routing]
//! pad_path = true
//! ```

use limo_common::LimoError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Main coordinator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Seed for the tie-break RNG. Unset means seeded from OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub pathfinding: PathfindingConfig,

    #[serde(default)]
    pub routing: RoutingConfig,
}

/// Weights of the passenger score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight of the hops from the limo to the passenger's lobby
    #[serde(default = "default_pickup_weight")]
    pub pickup_weight: f64,

    /// Weight of the hops from the lobby to the destination
    #[serde(default = "default_delivery_weight")]
    pub delivery_weight: f64,

    /// Added per enemy already waiting at the destination
    #[serde(default = "default_enemy_penalty")]
    pub enemy_penalty: f64,
}

fn default_pickup_weight() -> f64 {
    0.7
}

fn default_delivery_weight() -> f64 {
    0.3
}

fn default_enemy_penalty() -> f64 {
    1000.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pickup_weight: default_pickup_weight(),
            delivery_weight: default_delivery_weight(),
            enemy_penalty: default_enemy_penalty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathfindingConfig {
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Append the second-to-last waypoint to every route so the limo keeps
    /// moving while the next status message is in flight.
    #[serde(default = "default_true")]
    pub pad_path: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self { pad_path: true }
    }
}

fn default_true() -> bool {
    true
}

impl CoordinatorConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;
        let config = Self::from_toml(&content)?;
        debug!(path = %path.display(), seed = ?config.seed, "Loaded coordinator config");
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject weights that would invert the score.
    pub fn validate(&self) -> limo_common::Result<()> {
        let s = &self.scoring;
        for (name, value) in [
            ("pickup_weight", s.pickup_weight),
            ("delivery_weight", s.delivery_weight),
            ("enemy_penalty", s.enemy_penalty),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LimoError::Config(format!(
                    "scoring.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
