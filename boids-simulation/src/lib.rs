//! Flocking engine: neighbour discovery, steering behaviours, integration and
//! the per-tick orchestration that ties them together.

pub mod flock;
pub mod integrator;
pub mod neighbors;
pub mod spatial;
pub mod steering;

use boids_config::ConfigError;
use thiserror::Error;

pub use flock::{AgentView, Flock, TickSummary};
pub use integrator::{advance, integrate};
pub use neighbors::{GroupFilter, NeighborQuery};
pub use spatial::SpatialGrid;
pub use steering::{alignment, chase, cohesion, flee, nearest, pursuit, select_target, separation, Steering, SteeringRules};

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot spawn a predator while predator_mode is off")]
    PredatorModeDisabled,
}
