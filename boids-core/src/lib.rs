//! Shared building blocks for the boids simulation: vector helpers, the
//! toroidal world and the agent record used by prey and predators alike.

pub mod agent;
pub mod vector;
pub mod world;

pub use agent::{Agent, MotionLimits, Role};
pub use glam::Vec2;
pub use vector::{clamp_magnitude, heading, seek};
pub use world::WorldBounds;

