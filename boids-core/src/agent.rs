use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::vector::heading;

/// Which behaviour set drives an agent. Fixed for the agent's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Prey,
    Predator,
}

/// Per-role speed and steering caps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionLimits {
    pub max_speed: f32,
    pub max_force: f32,
}

impl MotionLimits {
    pub fn new(max_speed: f32, max_force: f32) -> Self {
        MotionLimits { max_speed, max_force }
    }
}

/// A single boid or predator.
///
/// Kinematic state is public so the integrator and scenario setup can work
/// on it directly. Role, group and limits are fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Forces accumulated during the current tick. Zero between ticks.
    pub acceleration: Vec2,
    role: Role,
    group: Option<u32>,
    limits: MotionLimits,
}

impl Agent {
    pub fn new(role: Role, group: Option<u32>, position: Vec2, velocity: Vec2, limits: MotionLimits) -> Self {
        Agent {
            position,
            velocity,
            acceleration: Vec2::ZERO,
            role,
            group,
            limits,
        }
    }

    /// Creates an agent with a uniformly random heading and a speed drawn from
    /// `[min_speed, limits.max_speed]`.
    pub fn with_random_heading<R: Rng + ?Sized>(
        role: Role,
        group: Option<u32>,
        position: Vec2,
        min_speed: f32,
        limits: MotionLimits,
        rng: &mut R,
    ) -> Self {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let speed = if min_speed < limits.max_speed {
            rng.gen_range(min_speed..=limits.max_speed)
        } else {
            limits.max_speed
        };
        let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;
        Agent::new(role, group, position, velocity, limits)
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub fn is_predator(&self) -> bool {
        self.role == Role::Predator
    }

    #[inline]
    pub fn group(&self) -> Option<u32> {
        self.group
    }

    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.limits.max_speed
    }

    #[inline]
    pub fn max_force(&self) -> f32 {
        self.limits.max_force
    }

    /// Adds a steering force to this tick's accumulator.
    #[inline]
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Orientation in radians, derived from the current velocity.
    #[inline]
    pub fn heading(&self) -> f32 {
        heading(self.velocity)
    }

    #[inline]
    pub fn distance_to(&self, other: &Agent) -> f32 {
        self.position.distance(other.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_heading_respects_speed_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let limits = MotionLimits::new(3.0, 0.05);
        for _ in 0..500 {
            let agent = Agent::with_random_heading(Role::Prey, Some(1), Vec2::ZERO, 1.0, limits, &mut rng);
            let speed = agent.speed();
            assert!(speed >= 1.0 - 1e-4 && speed <= 3.0 + 1e-4, "speed {speed} out of range");
            assert_eq!(agent.acceleration, Vec2::ZERO);
        }
    }

    #[test]
    fn degenerate_speed_range_uses_max_speed() {
        let mut rng = StdRng::seed_from_u64(1);
        let limits = MotionLimits::new(2.0, 0.1);
        let agent = Agent::with_random_heading(Role::Predator, None, Vec2::ZERO, 5.0, limits, &mut rng);
        assert!((agent.speed() - 2.0).abs() < 1e-5);
        assert!(agent.is_predator());
    }

    #[test]
    fn forces_accumulate() {
        let mut agent = Agent::new(Role::Prey, None, Vec2::ZERO, Vec2::X, MotionLimits::new(3.0, 0.05));
        agent.apply_force(Vec2::new(0.01, 0.0));
        agent.apply_force(Vec2::new(0.0, 0.02));
        assert_eq!(agent.acceleration, Vec2::new(0.01, 0.02));
    }
}
