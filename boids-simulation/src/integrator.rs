//! Explicit Euler step with a fixed unit timestep.

use boids_core::{clamp_magnitude, Agent, Vec2, WorldBounds};

/// Applies the accumulated acceleration, caps speed, moves the agent and
/// clears the accumulator.
#[inline]
pub fn integrate(agent: &mut Agent) {
    agent.velocity = clamp_magnitude(agent.velocity + agent.acceleration, agent.max_speed());
    agent.position += agent.velocity;
    agent.acceleration = Vec2::ZERO;
}

/// One full movement step for a single agent: force, integration, wrap.
#[inline]
pub fn advance(agent: &mut Agent, force: Vec2, bounds: &WorldBounds) {
    agent.apply_force(force);
    integrate(agent);
    agent.position = bounds.wrap(agent.position);
}

#[cfg(test)]
mod tests {
    use super::*;
    use boids_core::{MotionLimits, Role};

    fn agent(velocity: Vec2) -> Agent {
        Agent::new(Role::Prey, None, Vec2::new(10.0, 10.0), velocity, MotionLimits::new(3.0, 0.05))
    }

    #[test]
    fn integrate_moves_and_resets_acceleration() {
        let mut a = agent(Vec2::new(1.0, 0.0));
        a.apply_force(Vec2::new(0.0, 0.5));
        integrate(&mut a);

        assert_eq!(a.velocity, Vec2::new(1.0, 0.5));
        assert_eq!(a.position, Vec2::new(11.0, 10.5));
        assert_eq!(a.acceleration, Vec2::ZERO);
    }

    #[test]
    fn integrate_caps_speed() {
        let mut a = agent(Vec2::new(2.9, 0.0));
        a.apply_force(Vec2::new(1.0, 0.0));
        integrate(&mut a);

        assert!((a.velocity.length() - 3.0).abs() < 1e-6);
        assert!((a.position.x - 13.0).abs() < 1e-5);
    }

    #[test]
    fn inertia_without_force() {
        let mut a = agent(Vec2::new(0.5, -0.25));
        for _ in 0..4 {
            integrate(&mut a);
        }
        assert_eq!(a.velocity, Vec2::new(0.5, -0.25));
        assert_eq!(a.position, Vec2::new(12.0, 9.0));
    }

    #[test]
    fn advance_wraps_after_moving() {
        let bounds = WorldBounds::new(12.0, 100.0);
        let mut a = agent(Vec2::new(2.5, 0.0));
        advance(&mut a, Vec2::ZERO, &bounds);
        assert_eq!(a.position, Vec2::new(0.0, 10.0));
    }
}
