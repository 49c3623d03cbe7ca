//! Steering behaviours.
//!
//! Each behaviour is a pure function of the subject agent and the neighbours
//! it can see, returning a force already clamped to the subject's
//! `max_force`. Weighting and precedence between behaviours live in
//! [`SteeringRules`].

use boids_config::{RadiusSettings, SimulationConfig, WeightSettings};
use boids_core::{seek, Agent, Vec2};
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::neighbors::{GroupFilter, NeighborQuery};

/// Short-range repulsion: the mean of unit vectors pointing away from each
/// neighbour.
///
/// Neighbours sharing the subject's exact position carry no direction and
/// are skipped.
pub fn separation(agent: &Agent, neighbors: &[&Agent]) -> Vec2 {
    let mut steer = Vec2::ZERO;
    let mut total = 0;

    for other in neighbors {
        let offset = agent.position - other.position;
        let distance = offset.length();
        if distance > 0.0 {
            steer += offset / distance;
            total += 1;
        }
    }

    if total == 0 {
        return Vec2::ZERO;
    }
    steer /= total as f32;

    seek(steer, agent.velocity, agent.max_speed(), agent.max_force())
}

/// Steer towards the average heading of the neighbours.
pub fn alignment(agent: &Agent, neighbors: &[&Agent]) -> Vec2 {
    if neighbors.is_empty() {
        return Vec2::ZERO;
    }

    let avg_velocity = neighbors.iter().fold(Vec2::ZERO, |acc, other| acc + other.velocity) / neighbors.len() as f32;
    seek(avg_velocity, agent.velocity, agent.max_speed(), agent.max_force())
}

/// Steer towards the centre of mass of the neighbours.
pub fn cohesion(agent: &Agent, neighbors: &[&Agent]) -> Vec2 {
    if neighbors.is_empty() {
        return Vec2::ZERO;
    }

    let center_of_mass = neighbors.iter().fold(Vec2::ZERO, |acc, other| acc + other.position) / neighbors.len() as f32;
    seek(center_of_mass - agent.position, agent.velocity, agent.max_speed(), agent.max_force())
}

/// Steer straight away from `predator` when it is closer than `threshold`.
pub fn flee(agent: &Agent, predator: &Agent, threshold: f32) -> Vec2 {
    if agent.distance_to(predator) >= threshold {
        return Vec2::ZERO;
    }
    seek(agent.position - predator.position, agent.velocity, agent.max_speed(), agent.max_force())
}

/// Nearest agent in `others` at any distance. The first one wins a tie.
pub fn nearest<'a, I>(agent: &Agent, others: I) -> Option<(usize, &'a Agent)>
where
    I: IntoIterator<Item = &'a Agent>,
{
    others
        .into_iter()
        .enumerate()
        .min_by_key(|(_, other)| OrderedFloat(agent.position.distance_squared(other.position)))
}

/// Nearest prey strictly inside `radius`. The first one wins a tie.
pub fn select_target<'a>(predator: &Agent, prey: &'a [Agent], radius: f32) -> Option<(usize, &'a Agent)> {
    let radius_sq = radius * radius;
    nearest(predator, prey).filter(|(_, target)| predator.position.distance_squared(target.position) < radius_sq)
}

/// Steer `predator` straight at `target`.
#[inline]
pub fn chase(predator: &Agent, target: &Agent) -> Vec2 {
    seek(
        target.position - predator.position,
        predator.velocity,
        predator.max_speed(),
        predator.max_force(),
    )
}

/// Chase the nearest prey within `radius`; zero when nothing is in sight.
pub fn pursuit(predator: &Agent, prey: &[Agent], radius: f32) -> Vec2 {
    select_target(predator, prey, radius)
        .map(|(_, target)| chase(predator, target))
        .unwrap_or(Vec2::ZERO)
}

/// What an agent decided to do this tick, carrying the weighted force.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "force", rename_all = "lowercase")]
pub enum Steering {
    /// Prey using separation, alignment and cohesion
    Flocking(Vec2),
    /// Prey overriding flocking to escape a predator
    Fleeing(Vec2),
    /// Predator chasing a target
    Pursuing(Vec2),
    /// Predator with no prey in sight
    Idle,
}

impl Steering {
    pub fn force(&self) -> Vec2 {
        match *self {
            Steering::Flocking(force) | Steering::Fleeing(force) | Steering::Pursuing(force) => force,
            Steering::Idle => Vec2::ZERO,
        }
    }
}

/// Radii, weights and mode switches that decide how behaviours combine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringRules {
    pub radii: RadiusSettings,
    pub weights: WeightSettings,
    pub team_mode: bool,
    pub predator_mode: bool,
}

impl SteeringRules {
    pub fn from_config(config: &SimulationConfig) -> Self {
        SteeringRules {
            radii: config.radii,
            weights: config.weights,
            team_mode: config.modes.team_mode,
            predator_mode: config.modes.predator_mode,
        }
    }

    /// Full prey decision for one tick.
    ///
    /// A non-zero weighted flee from the nearest predator replaces flocking
    /// entirely; the two are never blended.
    pub fn prey(&self, index: usize, flock: &NeighborQuery<'_>, predators: &[Agent]) -> Steering {
        let agent = &flock.agents()[index];

        if self.predator_mode {
            if let Some((_, predator)) = nearest(agent, predators) {
                let escape = flee(agent, predator, self.radii.flee_threshold) * self.weights.flee;
                if escape != Vec2::ZERO {
                    return Steering::Fleeing(escape);
                }
            }
        }

        Steering::Flocking(self.flocking(index, flock))
    }

    /// Weighted sum of separation, alignment and cohesion.
    pub fn flocking(&self, index: usize, flock: &NeighborQuery<'_>) -> Vec2 {
        let agent = &flock.agents()[index];

        let close = flock.within(agent, Some(index), self.radii.separation, GroupFilter::Any);
        let mates = flock.within(
            agent,
            Some(index),
            self.radii.neighbor,
            GroupFilter::flockmates(agent, self.team_mode),
        );

        separation(agent, &close) * self.weights.separation
            + alignment(agent, &mates) * self.weights.alignment
            + cohesion(agent, &mates) * self.weights.cohesion
    }

    pub fn predator(&self, predator: &Agent, prey: &[Agent]) -> Steering {
        match select_target(predator, prey, self.radii.predator) {
            Some((_, target)) => Steering::Pursuing(chase(predator, target)),
            None => Steering::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boids_core::{MotionLimits, Role};

    const PREY: MotionLimits = MotionLimits { max_speed: 3.0, max_force: 0.05 };
    const HUNTER: MotionLimits = MotionLimits { max_speed: 4.5, max_force: 0.1 };

    fn prey(x: f32, y: f32) -> Agent {
        Agent::new(Role::Prey, None, Vec2::new(x, y), Vec2::ZERO, PREY)
    }

    fn moving_prey(x: f32, y: f32, vx: f32, vy: f32, group: Option<u32>) -> Agent {
        Agent::new(Role::Prey, group, Vec2::new(x, y), Vec2::new(vx, vy), PREY)
    }

    fn predator(x: f32, y: f32) -> Agent {
        Agent::new(Role::Predator, None, Vec2::new(x, y), Vec2::ZERO, HUNTER)
    }

    fn rules() -> SteeringRules {
        SteeringRules::from_config(&SimulationConfig::default())
    }

    #[test]
    fn separation_pushes_pair_apart_along_x() {
        let a = prey(0.0, 0.0);
        let b = prey(10.0, 0.0);

        let on_a = separation(&a, &[&b]);
        let on_b = separation(&b, &[&a]);

        assert!(on_a.x < 0.0 && on_a.y.abs() < 1e-6);
        assert!(on_b.x > 0.0 && on_b.y.abs() < 1e-6);
        assert!(on_a.length() <= 0.05 + 1e-6);
        assert!(on_b.length() <= 0.05 + 1e-6);
    }

    #[test]
    fn separation_ignores_coincident_neighbours() {
        let a = prey(5.0, 5.0);
        let twin = prey(5.0, 5.0);
        assert_eq!(separation(&a, &[&twin]), Vec2::ZERO);
    }

    #[test]
    fn behaviours_are_zero_without_neighbours() {
        let a = moving_prey(1.0, 1.0, 1.0, 0.5, None);
        assert_eq!(separation(&a, &[]), Vec2::ZERO);
        assert_eq!(alignment(&a, &[]), Vec2::ZERO);
        assert_eq!(cohesion(&a, &[]), Vec2::ZERO);
    }

    #[test]
    fn alignment_turns_towards_neighbour_heading() {
        let a = moving_prey(0.0, 0.0, 3.0, 0.0, None);
        let b = moving_prey(10.0, 0.0, 0.0, 3.0, None);
        let steer = alignment(&a, &[&b]);
        assert!(steer.y > 0.0 && steer.x < 0.0);
        assert!(steer.length() <= PREY.max_force + 1e-6);
    }

    #[test]
    fn alignment_with_stationary_neighbours_is_zero() {
        let a = moving_prey(0.0, 0.0, 1.0, 0.0, None);
        let b = prey(5.0, 0.0);
        assert_eq!(alignment(&a, &[&b]), Vec2::ZERO);
    }

    #[test]
    fn cohesion_pulls_towards_centroid() {
        let a = prey(0.0, 0.0);
        let b = prey(20.0, 0.0);
        let c = prey(20.0, 20.0);
        let steer = cohesion(&a, &[&b, &c]);
        assert!(steer.x > 0.0 && steer.y > 0.0);
        assert!((steer.length() - PREY.max_force).abs() < 1e-6);
    }

    #[test]
    fn flee_engages_only_inside_threshold() {
        let a = prey(0.0, 0.0);
        assert_eq!(flee(&a, &predator(120.0, 0.0), 120.0), Vec2::ZERO);
        assert_eq!(flee(&a, &predator(300.0, 0.0), 120.0), Vec2::ZERO);

        let escape = flee(&a, &predator(119.0, 0.0), 120.0);
        assert!(escape.x < 0.0);
        assert!(escape.length() <= PREY.max_force + 1e-6);
    }

    #[test]
    fn pursuit_points_at_target() {
        let hunter = predator(100.0, 100.0);
        let herd = vec![prey(150.0, 100.0)];
        let steer = pursuit(&hunter, &herd, 250.0);
        assert!(steer.x > 0.0 && steer.y.abs() < 1e-6);
        assert!(steer.length() <= HUNTER.max_force + 1e-6);
    }

    #[test]
    fn pursuit_ignores_prey_outside_radius() {
        let hunter = predator(0.0, 0.0);
        let herd = vec![prey(250.0, 0.0), prey(400.0, 0.0)];
        assert_eq!(pursuit(&hunter, &herd, 250.0), Vec2::ZERO);
        assert!(select_target(&hunter, &herd, 250.0).is_none());
    }

    #[test]
    fn nearest_breaks_ties_by_scan_order() {
        let hunter = predator(0.0, 0.0);
        let herd = vec![prey(50.0, 0.0), prey(10.0, 0.0), prey(-10.0, 0.0), prey(0.0, 10.0)];
        let (index, _) = select_target(&hunter, &herd, 250.0).unwrap();
        assert_eq!(index, 1);
    }

    #[test]
    fn flee_overrides_flocking() {
        let flock = vec![moving_prey(100.0, 100.0, 1.0, 0.0, None), moving_prey(110.0, 100.0, 0.0, 1.0, None)];
        let hunters = vec![predator(100.0, 150.0)];
        let mut rules = rules();
        rules.predator_mode = true;

        let query = NeighborQuery::new(&flock);
        let steering = rules.prey(0, &query, &hunters);
        let expected = flee(&flock[0], &hunters[0], 120.0) * 2.5;
        assert_eq!(steering, Steering::Fleeing(expected));
    }

    #[test]
    fn distant_predator_leaves_flocking_alone() {
        let flock = vec![moving_prey(100.0, 100.0, 1.0, 0.0, None), moving_prey(110.0, 100.0, 0.0, 1.0, None)];
        let hunters = vec![predator(600.0, 600.0)];
        let mut rules = rules();
        rules.predator_mode = true;

        let query = NeighborQuery::new(&flock);
        let steering = rules.prey(0, &query, &hunters);
        assert_eq!(steering, Steering::Flocking(rules.flocking(0, &query)));
        assert_ne!(steering.force(), Vec2::ZERO);
    }

    #[test]
    fn predators_are_ignored_outside_predator_mode() {
        let flock = vec![moving_prey(100.0, 100.0, 1.0, 0.0, None)];
        let hunters = vec![predator(101.0, 100.0)];
        let query = NeighborQuery::new(&flock);
        assert_eq!(rules().prey(0, &query, &hunters), Steering::Flocking(Vec2::ZERO));
    }

    #[test]
    fn team_mode_hides_other_teams_from_alignment_and_cohesion() {
        let flock = vec![
            moving_prey(100.0, 100.0, 1.0, 0.0, Some(1)),
            moving_prey(150.0, 100.0, 0.0, 2.0, Some(2)),
        ];
        let query = NeighborQuery::new(&flock);

        let mut teams = rules();
        teams.team_mode = true;
        // Out of separation range and on another team: nothing to react to
        assert_eq!(teams.flocking(0, &query), Vec2::ZERO);

        // Same layout with teams off behaves as if everyone shared one group
        assert_ne!(rules().flocking(0, &query), Vec2::ZERO);
    }

    #[test]
    fn separation_sees_other_teams() {
        let flock = vec![
            moving_prey(100.0, 100.0, 1.0, 0.0, Some(1)),
            moving_prey(110.0, 100.0, 1.0, 0.0, Some(2)),
        ];
        let query = NeighborQuery::new(&flock);
        let mut teams = rules();
        teams.team_mode = true;

        let expected = separation(&flock[0], &[&flock[1]]) * 1.5;
        assert_eq!(teams.flocking(0, &query), expected);
        assert_ne!(expected, Vec2::ZERO);
    }

    #[test]
    fn predator_rule_chases_selected_target() {
        let hunter = predator(0.0, 0.0);
        let herd = vec![prey(0.0, 200.0), prey(-40.0, 30.0), prey(300.0, 0.0)];

        let (index, target) = select_target(&hunter, &herd, 250.0).unwrap();
        assert_eq!(index, 1);
        assert_eq!(rules().predator(&hunter, &herd), Steering::Pursuing(chase(&hunter, target)));
        assert_eq!(rules().predator(&hunter, &herd).force(), pursuit(&hunter, &herd, 250.0));
    }

    #[test]
    fn idle_predator_without_prey_in_sight() {
        let hunter = predator(0.0, 0.0);
        assert_eq!(rules().predator(&hunter, &[]), Steering::Idle);
        assert_eq!(rules().predator(&hunter, &[prey(900.0, 0.0)]), Steering::Idle);
    }
}
