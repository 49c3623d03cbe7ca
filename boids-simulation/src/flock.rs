//! The flock engine: owns every agent and advances them one tick at a time.

use boids_config::{ConfigLoader, NeighborIndexConfig, SimulationConfig, UpdateOrdering};
use boids_core::{clamp_magnitude, Agent, MotionLimits, Role, Vec2, WorldBounds};
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use crate::integrator::advance;
use crate::neighbors::NeighborQuery;
use crate::spatial::SpatialGrid;
use crate::steering::{Steering, SteeringRules};
use crate::SimulationError;

/// Read-only snapshot of one agent for renderers and other observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgentView {
    pub role: Role,
    pub group: Option<u32>,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Radians from the +x axis, derived from velocity
    pub heading: f32,
}

impl From<&Agent> for AgentView {
    fn from(agent: &Agent) -> Self {
        AgentView {
            role: agent.role(),
            group: agent.group(),
            position: agent.position,
            velocity: agent.velocity,
            heading: agent.heading(),
        }
    }
}

/// Aggregate outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TickSummary {
    /// Number of ticks completed, including this one
    pub tick: u64,
    pub fleeing: usize,
    pub pursuing: usize,
    pub mean_prey_speed: f32,
}

/// A fixed population of prey and predators in a toroidal world.
///
/// Prey and predators live in separate lists; list order is the scan order
/// used for tie-breaks and for the sequential update discipline.
pub struct Flock {
    bounds: WorldBounds,
    rules: SteeringRules,
    ordering: UpdateOrdering,
    parallel_compute: bool,
    prey_limits: MotionLimits,
    predator_limits: MotionLimits,
    prey: Vec<Agent>,
    predators: Vec<Agent>,
    grid: Option<SpatialGrid>,
    tick: u64,
}

impl Flock {
    /// Builds a flock and spawns the configured population at random.
    ///
    /// Uses `config.seed` when given, otherwise a fresh seed that is logged so
    /// the run can be reproduced.
    pub fn new(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!("Seeding flock with {}", seed);
        let mut rng = StdRng::seed_from_u64(seed);
        Self::with_rng(config, &mut rng)
    }

    /// Like [`Flock::new`] but draws from the caller's RNG.
    pub fn with_rng<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Result<Self, SimulationError> {
        ConfigLoader::validate_simulation(config)?;
        let mut flock = Self::empty(config)?;

        for (team, &count) in config.population.teams.iter().enumerate() {
            let group = config.modes.team_mode.then_some(team as u32 + 1);
            for _ in 0..count {
                let position = flock.bounds.sample_position(rng);
                flock.prey.push(Agent::with_random_heading(
                    Role::Prey,
                    group,
                    position,
                    config.prey.min_initial_speed,
                    flock.prey_limits,
                    rng,
                ));
            }
        }

        if config.modes.predator_mode {
            for _ in 0..config.population.predators {
                let position = flock.bounds.sample_position(rng);
                flock.predators.push(Agent::with_random_heading(
                    Role::Predator,
                    None,
                    position,
                    config.predator.min_initial_speed,
                    flock.predator_limits,
                    rng,
                ));
            }
        }

        flock.rebuild_grid();
        info!(
            "Spawned {} prey in {} team(s) and {} predator(s)",
            flock.prey.len(),
            config.population.teams.len(),
            flock.predators.len()
        );

        Ok(flock)
    }

    /// Builds a flock with no agents, for scripted scenarios.
    pub fn empty(config: &SimulationConfig) -> Result<Self, SimulationError> {
        ConfigLoader::validate_parameters(config)?;

        if config.parallel_compute && config.modes.ordering == UpdateOrdering::Sequential {
            warn!("parallel_compute has no effect with sequential ordering");
        }

        let bounds = WorldBounds::new(config.world.width, config.world.height);
        let grid = match config.neighbor_index {
            NeighborIndexConfig::BruteForce => None,
            NeighborIndexConfig::Grid { cell_size } => Some(SpatialGrid::new(cell_size, bounds)),
        };

        Ok(Flock {
            bounds,
            rules: SteeringRules::from_config(config),
            ordering: config.modes.ordering,
            parallel_compute: config.parallel_compute,
            prey_limits: MotionLimits::new(config.prey.max_speed, config.prey.max_force),
            predator_limits: MotionLimits::new(config.predator.max_speed, config.predator.max_force),
            prey: Vec::new(),
            predators: Vec::new(),
            grid,
            tick: 0,
        })
    }

    /// Adds a prey at an explicit position. The position is wrapped into the
    /// world and the velocity capped at the prey speed limit.
    pub fn spawn_prey(&mut self, position: Vec2, velocity: Vec2, group: Option<u32>) -> usize {
        let agent = Agent::new(
            Role::Prey,
            group,
            self.bounds.wrap(position),
            clamp_magnitude(velocity, self.prey_limits.max_speed),
            self.prey_limits,
        );
        self.prey.push(agent);
        self.rebuild_grid();
        self.prey.len() - 1
    }

    /// Adds a predator at an explicit position. Requires predator mode.
    pub fn spawn_predator(&mut self, position: Vec2, velocity: Vec2) -> Result<usize, SimulationError> {
        if !self.rules.predator_mode {
            return Err(SimulationError::PredatorModeDisabled);
        }
        let agent = Agent::new(
            Role::Predator,
            None,
            self.bounds.wrap(position),
            clamp_magnitude(velocity, self.predator_limits.max_speed),
            self.predator_limits,
        );
        self.predators.push(agent);
        Ok(self.predators.len() - 1)
    }

    /// Advances every agent by one fixed step.
    pub fn tick(&mut self) -> TickSummary {
        let (fleeing, pursuing) = match self.ordering {
            UpdateOrdering::Synchronous => self.tick_synchronous(),
            UpdateOrdering::Sequential => self.tick_sequential(),
        };
        self.tick += 1;

        let summary = TickSummary {
            tick: self.tick,
            fleeing,
            pursuing,
            mean_prey_speed: self.mean_prey_speed(),
        };
        trace!("{:?}", summary);
        summary
    }

    /// Every decision reads the same pre-tick snapshot; all agents move afterwards.
    fn tick_synchronous(&mut self) -> (usize, usize) {
        self.rebuild_grid();

        let prey_steering = {
            let query = self.prey_query();
            let rules = &self.rules;
            let predators = self.predators.as_slice();
            if self.parallel_compute {
                (0..self.prey.len())
                    .into_par_iter()
                    .map(|i| rules.prey(i, &query, predators))
                    .collect::<Vec<_>>()
            } else {
                (0..self.prey.len())
                    .map(|i| rules.prey(i, &query, predators))
                    .collect::<Vec<_>>()
            }
        };
        let predator_steering: Vec<Steering> = self
            .predators
            .iter()
            .map(|predator| self.rules.predator(predator, &self.prey))
            .collect();

        let bounds = self.bounds;
        for (agent, steering) in self.prey.iter_mut().zip(&prey_steering) {
            advance(agent, steering.force(), &bounds);
        }
        for (agent, steering) in self.predators.iter_mut().zip(&predator_steering) {
            advance(agent, steering.force(), &bounds);
        }

        (count_fleeing(&prey_steering), count_pursuing(&predator_steering))
    }

    /// Predators move first against the untouched prey, then each prey
    /// decides and moves in list order, seeing earlier prey already moved.
    fn tick_sequential(&mut self) -> (usize, usize) {
        self.rebuild_grid();
        let bounds = self.bounds;

        let mut pursuing = 0;
        for i in 0..self.predators.len() {
            let steering = self.rules.predator(&self.predators[i], &self.prey);
            if matches!(steering, Steering::Pursuing(_)) {
                pursuing += 1;
            }
            advance(&mut self.predators[i], steering.force(), &bounds);
        }

        let mut fleeing = 0;
        for i in 0..self.prey.len() {
            let steering = self.rules.prey(i, &self.prey_query(), &self.predators);
            if matches!(steering, Steering::Fleeing(_)) {
                fleeing += 1;
            }

            let from = self.prey[i].position;
            advance(&mut self.prey[i], steering.force(), &bounds);
            if let Some(grid) = self.grid.as_mut() {
                grid.relocate(i, from, self.prey[i].position);
            }
        }

        (fleeing, pursuing)
    }

    fn prey_query(&self) -> NeighborQuery<'_> {
        match &self.grid {
            Some(grid) => NeighborQuery::with_grid(&self.prey, grid),
            None => NeighborQuery::new(&self.prey),
        }
    }

    fn rebuild_grid(&mut self) {
        if let Some(grid) = self.grid.as_mut() {
            grid.rebuild(&self.prey);
        }
    }

    /// What prey `index` would do if a tick started now.
    pub fn prey_steering(&self, index: usize) -> Option<Steering> {
        (index < self.prey.len()).then(|| self.rules.prey(index, &NeighborQuery::new(&self.prey), &self.predators))
    }

    /// What predator `index` would do if a tick started now.
    pub fn predator_steering(&self, index: usize) -> Option<Steering> {
        self.predators
            .get(index)
            .map(|predator| self.rules.predator(predator, &self.prey))
    }

    fn mean_prey_speed(&self) -> f32 {
        if self.prey.is_empty() {
            return 0.0;
        }
        self.prey.iter().map(Agent::speed).sum::<f32>() / self.prey.len() as f32
    }

    /// Logs a one-line population summary plus a sample of positions.
    pub fn log_state(&self) {
        debug!(
            "tick {}: {} prey (mean speed {:.2}), {} predator(s)",
            self.tick,
            self.prey.len(),
            self.mean_prey_speed(),
            self.predators.len()
        );
        for (i, agent) in self.prey.iter().take(5).enumerate() {
            trace!("prey {} at ({:.1}, {:.1})", i, agent.position.x, agent.position.y);
        }
    }

    // --- Accessors ---

    pub fn prey(&self) -> &[Agent] {
        &self.prey
    }

    pub fn predators(&self) -> &[Agent] {
        &self.predators
    }

    /// Every agent, prey first then predators.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.prey.iter().chain(self.predators.iter())
    }

    pub fn views(&self) -> impl Iterator<Item = AgentView> + '_ {
        self.agents().map(AgentView::from)
    }

    pub fn len(&self) -> usize {
        self.prey.len() + self.predators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }
}

fn count_fleeing(steering: &[Steering]) -> usize {
    steering.iter().filter(|s| matches!(s, Steering::Fleeing(_))).count()
}

fn count_pursuing(steering: &[Steering]) -> usize {
    steering.iter().filter(|s| matches!(s, Steering::Pursuing(_))).count()
}
