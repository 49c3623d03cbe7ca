use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// Everything the flock engine needs at construction time.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SimulationConfig {
    #[serde(default)]
    pub world: WorldSettings,
    #[serde(default)]
    pub population: PopulationSettings,
    #[serde(default = "RoleSettings::default_prey")]
    pub prey: RoleSettings,
    #[serde(default = "RoleSettings::default_predator")]
    pub predator: RoleSettings,
    #[serde(default)]
    pub radii: RadiusSettings,
    #[serde(default)]
    pub weights: WeightSettings,
    #[serde(default)]
    pub modes: ModeSettings,
    #[serde(default)]
    pub neighbor_index: NeighborIndexConfig,
    /// Seed for initial placement. `None` draws one from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Run the synchronous compute phase on the rayon pool.
    #[serde(default)]
    pub parallel_compute: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldSettings::default(),
            population: PopulationSettings::default(),
            prey: RoleSettings::default_prey(),
            predator: RoleSettings::default_predator(),
            radii: RadiusSettings::default(),
            weights: WeightSettings::default(),
            modes: ModeSettings::default(),
            neighbor_index: NeighborIndexConfig::default(),
            seed: None,
            parallel_compute: false,
        }
    }
}

impl SimulationConfig {
    pub fn prey_count(&self) -> usize {
        self.population.teams.iter().map(|&count| count as usize).sum()
    }

    pub fn total_population(&self) -> usize {
        self.prey_count() + self.population.predators as usize
    }
}

// --- Sections ---

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct WorldSettings {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 { 1000.0 }
fn default_height() -> f32 { 720.0 }

impl Default for WorldSettings {
    fn default() -> Self {
        Self { width: default_width(), height: default_height() }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PopulationSettings {
    /// Prey count per team. A single entry is one undivided flock.
    #[serde(default = "default_teams")]
    pub teams: Vec<u32>,
    #[serde(default)]
    pub predators: u32,
}

fn default_teams() -> Vec<u32> { vec![60] }

impl Default for PopulationSettings {
    fn default() -> Self {
        Self { teams: default_teams(), predators: 0 }
    }
}

/// Speed and force caps for one role, plus the lower bound of the initial
/// speed draw.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct RoleSettings {
    pub max_speed: f32,
    pub max_force: f32,
    #[serde(default = "default_min_initial_speed")]
    pub min_initial_speed: f32,
}

fn default_min_initial_speed() -> f32 { 1.0 }

impl RoleSettings {
    pub fn default_prey() -> Self {
        Self { max_speed: 3.0, max_force: 0.05, min_initial_speed: 1.0 }
    }

    pub fn default_predator() -> Self {
        Self { max_speed: 4.5, max_force: 0.1, min_initial_speed: 2.0 }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct RadiusSettings {
    /// Alignment and cohesion perception radius
    #[serde(default = "default_neighbor_radius")]
    pub neighbor: f32,
    #[serde(default = "default_separation_radius")]
    pub separation: f32,
    /// How far a predator can see prey
    #[serde(default = "default_predator_radius")]
    pub predator: f32,
    /// Prey only flee from predators closer than this
    #[serde(default = "default_flee_threshold")]
    pub flee_threshold: f32,
}

fn default_neighbor_radius() -> f32 { 70.0 }
fn default_separation_radius() -> f32 { 30.0 }
fn default_predator_radius() -> f32 { 250.0 }
fn default_flee_threshold() -> f32 { 120.0 }

impl Default for RadiusSettings {
    fn default() -> Self {
        Self {
            neighbor: default_neighbor_radius(),
            separation: default_separation_radius(),
            predator: default_predator_radius(),
            flee_threshold: default_flee_threshold(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct WeightSettings {
    #[serde(default = "default_separation_weight")]
    pub separation: f32,
    #[serde(default = "default_alignment_weight")]
    pub alignment: f32,
    #[serde(default = "default_cohesion_weight")]
    pub cohesion: f32,
    #[serde(default = "default_flee_weight")]
    pub flee: f32,
}

fn default_separation_weight() -> f32 { 1.5 }
fn default_alignment_weight() -> f32 { 1.0 }
fn default_cohesion_weight() -> f32 { 0.7 }
fn default_flee_weight() -> f32 { 2.5 }

impl Default for WeightSettings {
    fn default() -> Self {
        Self {
            separation: default_separation_weight(),
            alignment: default_alignment_weight(),
            cohesion: default_cohesion_weight(),
            flee: default_flee_weight(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct ModeSettings {
    /// Restrict alignment and cohesion to same-team neighbours
    #[serde(default)]
    pub team_mode: bool,
    /// Spawn predators and let prey flee from them
    #[serde(default)]
    pub predator_mode: bool,
    #[serde(default)]
    pub ordering: UpdateOrdering,
}

// --- Enums for Choices ---

/// How forces and integration are interleaved within a tick.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UpdateOrdering {
    /// Every agent reads the same pre-tick snapshot, then all agents move.
    #[default]
    Synchronous,
    /// Predators move first, then each prey computes and moves in list order.
    Sequential,
}

/// Neighbour lookup strategy. Both produce identical results.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NeighborIndexConfig {
    #[default]
    BruteForce,
    Grid {
        #[serde(default = "default_cell_size")]
        cell_size: f32,
    },
}

fn default_cell_size() -> f32 { 70.0 }

/// Settings only the headless runner cares about.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct RunnerConfig {
    #[serde(default = "default_framerate")]
    pub framerate: u32,
    /// Log a tick summary every N ticks (0 = never)
    #[serde(default = "default_log_every")]
    pub log_every: u64,
}

fn default_framerate() -> u32 { 60 }
fn default_log_every() -> u64 { 100 }

impl Default for RunnerConfig {
    fn default() -> Self {
        Self { framerate: default_framerate(), log_every: default_log_every() }
    }
}
