//! Ready-made configurations for the three classic flocking setups.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::types::{
    Config, ModeSettings, PopulationSettings, RadiusSettings, SimulationConfig, UpdateOrdering,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// One undivided flock of 60 boids
    Classic,
    /// Two teams of 30 that only align and cohere with their own team
    Teams,
    /// Two teams hunted by three predators, updated sequentially
    Predators,
}

impl Preset {
    pub fn config(self) -> Config {
        Config {
            simulation: self.simulation(),
            ..Config::default()
        }
    }

    pub fn simulation(self) -> SimulationConfig {
        let base = SimulationConfig::default();
        match self {
            Preset::Classic => base,
            Preset::Teams => SimulationConfig {
                population: PopulationSettings { teams: vec![30, 30], predators: 0 },
                radii: RadiusSettings {
                    neighbor: 120.0,
                    separation: 40.0,
                    ..RadiusSettings::default()
                },
                modes: ModeSettings {
                    team_mode: true,
                    ..ModeSettings::default()
                },
                ..base
            },
            Preset::Predators => SimulationConfig {
                population: PopulationSettings { teams: vec![30, 30], predators: 3 },
                modes: ModeSettings {
                    team_mode: true,
                    predator_mode: true,
                    ordering: UpdateOrdering::Sequential,
                },
                ..base
            },
        }
    }
}
