use std::fs;
use std::path::Path;
use thiserror::Error;

// Re-export types
pub use self::presets::Preset;
pub use self::types::{
    Config, ModeSettings, NeighborIndexConfig, PopulationSettings, RadiusSettings, RoleSettings,
    RunnerConfig, SimulationConfig, UpdateOrdering, WeightSettings, WorldSettings,
};
mod presets;
mod types;

// Config error handling
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

// Config loader implementation
pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads a config file, choosing TOML for `.toml` paths and JSON otherwise.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let file_content = fs::read_to_string(path)?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::from_toml_str(&file_content)
        } else {
            Self::from_json_str(&file_content)
        }
    }

    pub fn from_json_str(content: &str) -> Result<Config, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads and validates in one step.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let config = Self::from_file(path)?;
        Self::validate(&config)?;
        Ok(config)
    }

    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_simulation(&config.simulation)?;

        if config.runner.framerate == 0 {
            return Err(invalid("Frame rate must be greater than 0"));
        }

        Ok(())
    }

    /// Checks the simulation section, including that there is someone to simulate.
    pub fn validate_simulation(sim: &SimulationConfig) -> Result<(), ConfigError> {
        Self::validate_parameters(sim)?;

        if sim.total_population() == 0 {
            return Err(invalid("Population must be greater than 0"));
        }

        Ok(())
    }

    /// Checks every numeric parameter but allows an empty population.
    pub fn validate_parameters(sim: &SimulationConfig) -> Result<(), ConfigError> {
        let world = &sim.world;
        if !(world.width.is_finite() && world.height.is_finite()) || world.width <= 0.0 || world.height <= 0.0 {
            return Err(invalid("World dimensions must be positive"));
        }

        for (name, role) in [("prey", &sim.prey), ("predator", &sim.predator)] {
            if !role.max_speed.is_finite() || role.max_speed <= 0.0 {
                return Err(invalid(format!("{name} max_speed must be positive")));
            }
            if !role.max_force.is_finite() || role.max_force < 0.0 {
                return Err(invalid(format!("{name} max_force must be non-negative")));
            }
            if role.min_initial_speed < 0.0 || role.min_initial_speed > role.max_speed {
                return Err(invalid(format!(
                    "{name} min_initial_speed must be within [0, max_speed]"
                )));
            }
        }

        let radii = &sim.radii;
        for (name, radius) in [
            ("neighbor", radii.neighbor),
            ("separation", radii.separation),
            ("predator", radii.predator),
            ("flee_threshold", radii.flee_threshold),
        ] {
            if !radius.is_finite() || radius < 0.0 {
                return Err(invalid(format!("{name} radius must be non-negative")));
            }
        }

        let weights = &sim.weights;
        if ![weights.separation, weights.alignment, weights.cohesion, weights.flee]
            .iter()
            .all(|w| w.is_finite())
        {
            return Err(invalid("Behaviour weights must be finite"));
        }

        if let NeighborIndexConfig::Grid { cell_size } = sim.neighbor_index {
            if !cell_size.is_finite() || cell_size <= 0.0 {
                return Err(invalid("Grid cell_size must be positive"));
            }
        }

        if sim.population.predators > 0 && !sim.modes.predator_mode {
            return Err(invalid("Predators are configured but predator_mode is off"));
        }

        Ok(())
    }
}
