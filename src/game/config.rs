use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::grid::Grid;

/// Largest grid side; keeps the drawn board within terminal coordinates
pub const MAX_GRID_SIDE: usize = 1000;

/// Errors raised while loading or validating a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Edge length of a cell in pixels
    pub cell_size: u32,

    // Speed, in simulation ticks per second
    /// Speed of a length-1 snake
    pub base_speed: f32,
    /// Speed gained per extra segment
    pub acceleration: f32,
    /// Upper bound on speed
    pub speed_cap: f32,

    /// Points awarded for eating food
    pub food_reward: u32,
    /// Length of the grow effect, in ticks
    pub grow_effect_duration: u32,
    /// Peak segment scale while the grow effect runs
    pub max_grow_scale: f32,
    /// Most ticks a single update may catch up on after a slow frame
    pub max_catch_up_steps: u32,

    /// Particles spawned on a crash
    pub crash_particles: usize,
    /// Particles spawned when food is eaten
    pub food_particles: usize,

    /// Seed for food placement; random when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 30,
            cell_size: 20,
            base_speed: 15.0,
            acceleration: 0.2,
            speed_cap: 30.0,
            food_reward: 10,
            grow_effect_duration: 20,
            max_grow_scale: 1.5,
            max_catch_up_steps: 5,
            crash_particles: 30,
            food_particles: 20,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0
            || self.grid_height == 0
            || self.grid_width > MAX_GRID_SIDE
            || self.grid_height > MAX_GRID_SIDE
            || self.grid().area() < 2
        {
            return Err(ConfigError::Invalid(format!(
                "grid must hold at least 2 cells with sides up to {MAX_GRID_SIDE}, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.cell_size == 0 {
            return Err(ConfigError::Invalid("cell_size must be positive".into()));
        }
        if self.base_speed.is_nan() || self.base_speed <= 0.0 || self.speed_cap < self.base_speed {
            return Err(ConfigError::Invalid(format!(
                "speeds must satisfy 0 < base_speed <= speed_cap, got {} and {}",
                self.base_speed, self.speed_cap
            )));
        }
        if self.acceleration < 0.0 {
            return Err(ConfigError::Invalid("acceleration must not be negative".into()));
        }
        if self.max_catch_up_steps == 0 {
            return Err(ConfigError::Invalid("max_catch_up_steps must be at least 1".into()));
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_width, self.grid_height, self.cell_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 40);
        assert_eq!(config.grid_height, 30);
        assert_eq!(config.cell_size, 20);
        assert_eq!(config.food_reward, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 12);
        assert_eq!(config.grid().area(), 180);
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        assert!(GameConfig::new(0, 10).validate().is_err());
        assert!(GameConfig::new(1, 1).validate().is_err());
        assert!(GameConfig::new(2, 1).validate().is_ok());
        assert!(GameConfig::new(33000, 1).validate().is_err());
        assert!(GameConfig::new(10, MAX_GRID_SIDE + 1).validate().is_err());
        assert!(GameConfig::new(MAX_GRID_SIDE, MAX_GRID_SIDE).validate().is_ok());

        let config = GameConfig {
            cell_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            base_speed: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            speed_cap: 10.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_width": 20, "seed": 7 }}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.grid_height, 30);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_load_errors() {
        let missing = GameConfig::load(Path::new("/nonexistent/ultra_snake.json"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            GameConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
