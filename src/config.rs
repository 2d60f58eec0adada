//! Game configuration
//!
//! Every gameplay constant lives in `GameConfig`, stored as RON in
//! `data/config.ron`. Missing fields take their default values, so a config
//! file only needs the numbers it changes. Without a file the game runs on
//! the defaults.

use std::fmt;
use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::game::{AnimationLibrary, EnemyTuning, HazardTuning, PhysicsTuning, PlayerTuning};

/// Default config file location
pub const CONFIG_PATH: &str = "data/config.ron";

/// All tunable gameplay values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsTuning,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub hazards: HazardTuning,
    /// Animation clips keyed by `"<kind>/<action>"`
    pub animations: AnimationLibrary,
    /// Collision box of every character (pixels)
    pub body_size: (i32, i32),
    /// Seed for enemy decisions
    pub rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsTuning::default(),
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            hazards: HazardTuning::default(),
            animations: AnimationLibrary::default(),
            body_size: (16, 16),
            rng_seed: 0x6772_696d,
        }
    }
}

/// Error type for config operations
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(e: ron::Error) -> Self {
        ConfigError::SerializeError(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a config from RON text
pub fn load_config_from_str(s: &str) -> Result<GameConfig, ConfigError> {
    Ok(ron::from_str(s)?)
}

/// Load a config file. A missing file yields the defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GameConfig, ConfigError> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(contents) => load_config_from_str(&contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No config at {}, using defaults", path.display());
            Ok(GameConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Load a config file, logging and falling back to defaults on any error
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> GameConfig {
    load_config(path.as_ref()).unwrap_or_else(|e| {
        log::error!("Failed to load config {}: {}", path.as_ref().display(), e);
        GameConfig::default()
    })
}

/// Write a config as pretty RON
pub fn save_config<P: AsRef<Path>>(config: &GameConfig, path: P) -> Result<(), ConfigError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());
    let contents = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path, contents)?;
    Ok(())
}
