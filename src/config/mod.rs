//! Configuration module - environment variable parsing

use std::env;
use std::path::PathBuf;

/// Simulation configuration loaded from environment variables; every
/// knob has a default so the server runs out of the box.
#[derive(Clone, Debug)]
pub struct Config {
    /// Path to the Tiled-style JSON map
    pub map_path: PathBuf,
    /// Map dimensions in cells
    pub map_width: usize,
    pub map_height: usize,
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Seconds of intent silence before a player is evicted
    pub idle_timeout_secs: u64,
    /// Fixed RNG seed for reproducible runs; random when unset
    pub sim_seed: Option<u64>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            map_path: env::var("MAP_PATH")
                .unwrap_or_else(|_| "./map.json".to_string())
                .into(),
            map_width: parse_var("MAP_WIDTH", 30)?,
            map_height: parse_var("MAP_HEIGHT", 30)?,
            tick_rate: parse_var("TICK_RATE", 20)?,
            idle_timeout_secs: parse_var("IDLE_TIMEOUT_SECS", 120)?,
            sim_seed: parse_optional("SIM_SEED")?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

fn parse_optional<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
