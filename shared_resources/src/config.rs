use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;

use crate::error::ConfigError;
use crate::Floor;

const CONFIG_FILE: &str = "config.json";
const FALLBACK_CONFIG_FILE: &str = "_config.json";

pub const DEFAULT_NUM_ELEVATORS: usize = 3;
pub const DEFAULT_TOTAL_FLOORS: Floor = 10;
pub const DEFAULT_CAPACITY: u32 = 10;
pub const DEFAULT_TIME_UNIT_MS: u64 = 1000;
pub const DEFAULT_DOOR_DWELL_TICKS: u32 = 1;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FleetConfig {
    pub num_elevators: usize,
    pub total_floors: Floor,
    pub capacity: u32,
    /// Per-car capacity overrides, indexed by car id. Cars past the end of
    /// the list use `capacity`.
    pub capacities: Vec<u32>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        FleetConfig {
            num_elevators: DEFAULT_NUM_ELEVATORS,
            total_floors: DEFAULT_TOTAL_FLOORS,
            capacity: DEFAULT_CAPACITY,
            capacities: Vec::new(),
        }
    }
}

impl FleetConfig {
    pub fn capacity_of(&self, id: usize) -> u32 {
        self.capacities.get(id).copied().unwrap_or(self.capacity)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SimulationConfig {
    pub time_unit_ms: u64,
    pub door_dwell_ticks: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            time_unit_ms: DEFAULT_TIME_UNIT_MS,
            door_dwell_ticks: DEFAULT_DOOR_DWELL_TICKS,
        }
    }
}

impl SimulationConfig {
    pub fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub fleet: FleetConfig,
    pub simulation: SimulationConfig,
}

impl Config {
    /// Reads `path` if given, otherwise `config.json`, then `_config.json`,
    /// and finally falls back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let candidates = [PathBuf::from(CONFIG_FILE), PathBuf::from(FALLBACK_CONFIG_FILE)];
                match candidates.iter().find(|candidate| candidate.is_file()) {
                    Some(found) => Self::from_file(found)?,
                    None => {
                        info!("No configuration file provided, using default settings...");
                        Config::default()
                    }
                }
            }
        };
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&contents)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(contents)?;
        Ok(config)
    }

    /// Rejects settings the simulation cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fleet = &self.fleet;
        if fleet.num_elevators == 0 {
            return Err(ConfigError::Invalid(String::from("at least one elevator is required")));
        }
        if fleet.total_floors <= 0 {
            return Err(ConfigError::Invalid(format!(
                "total_floors must be positive, got {}",
                fleet.total_floors
            )));
        }
        if fleet.capacities.len() > fleet.num_elevators {
            return Err(ConfigError::Invalid(format!(
                "{} capacities given for {} elevators",
                fleet.capacities.len(),
                fleet.num_elevators
            )));
        }
        if let Some(id) = (0..fleet.num_elevators).find(|&id| fleet.capacity_of(id) == 0) {
            return Err(ConfigError::Invalid(format!("elevator {} has zero capacity", id)));
        }
        if self.simulation.time_unit_ms == 0 {
            return Err(ConfigError::Invalid(String::from("time_unit_ms must be positive")));
        }
        Ok(())
    }
}
