use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, RoutingError};
use crate::protocol::{DEFAULT_DEAD_THRESHOLD, DEFAULT_TIME_TO_LIVE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub topology_path: PathBuf,
    pub time_to_live: u32,
    pub dead_threshold: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            topology_path: PathBuf::from("infile.dat"),
            time_to_live: DEFAULT_TIME_TO_LIVE, // hops
            dead_threshold: DEFAULT_DEAD_THRESHOLD, // origination cycles
        }
    }
}

impl SimulatorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: SimulatorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Applies command-line overrides on top of the loaded values.
    pub fn apply_overrides(&mut self, topology_path: Option<PathBuf>, time_to_live: Option<u32>) {
        if let Some(path) = topology_path {
            self.topology_path = path;
        }
        if let Some(ttl) = time_to_live {
            self.time_to_live = ttl;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.time_to_live == 0 {
            return Err(RoutingError::Config("time_to_live must be at least 1".to_string()));
        }
        if self.dead_threshold == 0 {
            return Err(RoutingError::Config("dead_threshold must be at least 1".to_string()));
        }
        Ok(())
    }
}
