use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest bank a 16-bit address can reach.
pub const MAX_MEMORY_SIZE: usize = 0x10000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MachineConfig {
    pub memory_size: usize,
    pub initial_pc: u16,
    pub initial_sp: u16,
    /// Cycles a single `startup` may spend before it stops itself.
    pub cycle_budget: Option<u64>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            memory_size: 4096,
            initial_pc: 0,
            initial_sp: 0,
            cycle_budget: None,
        }
    }
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MachineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory_size > MAX_MEMORY_SIZE {
            return Err(ConfigError::Invalid(format!(
                "memory_size {} exceeds the 16-bit address space ({} bytes)",
                self.memory_size, MAX_MEMORY_SIZE
            )));
        }
        if self.cycle_budget == Some(0) {
            return Err(ConfigError::Invalid("cycle_budget must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn with_cycle_budget(mut self, cycles: u64) -> Self {
        self.cycle_budget = Some(cycles);
        self
    }
}
