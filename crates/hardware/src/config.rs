//! Configuration system for the APEX simulator.
//!
//! This module defines the configuration structures used to parameterize the engine.
//! It provides:
//! 1. **Defaults:** Baseline machine constants (register counts, queue sizes, memory size).
//! 2. **Structures:** Hierarchical config for general, core and memory settings.
//! 3. **Validation:** Rejection of configurations the engine cannot be built with.
//!
//! Configuration is supplied as JSON (`--config` on the CLI) or via `Config::default()`.

use std::path::Path;

use serde::Deserialize;

use crate::common::error::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Address of the first instruction. The PC advances by 4 per instruction.
    pub const CODE_BASE: u32 = 4000;

    /// Number of general architectural registers (`R0`-`R15`).
    ///
    /// The link register `X` is renamed like the others and takes one more index.
    pub const ARCH_REGISTERS: usize = 16;

    /// Number of physical registers in the unified register file.
    pub const PHYSICAL_REGISTERS: usize = 32;

    /// Issue queue entries.
    pub const IQ_CAPACITY: usize = 12;

    /// Reorder buffer entries.
    pub const ROB_CAPACITY: usize = 40;

    /// Multiplier latency in cycles.
    pub const MUL_LATENCY: u32 = 3;

    /// Data memory size in bytes.
    pub const MEMORY_SIZE: usize = 4000;
}

/// Root configuration structure for the simulator.
///
/// Every section and field is optional in JSON and falls back to its default.
///
/// # Examples
///
/// ```
/// use apexsim_core::config::Config;
///
/// let json = r#"{
///     "core": { "physical_registers": 24, "rob_capacity": 16 },
///     "memory": { "size_bytes": 256 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.core.physical_registers, 24);
/// assert_eq!(config.core.iq_capacity, 12);
/// assert_eq!(config.memory.size_bytes, 256);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Register file, queue and functional-unit parameters
    #[serde(default)]
    pub core: CoreConfig,
    /// Data memory configuration
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses a configuration from JSON text and validates it.
    ///
    /// # Arguments
    ///
    /// * `json` - JSON document; missing fields take their defaults.
    ///
    /// # Returns
    ///
    /// The validated configuration, or the parse/validation error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Checks that the engine can be built from this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let core = &self.core;
        if core.arch_registers == 0 {
            return Err(invalid("core.arch_registers", "must be at least 1"));
        }
        // Every architectural index plus X is mapped at reset; one more is needed to rename.
        if core.physical_registers <= core.arch_registers + 1 {
            return Err(invalid(
                "core.physical_registers",
                format!("must exceed arch_registers + 1 ({})", core.arch_registers + 1),
            ));
        }
        if core.iq_capacity == 0 {
            return Err(invalid("core.iq_capacity", "must be at least 1"));
        }
        if core.rob_capacity == 0 {
            return Err(invalid("core.rob_capacity", "must be at least 1"));
        }
        if core.mul_latency == 0 {
            return Err(invalid("core.mul_latency", "must be at least 1"));
        }
        if self.memory.size_bytes == 0 || self.memory.size_bytes % 4 != 0 {
            return Err(invalid("memory.size_bytes", "must be a positive multiple of 4"));
        }
        if self.memory.size_bytes > i32::MAX as usize {
            return Err(invalid("memory.size_bytes", "must fit a 32-bit address"));
        }
        if self.general.code_base % 4 != 0 {
            return Err(invalid("general.code_base", "must be a multiple of 4"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// General simulation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneralConfig {
    /// Emit per-stage trace events (fetch, rename, issue, commit) at debug level
    #[serde(default)]
    pub trace: bool,

    /// Fetch address of the first program instruction
    #[serde(default = "GeneralConfig::default_code_base")]
    pub code_base: u32,
}

impl GeneralConfig {
    fn default_code_base() -> u32 {
        defaults::CODE_BASE
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: false,
            code_base: defaults::CODE_BASE,
        }
    }
}

/// Core resource configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CoreConfig {
    /// Number of general architectural registers (`R0`..)
    #[serde(default = "CoreConfig::default_arch_registers")]
    pub arch_registers: usize,

    /// Size of the physical register pool
    #[serde(default = "CoreConfig::default_physical_registers")]
    pub physical_registers: usize,

    /// Issue queue capacity
    #[serde(default = "CoreConfig::default_iq_capacity")]
    pub iq_capacity: usize,

    /// Reorder buffer capacity
    #[serde(default = "CoreConfig::default_rob_capacity")]
    pub rob_capacity: usize,

    /// Cycles a multiply occupies the multiplier
    #[serde(default = "CoreConfig::default_mul_latency")]
    pub mul_latency: u32,
}

impl CoreConfig {
    fn default_arch_registers() -> usize {
        defaults::ARCH_REGISTERS
    }

    fn default_physical_registers() -> usize {
        defaults::PHYSICAL_REGISTERS
    }

    fn default_iq_capacity() -> usize {
        defaults::IQ_CAPACITY
    }

    fn default_rob_capacity() -> usize {
        defaults::ROB_CAPACITY
    }

    fn default_mul_latency() -> u32 {
        defaults::MUL_LATENCY
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            arch_registers: defaults::ARCH_REGISTERS,
            physical_registers: defaults::PHYSICAL_REGISTERS,
            iq_capacity: defaults::IQ_CAPACITY,
            rob_capacity: defaults::ROB_CAPACITY,
            mul_latency: defaults::MUL_LATENCY,
        }
    }
}

/// Data memory configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemoryConfig {
    /// Data memory size in bytes (word addressed, multiple of 4)
    #[serde(default = "MemoryConfig::default_size_bytes")]
    pub size_bytes: usize,
}

impl MemoryConfig {
    fn default_size_bytes() -> usize {
        defaults::MEMORY_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::MEMORY_SIZE,
        }
    }
}
