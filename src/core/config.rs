//! Simulation configuration
//!
//! Only the boundary inputs live here: world size, seeding and bookkeeping.
//! The behavioral thresholds that shape population dynamics are constants
//! next to the code that uses them and are not tunable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Upper bound on retained narration lines
pub const MAX_EVENT_LOG_CAPACITY: usize = 10_000;

/// Configuration for a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === WORLD ===
    /// Grid width in tiles
    pub width: u32,

    /// Grid height in tiles
    ///
    /// Capacity is derived from the area: floor(width * height * 0.3).
    pub height: u32,

    // === SEEDING ===
    /// Number of agents placed at world creation
    ///
    /// Clamped to capacity when seeding.
    pub initial_population: usize,

    /// Seed for the shared random source
    ///
    /// Two runs with the same config and seed produce identical histories.
    pub seed: u64,

    /// Fraction of seeded agents that belong to the social species (0.0-1.0)
    pub social_fraction: f64,

    // === HAZARDS ===
    /// Whether the disaster engine runs after each world update
    pub disasters_enabled: bool,

    // === NARRATION ===
    /// Population step at which milestone events are narrated
    pub milestone_step: usize,

    /// Number of narration lines kept by the event log
    pub event_log_capacity: usize,

    /// Optional TOML file replacing the built-in gene catalog
    pub gene_catalog: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 60,
            height: 30,
            initial_population: 40,
            seed: 42,
            social_fraction: 0.5,
            disasters_enabled: true,
            milestone_step: 10,
            event_log_capacity: 12,
            gene_catalog: None,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Maximum number of agents the configured grid can hold
    pub fn max_population(&self) -> usize {
        ((self.width as f64) * (self.height as f64) * 0.3).floor() as usize
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::Config(format!(
                "world must have a positive area, got {}x{}",
                self.width, self.height
            )));
        }

        if self.max_population() == 0 {
            return Err(SimError::Config(format!(
                "a {}x{} world has no room for agents",
                self.width, self.height
            )));
        }

        if !(0.0..=1.0).contains(&self.social_fraction) {
            return Err(SimError::Config(format!(
                "social_fraction ({}) must be within [0, 1]",
                self.social_fraction
            )));
        }

        if self.milestone_step == 0 {
            return Err(SimError::Config("milestone_step must be positive".into()));
        }

        if self.event_log_capacity > MAX_EVENT_LOG_CAPACITY {
            return Err(SimError::Config(format!(
                "event_log_capacity ({}) exceeds {}",
                self.event_log_capacity, MAX_EVENT_LOG_CAPACITY
            )));
        }

        Ok(())
    }

    /// Validate, then check that a run of `ticks` has someone to simulate
    pub fn validate_run(&self, ticks: u64) -> Result<()> {
        self.validate()?;
        if ticks > 0 && self.initial_population == 0 {
            return Err(SimError::Config(format!(
                "{} ticks requested with an empty initial population",
                ticks
            )));
        }
        Ok(())
    }
}
