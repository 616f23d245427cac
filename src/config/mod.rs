//! Configuration management for droplet simulations
//!
//! A run is described by one YAML document holding the physical constants,
//! the ensemble layout, the single-run reporting settings and, optionally, an
//! evaporation sweep.

mod args;

pub use args::Args;

use crate::constants::PhysicalConstants;
use crate::ensemble::EnsembleSettings;
use crate::error::{Error, Result};
use crate::research::EvaporationSweep;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a droplet simulation
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MdConfig {
    /// Physical constants (argon reference values when omitted)
    #[serde(default)]
    pub constants: PhysicalConstants,
    /// Ensemble layout and initial conditions
    pub ensemble: EnsembleSettings,
    /// Single-run stepping and reporting
    #[serde(default)]
    pub run: RunConfig,
    /// Evaporation sweep parameters
    #[serde(default)]
    pub research: Option<EvaporationSweep>,
}

/// Single-run settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RunConfig {
    /// Maximum number of steps
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// Steps per averaging/report window
    #[serde(default = "default_report_interval")]
    pub report_interval: usize,
    /// Temperature is reported only after this many steps
    #[serde(default = "default_warmup_steps")]
    pub warmup_steps: usize,
}

fn default_steps() -> usize {
    5000
}
fn default_report_interval() -> usize {
    25
}
fn default_warmup_steps() -> usize {
    500
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            steps: default_steps(),
            report_interval: default_report_interval(),
            warmup_steps: default_warmup_steps(),
        }
    }
}

impl Default for MdConfig {
    fn default() -> Self {
        let constants = PhysicalConstants::argon();
        let d = constants.particle_diameter;
        let ensemble = EnsembleSettings {
            randomize_coordinates: true,
            randomize_velocities: true,
            ..EnsembleSettings::new(100, d, d, PhysicalConstants::default_time_step())
        };
        MdConfig {
            constants,
            ensemble,
            run: RunConfig::default(),
            research: None,
        }
    }
}

impl MdConfig {
    /// Load configuration from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: MdConfig = serde_yml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        self.constants
            .validate()
            .map_err(Error::InvalidConfiguration)?;
        self.ensemble.validate()?;

        if self.run.steps == 0 {
            return Err(Error::invalid("Total steps must be positive"));
        }
        if self.run.report_interval == 0 {
            return Err(Error::invalid("Report interval must be positive"));
        }

        if let Some(sweep) = &self.research {
            sweep.validate()?;
        }
        Ok(())
    }

    /// Sweep parameters, falling back to the reference sweep
    pub fn sweep(&self) -> EvaporationSweep {
        self.research.clone().unwrap_or_default()
    }
}
