//! Evaporation research: how many particles a droplet loses against its
//! mean temperature, sampled over a range of initial lattice periods.

use crate::constants::{PhysicalConstants, ARGON_DIAMETER};
use crate::ensemble::{Ensemble, EnsembleSettings};
use crate::error::{Error, Result};
use crate::observables::WindowAverage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of one sweep point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaporationRecord {
    /// Lattice period the run started from (m)
    pub b: f64,
    /// Temperature averaged over the post-warm-up steps (K)
    pub temperature: f64,
    /// Particles lost through the cell boundary
    pub evaporated: usize,
}

impl EvaporationRecord {
    /// One line of the result log: `evaporated, temperature`.
    pub fn to_line(&self) -> String {
        format!("{}, {}", self.evaporated, self.temperature)
    }
}

/// Parameters of a sweep over lattice periods `b = (b_start + k b_step) a`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EvaporationSweep {
    #[serde(default = "default_particle_count")]
    pub particle_count: usize,
    /// Equilibrium length `a` (m)
    #[serde(default = "default_a")]
    pub a: f64,
    /// First period, in units of `a`
    #[serde(default = "default_b_start")]
    pub b_start: f64,
    /// Period increment, in units of `a`
    #[serde(default = "default_b_step")]
    pub b_step: f64,
    /// Number of increments; the sweep has `b_steps + 1` points
    #[serde(default = "default_b_steps")]
    pub b_steps: usize,
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Steps per run
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// Steps excluded from the temperature average
    #[serde(default = "default_warmup")]
    pub warmup_steps: usize,
    #[serde(default = "default_jitter")]
    pub coordinate_jitter: f64,
    #[serde(default = "default_speed_range")]
    pub speed_range: f64,
    /// Base seed; point `k` uses `seed + k`
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_particle_count() -> usize {
    100
}
fn default_a() -> f64 {
    ARGON_DIAMETER
}
fn default_b_start() -> f64 {
    0.9
}
fn default_b_step() -> f64 {
    0.02
}
fn default_b_steps() -> usize {
    30
}
fn default_dt() -> f64 {
    PhysicalConstants::default_time_step()
}
fn default_steps() -> usize {
    5000
}
fn default_warmup() -> usize {
    500
}
fn default_jitter() -> f64 {
    0.05
}
fn default_speed_range() -> f64 {
    60.0
}

impl Default for EvaporationSweep {
    fn default() -> Self {
        EvaporationSweep {
            particle_count: default_particle_count(),
            a: default_a(),
            b_start: default_b_start(),
            b_step: default_b_step(),
            b_steps: default_b_steps(),
            dt: default_dt(),
            steps: default_steps(),
            warmup_steps: default_warmup(),
            coordinate_jitter: default_jitter(),
            speed_range: default_speed_range(),
            seed: None,
        }
    }
}

impl EvaporationSweep {
    pub fn validate(&self) -> Result<()> {
        if self.steps <= self.warmup_steps {
            return Err(Error::invalid(format!(
                "sweep needs more steps ({}) than warm-up steps ({})",
                self.steps, self.warmup_steps
            )));
        }
        if !self.b_start.is_finite() || self.b_start <= 0.0 {
            return Err(Error::invalid("b_start must be positive"));
        }
        if !self.b_step.is_finite() || self.b_step < 0.0 {
            return Err(Error::invalid("b_step must be non-negative"));
        }
        self.settings_for(0, self.a * self.b_start).validate()?;
        Ok(())
    }

    /// Lattice periods visited by the sweep, in order.
    pub fn periods(&self) -> Vec<f64> {
        (0..=self.b_steps)
            .map(|k| (self.b_start + k as f64 * self.b_step) * self.a)
            .collect()
    }

    fn settings_for(&self, index: usize, b: f64) -> EnsembleSettings {
        EnsembleSettings {
            randomize_coordinates: true,
            randomize_velocities: true,
            coordinate_jitter: self.coordinate_jitter,
            speed_range: self.speed_range,
            seed: self.seed.map(|s| s.wrapping_add(index as u64)),
            ..EnsembleSettings::new(self.particle_count, self.a, b, self.dt)
        }
    }

    /// Run one independent ensemble from lattice period `b`.
    pub fn run_point(
        &self,
        index: usize,
        b: f64,
        constants: PhysicalConstants,
    ) -> Result<EvaporationRecord> {
        let mut ensemble = Ensemble::new(self.settings_for(index, b), constants)?;
        let mut temperature = WindowAverage::new();

        for step in 0..self.steps {
            let obs = ensemble.advance_one_step();
            if step >= self.warmup_steps {
                temperature.push(obs.temperature);
            }
        }

        let record = EvaporationRecord {
            b,
            temperature: temperature.take_mean().unwrap_or(0.0),
            evaporated: ensemble.evaporated_count(),
        };
        info!(
            "b = {:.4e} m: <T> = {:.3} K, evaporated {} of {}",
            record.b,
            record.temperature,
            record.evaporated,
            ensemble.initial_count()
        );
        Ok(record)
    }

    /// Run every sweep point in parallel; records come back in period order.
    pub fn run(&self, constants: PhysicalConstants) -> Result<Vec<EvaporationRecord>> {
        self.validate()?;
        constants.validate().map_err(Error::InvalidConfiguration)?;
        info!(
            "Evaporation sweep: {} points, {} particles, {} steps each",
            self.b_steps + 1,
            self.particle_count,
            self.steps
        );

        self.periods()
            .into_par_iter()
            .enumerate()
            .map(|(index, b)| self.run_point(index, b, constants))
            .collect()
    }
}

/// Append-only plain-text log of sweep results.
#[derive(Debug, Clone)]
pub struct ResultLog {
    path: PathBuf,
}

impl ResultLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ResultLog {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &EvaporationRecord) -> Result<()> {
        self.append_all(std::slice::from_ref(record))
    }

    pub fn append_all(&self, records: &[EvaporationRecord]) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        for record in records {
            writeln!(file, "{}", record.to_line())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    fn tiny_sweep() -> EvaporationSweep {
        EvaporationSweep {
            particle_count: 4,
            b_steps: 2,
            steps: 20,
            warmup_steps: 5,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn periods_follow_start_and_step() {
        let sweep = EvaporationSweep::default();
        let periods = sweep.periods();
        assert_eq!(periods.len(), 31);
        assert_relative_eq!(periods[0], 0.9 * ARGON_DIAMETER, max_relative = 1e-12);
        assert_relative_eq!(periods[30], 1.5 * ARGON_DIAMETER, max_relative = 1e-12);
    }

    #[test]
    fn warmup_must_be_shorter_than_run() {
        let sweep = EvaporationSweep {
            steps: 100,
            warmup_steps: 100,
            ..Default::default()
        };
        assert!(matches!(sweep.validate(), Err(Error::InvalidConfiguration(_))));

        let sweep = EvaporationSweep {
            particle_count: 50,
            ..Default::default()
        };
        assert!(sweep.validate().is_err());
    }

    #[test]
    fn sweep_returns_one_record_per_period_in_order() {
        let sweep = tiny_sweep();
        let records = sweep.run(PhysicalConstants::argon()).unwrap();
        assert_eq!(records.len(), 3);
        for (record, b) in records.iter().zip(sweep.periods()) {
            assert_eq!(record.b, b);
            assert!(record.temperature.is_finite());
            assert!(record.temperature > 0.0);
            assert!(record.evaporated <= 4);
        }
    }

    #[test]
    fn seeded_points_are_reproducible() {
        let sweep = tiny_sweep();
        let c = PhysicalConstants::argon();
        let b = sweep.periods()[1];
        let first = sweep.run_point(1, b, c).unwrap();
        let second = sweep.run_point(1, b, c).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn log_appends_evaporated_then_temperature() {
        let dir = tempdir().unwrap();
        let log = ResultLog::new(dir.path().join("research.txt"));
        let r1 = EvaporationRecord {
            b: 1.0,
            temperature: 87.5,
            evaporated: 3,
        };
        let r2 = EvaporationRecord {
            b: 1.1,
            temperature: 90.25,
            evaporated: 0,
        };
        log.append(&r1).unwrap();
        log.append_all(&[r2]).unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, "3, 87.5\n0, 90.25\n");
    }
}
