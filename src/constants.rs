// file: `src/constants.rs`
use serde::{Deserialize, Serialize};

/// Boltzmann constant (J/K)
pub const K_BOLTZMANN: f64 = 1.380649e-23;
/// Electron-volt in joules
pub const ELECTRON_VOLT: f64 = 1.602176487e-19;
/// Offset between kelvin and degrees Celsius
pub const CELSIUS_OFFSET: f64 = 273.15;

/// Argon-like particle diameter (m)
pub const ARGON_DIAMETER: f64 = 0.382e-9;
/// Argon atomic mass (kg)
pub const ARGON_MASS: f64 = 6.6335209e-26;
/// Characteristic time of the system (s)
pub const CHARACTERISTIC_TIME: f64 = 2e-12;

/// Physical constants shared by every particle of one simulation.
///
/// Each [`crate::Ensemble`] owns its own copy, so differently configured runs
/// (e.g. a research sweep) can coexist in one process.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PhysicalConstants {
    /// Particle diameter `d` (m), also the reference length of the force kernel
    pub particle_diameter: f64,
    /// Particle mass (kg)
    pub particle_mass: f64,
    /// Boltzmann constant (J/K)
    #[serde(default = "default_kb")]
    pub k_boltzmann: f64,
    /// LJ well depth `D` (J)
    pub well_depth: f64,
    /// Inner smoothing radius `R1` (m): full interaction below it
    pub cutoff_inner: f64,
    /// Outer smoothing radius `R2` (m): no interaction beyond it
    pub cutoff_outer: f64,
    /// Side length of the square bounding cell (m), centred on the origin
    pub cell_length: f64,
}

fn default_kb() -> f64 {
    K_BOLTZMANN
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::argon()
    }
}

impl PhysicalConstants {
    /// Reference argon parameters: d = 0.382 nm, D = 0.0103 eV,
    /// R1 = 1.1 d, R2 = 1.8 d, cell = 30 d.
    pub fn argon() -> Self {
        let d = ARGON_DIAMETER;
        Self {
            particle_diameter: d,
            particle_mass: ARGON_MASS,
            k_boltzmann: K_BOLTZMANN,
            well_depth: 0.0103 * ELECTRON_VOLT,
            cutoff_inner: 1.1 * d,
            cutoff_outer: 1.8 * d,
            cell_length: 30.0 * d,
        }
    }

    #[inline]
    pub fn particle_radius(&self) -> f64 {
        0.5 * self.particle_diameter
    }

    /// Upper edge of the bounding cell, `L_max`
    #[inline]
    pub fn cell_max(&self) -> f64 {
        0.5 * self.cell_length
    }

    /// Lower edge of the bounding cell, `L_min`
    #[inline]
    pub fn cell_min(&self) -> f64 {
        -self.cell_max()
    }

    /// Reference time step, 1% of the characteristic time
    pub fn default_time_step() -> f64 {
        0.01 * CHARACTERISTIC_TIME
    }

    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("particle diameter", self.particle_diameter),
            ("particle mass", self.particle_mass),
            ("Boltzmann constant", self.k_boltzmann),
            ("well depth", self.well_depth),
            ("inner cutoff radius", self.cutoff_inner),
            ("outer cutoff radius", self.cutoff_outer),
            ("cell length", self.cell_length),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be finite and positive, got {value}"));
            }
        }
        if self.cutoff_inner >= self.cutoff_outer {
            return Err(format!(
                "inner cutoff radius ({}) must be smaller than the outer one ({})",
                self.cutoff_inner, self.cutoff_outer
            ));
        }
        Ok(())
    }
}
