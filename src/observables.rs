use crate::constants::CELSIUS_OFFSET;
use serde::Serialize;

/// Thermodynamic state of an ensemble after one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Observables {
    /// Kinetic energy (J)
    pub kinetic_energy: f64,
    /// Pairwise potential energy, each pair counted once (J)
    pub potential_energy: f64,
    /// Kinetic plus potential (J)
    pub total_energy: f64,
    /// Instantaneous temperature (K)
    pub temperature: f64,
    /// Number of particles the values were computed over
    pub particle_count: usize,
}

impl Observables {
    /// Temperature shifted to degrees Celsius, for display.
    #[inline]
    pub fn temperature_celsius(&self) -> f64 {
        self.temperature - CELSIUS_OFFSET
    }
}

/// Running mean that is emptied every time it is read.
///
/// Drivers use it to report energy and temperature averaged over a reporting
/// window instead of the noisy per-step values.
#[derive(Debug, Clone, Default)]
pub struct WindowAverage {
    sum: f64,
    count: usize,
}

impl WindowAverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Mean of everything pushed since the last call, if anything was.
    pub fn take_mean(&mut self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        let mean = self.sum / self.count as f64;
        *self = Self::default();
        Some(mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn celsius_shift() {
        let obs = Observables {
            temperature: 300.0,
            ..Default::default()
        };
        assert_relative_eq!(obs.temperature_celsius(), 26.85, epsilon = 1e-10);
    }

    #[test]
    fn window_resets_after_reading() {
        let mut w = WindowAverage::new();
        assert_eq!(w.take_mean(), None);
        w.push(1.0);
        w.push(2.0);
        w.push(6.0);
        assert_eq!(w.len(), 3);
        assert_relative_eq!(w.take_mean().unwrap(), 3.0);
        assert!(w.is_empty());
        w.push(-4.0);
        assert_relative_eq!(w.take_mean().unwrap(), -4.0);
    }
}
