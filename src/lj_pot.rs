// file: `src/lj_pot.rs`
use crate::constants::PhysicalConstants;
use crate::run_md::{ForceField, ForceProvider};
use nalgebra::Vector2;

/// Lennard-Jones pair interaction switched off smoothly between `R1` and `R2`.
///
/// The potential uses `sigma = a / 2^(1/6)` from the equilibrium length `a`,
/// while the force kernel uses the fixed reference length `d` (particle
/// diameter). The two agree only when `a == d`.
#[derive(Debug, Clone, PartialEq)]
pub struct LennardJones {
    /// Well depth D
    pub well_depth: f64,
    /// Zero-crossing distance of the potential
    pub sigma: f64,
    /// Equilibrium length used by the force kernel
    pub reference_length: f64,
    /// R1
    pub cutoff_inner: f64,
    /// R2
    pub cutoff_outer: f64,
}

impl LennardJones {
    pub fn new(a: f64, constants: &PhysicalConstants) -> Self {
        LennardJones {
            well_depth: constants.well_depth,
            sigma: a / 2f64.powf(1.0 / 6.0),
            reference_length: constants.particle_diameter,
            cutoff_inner: constants.cutoff_inner,
            cutoff_outer: constants.cutoff_outer,
        }
    }

    /// Smooth switching factor K(r): 1 inside R1, 0 beyond R2, C¹ in between.
    pub fn cutoff_ratio(&self, r: f64) -> f64 {
        let (r1, r2) = (self.cutoff_inner, self.cutoff_outer);
        if r <= r1 {
            1.0
        } else if r >= r2 {
            0.0
        } else {
            let x = (r - r1) / (r1 - r2);
            let s = 1.0 - x * x;
            s * s
        }
    }

    /// U(r) = 4 D ((sigma/r)^12 - (sigma/r)^6) K(r)
    pub fn pair_potential(&self, r: f64) -> f64 {
        let k = self.cutoff_ratio(r);
        if k == 0.0 {
            return 0.0;
        }
        let sr6 = (self.sigma / r).powi(6);
        4.0 * self.well_depth * (sr6 * sr6 - sr6) * k
    }

    /// Scalar `f` such that the force on `i` from `j` is `f * (r_i - r_j)`.
    ///
    /// `12 D r0^6 (r0^6 / r^6 - 1) / r^8 * K(r)`, with `r0` the reference length.
    pub fn pair_force_factor(&self, r2: f64) -> f64 {
        let k = self.cutoff_ratio(r2.sqrt());
        if k == 0.0 {
            return 0.0;
        }
        let r0_6 = self.reference_length.powi(6);
        let r2_3 = r2 * r2 * r2;
        12.0 * self.well_depth * r0_6 * (r0_6 / r2_3 - 1.0) / (r2_3 * r2) * k
    }
}

impl ForceProvider for LennardJones {
    fn compute_forces(&self, positions: &[Vector2<f64>]) -> ForceField {
        let n = positions.len();
        let mut field = ForceField::zeros(n);

        for i in 0..n {
            for j in (i + 1)..n {
                let rij = positions[i] - positions[j];
                let r2 = rij.norm_squared();

                let fij = rij * self.pair_force_factor(r2);
                field.forces[i] += fij;
                field.forces[j] -= fij;

                let u = self.pair_potential(r2.sqrt());
                // every pair counts once for the total and fully for both partners
                field.potential_energy += u;
                field.particle_energies[i] += u;
                field.particle_energies[j] += u;
            }
        }

        field
    }
}
