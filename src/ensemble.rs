use crate::constants::PhysicalConstants;
use crate::error::{Error, Result};
use crate::lattice::{centered_lattice, perfect_square_side};
use crate::lj_pot::LennardJones;
use crate::observables::Observables;
use crate::particle::Particle;
use crate::run_md::{ForceProvider, VelocityVerlet};
use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How an ensemble is laid out and started.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EnsembleSettings {
    /// Number of particles; must be a non-zero perfect square
    pub particle_count: usize,
    /// Equilibrium separation `a` (m)
    pub a: f64,
    /// Lattice period `b` (m)
    pub b: f64,
    /// Time step (s)
    pub dt: f64,
    /// Jitter lattice sites by up to `coordinate_jitter * b` per axis
    #[serde(default)]
    pub randomize_coordinates: bool,
    /// Draw vx, vy uniformly from `[-speed_range, speed_range]`
    #[serde(default)]
    pub randomize_velocities: bool,
    /// Give every particle the speed sqrt(2 k_B T / m); wins over `randomize_velocities`
    #[serde(default)]
    pub target_temperature: Option<f64>,
    /// Fraction of `b` used as coordinate noise amplitude
    #[serde(default = "default_coordinate_jitter")]
    pub coordinate_jitter: f64,
    /// Velocity noise amplitude (m/s)
    #[serde(default = "default_speed_range")]
    pub speed_range: f64,
    /// Optional random seed
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_coordinate_jitter() -> f64 {
    0.01
}
fn default_speed_range() -> f64 {
    20.0
}

impl EnsembleSettings {
    /// Plain lattice at rest, no randomisation.
    pub fn new(particle_count: usize, a: f64, b: f64, dt: f64) -> Self {
        EnsembleSettings {
            particle_count,
            a,
            b,
            dt,
            randomize_coordinates: false,
            randomize_velocities: false,
            target_temperature: None,
            coordinate_jitter: default_coordinate_jitter(),
            speed_range: default_speed_range(),
            seed: None,
        }
    }

    /// Check the settings and return the lattice side length.
    pub fn validate(&self) -> Result<usize> {
        let side = perfect_square_side(self.particle_count).ok_or_else(|| {
            Error::invalid(format!(
                "particle count {} is not a positive perfect square",
                self.particle_count
            ))
        })?;
        check_positive("equilibrium length a", self.a)?;
        check_positive("lattice period b", self.b)?;
        check_positive("time step dt", self.dt)?;

        // below 0.5 neighbouring sites can never coincide
        if !(0.0..0.5).contains(&self.coordinate_jitter) {
            return Err(Error::invalid(format!(
                "coordinate jitter must lie in [0, 0.5), got {}",
                self.coordinate_jitter
            )));
        }
        if !sampling_range_is_finite(self.speed_range) {
            return Err(Error::invalid(format!(
                "speed range must be non-negative with a finite span, got {}",
                self.speed_range
            )));
        }
        if !sampling_range_is_finite(self.b * self.coordinate_jitter) {
            return Err(Error::invalid(format!(
                "coordinate jitter amplitude {} has no finite span",
                self.b * self.coordinate_jitter
            )));
        }
        if let Some(t) = self.target_temperature {
            if !t.is_finite() || t < 0.0 {
                return Err(Error::invalid(format!(
                    "target temperature must be finite and non-negative, got {t}"
                )));
            }
        }
        Ok(side)
    }
}

/// `[-amplitude, amplitude]` can be sampled uniformly without overflow.
fn sampling_range_is_finite(amplitude: f64) -> bool {
    amplitude >= 0.0 && (2.0 * amplitude / (1.0 - f64::EPSILON)).is_finite()
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}

/// Macro-state of an ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// At least one particle left
    Active,
    /// Every particle evaporated; stepping does nothing
    Depleted,
}

/// A 2D particle ensemble advanced with velocity-Verlet.
///
/// Each call to [`Ensemble::advance_one_step`] moves the particles, recomputes
/// all pair forces, updates velocities, recomputes the observables and finally
/// drops particles that left the bounding cell. The observables returned for a
/// step still include the particles removed at its end.
#[derive(Debug, Clone)]
pub struct Ensemble<F: ForceProvider = LennardJones> {
    particles: Vec<Particle>,
    provider: F,
    constants: PhysicalConstants,
    a: f64,
    b: Option<f64>,
    dt: f64,
    initial_count: usize,
    observables: Observables,
    step: u64,
}

impl Ensemble<LennardJones> {
    /// Build an ensemble on a centred square lattice.
    ///
    /// # Errors
    /// `Error::InvalidConfiguration` for a non-square or zero particle count,
    /// non-positive `a`, `b` or `dt`, or out-of-range randomisation settings.
    pub fn new(settings: EnsembleSettings, constants: PhysicalConstants) -> Result<Self> {
        constants.validate().map_err(Error::InvalidConfiguration)?;
        let side = settings.validate()?;

        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let b = settings.b;
        let jitter_amp = b * settings.coordinate_jitter;
        let jitter = settings
            .randomize_coordinates
            .then(|| Uniform::new_inclusive(-jitter_amp, jitter_amp));
        let speed = settings
            .randomize_velocities
            .then(|| Uniform::new_inclusive(-settings.speed_range, settings.speed_range));
        let mass = constants.particle_mass;

        let mut particles: Vec<Particle> = centered_lattice(side, b)
            .into_iter()
            .map(|site| {
                let position = match &jitter {
                    Some(j) => site + Vector2::new(j.sample(&mut rng), j.sample(&mut rng)),
                    None => site,
                };
                let velocity = match (settings.target_temperature, &speed) {
                    (Some(t), _) => thermal_velocity(&mut rng, t, &constants),
                    (None, Some(s)) => Vector2::new(s.sample(&mut rng), s.sample(&mut rng)),
                    (None, None) => Vector2::zeros(),
                };
                Particle::with_velocity(position, velocity, mass, constants.particle_radius())
            })
            .collect();

        remove_net_momentum(&mut particles);

        debug!(
            "Placed {} particles on a {}x{} lattice with b = {:.4e} m",
            particles.len(),
            side,
            side,
            b
        );

        let provider = LennardJones::new(settings.a, &constants);
        let mut ensemble = Self::assemble(particles, provider, constants, settings.a, settings.dt);
        ensemble.b = Some(b);
        Ok(ensemble)
    }

    /// Build an ensemble from explicitly placed particles.
    pub fn from_particles(
        particles: Vec<Particle>,
        a: f64,
        dt: f64,
        constants: PhysicalConstants,
    ) -> Result<Self> {
        check_positive("equilibrium length a", a)?;
        let provider = LennardJones::new(a, &constants);
        Self::with_provider(particles, provider, constants, a, dt)
    }
}

impl<F: ForceProvider> Ensemble<F> {
    /// Build an ensemble with a custom pair interaction. `a` is kept only as
    /// the nominal equilibrium length reported by [`Ensemble::a`].
    pub fn with_provider(
        particles: Vec<Particle>,
        provider: F,
        constants: PhysicalConstants,
        a: f64,
        dt: f64,
    ) -> Result<Self> {
        constants.validate().map_err(Error::InvalidConfiguration)?;
        check_positive("time step dt", dt)?;
        if particles.is_empty() {
            return Err(Error::invalid("an ensemble needs at least one particle"));
        }
        for (i, p) in particles.iter().enumerate() {
            if !p.mass.is_finite() || p.mass <= 0.0 {
                return Err(Error::invalid(format!(
                    "particle {i} has non-positive mass {}",
                    p.mass
                )));
            }
            if let Some(j) = particles[i + 1..]
                .iter()
                .position(|q| (p.position - q.position).norm_squared() == 0.0)
            {
                return Err(Error::invalid(format!(
                    "particles {i} and {} share the same position",
                    i + 1 + j
                )));
            }
        }
        Ok(Self::assemble(particles, provider, constants, a, dt))
    }

    fn assemble(
        particles: Vec<Particle>,
        provider: F,
        constants: PhysicalConstants,
        a: f64,
        dt: f64,
    ) -> Self {
        let initial_count = particles.len();
        let mut ensemble = Ensemble {
            particles,
            provider,
            constants,
            a,
            b: None,
            dt,
            initial_count,
            observables: Observables::default(),
            step: 0,
        };
        let potential = ensemble.refresh_forces();
        ensemble.observables = ensemble.measure(potential);
        ensemble
    }

    /// Advance by one time step and return this step's observables.
    ///
    /// A depleted ensemble is left untouched and returns its last observables.
    pub fn advance_one_step(&mut self) -> Observables {
        if self.particles.is_empty() {
            return self.observables;
        }

        let old_forces = VelocityVerlet::drift(&mut self.particles, self.dt);
        let potential = self.refresh_forces();
        VelocityVerlet::kick(&mut self.particles, &old_forces, self.dt);

        self.observables = self.measure(potential);
        self.evaporate();
        self.step += 1;

        self.observables
    }

    /// Recompute forces and per-particle energies; returns the pair total.
    fn refresh_forces(&mut self) -> f64 {
        let positions: Vec<Vector2<f64>> = self.particles.iter().map(|p| p.position).collect();
        let field = self.provider.compute_forces(&positions);
        VelocityVerlet::apply_field(&mut self.particles, &field);
        field.potential_energy
    }

    fn measure(&self, potential_energy: f64) -> Observables {
        let n = self.particles.len();
        let kinetic_energy: f64 = self.particles.iter().map(Particle::kinetic_energy).sum();
        let sum_mv2: f64 = self
            .particles
            .iter()
            .map(|p| p.mass * p.speed_squared())
            .sum();
        let temperature = if n == 0 {
            0.0
        } else {
            sum_mv2 / (2.0 * n as f64 * self.constants.k_boltzmann)
        };

        Observables {
            kinetic_energy,
            potential_energy,
            total_energy: kinetic_energy + potential_energy,
            temperature,
            particle_count: n,
        }
    }

    /// Drop every particle outside the bounding cell.
    fn evaporate(&mut self) {
        let (lo, hi) = (self.constants.cell_min(), self.constants.cell_max());
        let before = self.particles.len();
        self.particles.retain(|p| p.is_inside(lo, hi));

        let lost = before - self.particles.len();
        if lost > 0 {
            debug!(
                "Step {}: {} particle(s) left the cell, {} remaining",
                self.step,
                lost,
                self.particles.len()
            );
            if self.particles.is_empty() {
                info!("Ensemble depleted after {} steps", self.step + 1);
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn observables(&self) -> Observables {
        self.observables
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.observables.kinetic_energy
    }

    pub fn potential_energy(&self) -> f64 {
        self.observables.potential_energy
    }

    pub fn total_energy(&self) -> f64 {
        self.observables.total_energy
    }

    /// Instantaneous temperature in kelvin.
    pub fn temperature(&self) -> f64 {
        self.observables.temperature
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn initial_count(&self) -> usize {
        self.initial_count
    }

    /// Particles lost through the cell boundary so far.
    pub fn evaporated_count(&self) -> usize {
        self.initial_count - self.particles.len()
    }

    pub fn phase(&self) -> Phase {
        if self.particles.is_empty() {
            Phase::Depleted
        } else {
            Phase::Active
        }
    }

    pub fn step_count(&self) -> u64 {
        self.step
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    /// Lattice period, if the ensemble was built on a lattice.
    pub fn b(&self) -> Option<f64> {
        self.b
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    pub fn provider(&self) -> &F {
        &self.provider
    }

    /// Total momentum of the remaining particles.
    pub fn net_momentum(&self) -> Vector2<f64> {
        self.particles.iter().map(Particle::momentum).sum()
    }
}

/// Velocity with |v|^2 = 2 k_B T / m, split between the axes at a random
/// ratio and with random signs.
fn thermal_velocity<R: Rng>(
    rng: &mut R,
    temperature: f64,
    constants: &PhysicalConstants,
) -> Vector2<f64> {
    let v2 = 2.0 * constants.k_boltzmann * temperature / constants.particle_mass;
    let ratio: f64 = rng.gen_range(0.0..=1.0);
    let vx = (ratio * v2).sqrt();
    let vy = ((1.0 - ratio) * v2).sqrt();
    let sx = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let sy = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    Vector2::new(sx * vx, sy * vy)
}

/// Subtract the mean velocity so the ensemble has zero total momentum.
fn remove_net_momentum(particles: &mut [Particle]) {
    if particles.is_empty() {
        return;
    }
    let mean: Vector2<f64> =
        particles.iter().map(|p| p.velocity).sum::<Vector2<f64>>() / particles.len() as f64;
    for p in particles.iter_mut() {
        p.velocity -= mean;
    }
}
