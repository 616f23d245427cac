use crate::particle::Particle;
use itertools::izip;
use nalgebra::Vector2;

/// Result of one all-pairs evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceField {
    /// Net force on each particle, in input order
    pub forces: Vec<Vector2<f64>>,
    /// Per-particle interaction energy; each pair is credited to both partners
    pub particle_energies: Vec<f64>,
    /// Sum over unordered pairs
    pub potential_energy: f64,
}

impl ForceField {
    pub fn zeros(n: usize) -> Self {
        ForceField {
            forces: vec![Vector2::zeros(); n],
            particle_energies: vec![0.0; n],
            potential_energy: 0.0,
        }
    }
}

pub trait ForceProvider {
    fn compute_forces(&self, positions: &[Vector2<f64>]) -> ForceField;
}

/// Velocity-Verlet split into its position and velocity halves.
///
/// A full step is `drift`, a force recompute, `apply_field`, then `kick`
/// with the forces returned by `drift`. Particle order must not change in
/// between since the old forces are paired by index.
pub struct VelocityVerlet;

impl VelocityVerlet {
    /// `x += v dt + F/(2m) dt^2`, returning F(t) for every particle.
    pub fn drift(particles: &mut [Particle], dt: f64) -> Vec<Vector2<f64>> {
        let mut old_forces = Vec::with_capacity(particles.len());
        for p in particles.iter_mut() {
            let inv_2m = 0.5 / p.mass;
            p.position += p.velocity * dt + p.force * (inv_2m * dt * dt);
            old_forces.push(p.force);
        }
        old_forces
    }

    /// Store a freshly evaluated field on the particles.
    pub fn apply_field(particles: &mut [Particle], field: &ForceField) {
        for (p, &f, &u) in izip!(particles, &field.forces, &field.particle_energies) {
            p.force = f;
            p.potential_energy = u;
        }
    }

    /// `v += (F(t) + F(t+dt))/(2m) dt`
    pub fn kick(particles: &mut [Particle], old_forces: &[Vector2<f64>], dt: f64) {
        debug_assert_eq!(particles.len(), old_forces.len());
        for (p, &f_old) in particles.iter_mut().zip(old_forces) {
            let inv_2m = 0.5 / p.mass;
            p.velocity += (f_old + p.force) * (inv_2m * dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Harmonic spring to the origin, k = 1
    struct Spring;

    impl ForceProvider for Spring {
        fn compute_forces(&self, positions: &[Vector2<f64>]) -> ForceField {
            let mut field = ForceField::zeros(positions.len());
            for (f, u, x) in izip!(&mut field.forces, &mut field.particle_energies, positions) {
                *f = -x;
                *u = 0.5 * x.norm_squared();
                field.potential_energy += *u;
            }
            field
        }
    }

    fn step(particles: &mut Vec<Particle>, dt: f64) {
        let old = VelocityVerlet::drift(particles, dt);
        let positions: Vec<_> = particles.iter().map(|p| p.position).collect();
        let field = Spring.compute_forces(&positions);
        VelocityVerlet::apply_field(particles, &field);
        VelocityVerlet::kick(particles, &old, dt);
    }

    #[test]
    fn free_particle_moves_uniformly() {
        let mut particles = vec![Particle::with_velocity(
            Vector2::zeros(),
            Vector2::new(2.0, -1.0),
            3.0,
            0.1,
        )];
        let old = VelocityVerlet::drift(&mut particles, 0.5);
        VelocityVerlet::kick(&mut particles, &old, 0.5);
        assert_relative_eq!(particles[0].position, Vector2::new(1.0, -0.5));
        assert_relative_eq!(particles[0].velocity, Vector2::new(2.0, -1.0));
    }

    #[test]
    fn harmonic_oscillator_keeps_its_energy() {
        let mut particles = vec![Particle::new(Vector2::new(1.0, 0.0), 1.0, 0.1)];
        let positions = [particles[0].position];
        VelocityVerlet::apply_field(&mut particles, &Spring.compute_forces(&positions));

        let energy = |p: &Particle| p.kinetic_energy() + p.potential_energy;
        let e0 = energy(&particles[0]);
        for _ in 0..1000 {
            step(&mut particles, 0.01);
        }
        assert_relative_eq!(energy(&particles[0]), e0, max_relative = 1e-4);
        // ten time units is about 1.6 periods; the particle must have moved
        assert!((particles[0].position.x - 1.0).abs() > 1e-3);
    }
}
