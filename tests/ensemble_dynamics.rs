//! End-to-end checks of the stepping loop: conservation laws, determinism and
//! evaporation bookkeeping.

use approx::assert_relative_eq;
use droplet_md::{Ensemble, EnsembleSettings, Particle, Phase, PhysicalConstants};
use nalgebra::Vector2;

fn argon() -> PhysicalConstants {
    PhysicalConstants::argon()
}

fn particle_at(x: f64, y: f64) -> Particle {
    let c = argon();
    Particle::new(Vector2::new(x, y), c.particle_mass, c.particle_radius())
}

fn dimer(separation: f64, dt: f64) -> Ensemble {
    let c = argon();
    let half = 0.5 * separation;
    Ensemble::from_particles(
        vec![particle_at(-half, 0.0), particle_at(half, 0.0)],
        c.particle_diameter,
        dt,
        c,
    )
    .unwrap()
}

#[test]
fn dimer_total_energy_is_conserved() {
    let d = argon().particle_diameter;
    let mut ensemble = dimer(1.05 * d, 5e-15);
    let e0 = ensemble.total_energy();
    assert!(e0 < 0.0);

    let mut max_drift: f64 = 0.0;
    let mut min_separation = f64::INFINITY;
    for _ in 0..400 {
        let obs = ensemble.advance_one_step();
        max_drift = max_drift.max(((obs.total_energy - e0) / e0).abs());
        let p = ensemble.particles();
        min_separation = min_separation.min((p[0].position - p[1].position).norm());
    }

    assert_eq!(ensemble.particle_count(), 2);
    assert!(max_drift < 0.01, "relative energy drift {max_drift}");
    // the pair has to have swung through the repulsive wall
    assert!(min_separation < d, "closest approach {}", min_separation / d);
}

#[test]
fn dimer_forces_are_equal_and_opposite() {
    let d = argon().particle_diameter;
    for &sep in &[0.95 * d, 1.2 * d, 1.6 * d] {
        let ensemble = dimer(sep, 1e-15);
        let p = ensemble.particles();
        assert_relative_eq!(p[0].force, -p[1].force);
        assert_relative_eq!(p[0].potential_energy, p[1].potential_energy);
        assert_relative_eq!(p[0].potential_energy, ensemble.potential_energy());
    }
    // compressed pair pushes apart
    let ensemble = dimer(0.95 * d, 1e-15);
    assert!(ensemble.particles()[0].force.x < 0.0);
}

#[test]
fn stepping_conserves_momentum() {
    let c = argon();
    let d = c.particle_diameter;
    let settings = EnsembleSettings {
        randomize_coordinates: true,
        randomize_velocities: true,
        speed_range: 60.0,
        seed: Some(2024),
        ..EnsembleSettings::new(16, d, d, PhysicalConstants::default_time_step())
    };
    let mut ensemble = Ensemble::new(settings, c).unwrap();
    let scale = 16.0 * c.particle_mass * 60.0;

    for _ in 0..100 {
        ensemble.advance_one_step();
    }
    assert_eq!(ensemble.particle_count(), 16);
    assert!(ensemble.net_momentum().norm() < 1e-10 * scale);
}

#[test]
fn unrandomised_runs_are_bit_identical() {
    let c = argon();
    let d = c.particle_diameter;
    let settings = EnsembleSettings::new(16, d, 1.1 * d, PhysicalConstants::default_time_step());

    let mut first = Ensemble::new(settings.clone(), c).unwrap();
    let mut second = Ensemble::new(settings, c).unwrap();
    for _ in 0..200 {
        let a = first.advance_one_step();
        let b = second.advance_one_step();
        assert_eq!(a, b);
    }
    assert_eq!(first.particles(), second.particles());
    // the lattice is not in equilibrium, so something must have moved
    assert!(first.kinetic_energy() > 0.0);
}

#[test]
fn seeded_runs_are_bit_identical() {
    let c = argon();
    let d = c.particle_diameter;
    let settings = EnsembleSettings {
        randomize_coordinates: true,
        target_temperature: Some(80.0),
        seed: Some(99),
        ..EnsembleSettings::new(9, d, d, PhysicalConstants::default_time_step())
    };

    let mut first = Ensemble::new(settings.clone(), c).unwrap();
    let mut second = Ensemble::new(settings, c).unwrap();
    assert_eq!(first.particles(), second.particles());
    for _ in 0..50 {
        first.advance_one_step();
        second.advance_one_step();
    }
    assert_eq!(first.particles(), second.particles());
}

#[test]
fn escaped_particle_counts_this_step_and_is_gone_next() {
    let c = argon();
    let d = c.particle_diameter;
    let mut runaway = particle_at(c.cell_max() + d, 0.0);
    runaway.velocity = Vector2::new(100.0, 0.0);
    let particles = vec![particle_at(-0.5 * d, 0.0), particle_at(0.5 * d, 0.0), runaway];
    let mut ensemble = Ensemble::from_particles(particles, d, 1e-15, c).unwrap();

    let runaway_ke = 0.5 * c.particle_mass * 100.0 * 100.0;

    let during = ensemble.advance_one_step();
    assert_eq!(during.particle_count, 3);
    assert!(during.kinetic_energy >= 0.99 * runaway_ke);
    assert_eq!(ensemble.particle_count(), 2);
    assert_eq!(ensemble.evaporated_count(), 1);
    assert_eq!(ensemble.phase(), Phase::Active);
    // accessors still report the step that saw the runaway
    assert_eq!(ensemble.kinetic_energy(), during.kinetic_energy);

    let after = ensemble.advance_one_step();
    assert_eq!(after.particle_count, 2);
    assert!(after.kinetic_energy < 1e-3 * runaway_ke);
    assert_relative_eq!(after.potential_energy, -c.well_depth, max_relative = 1e-6);
}

#[test]
fn temperature_matches_kinetic_energy() {
    let c = argon();
    let d = c.particle_diameter;
    let settings = EnsembleSettings {
        randomize_velocities: true,
        seed: Some(5),
        ..EnsembleSettings::new(25, d, d, PhysicalConstants::default_time_step())
    };
    let mut ensemble = Ensemble::new(settings, c).unwrap();
    let obs = ensemble.advance_one_step();
    // 2D: E_k = N k_B T
    assert_relative_eq!(
        obs.kinetic_energy,
        obs.particle_count as f64 * c.k_boltzmann * obs.temperature,
        max_relative = 1e-12
    );
    assert_relative_eq!(obs.total_energy, obs.kinetic_energy + obs.potential_energy);
}
