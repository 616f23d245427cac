// Droplet Evolution Example
//
// A 2D argon droplet starts on a square lattice with random velocities and is
// left to evolve inside a 30 d wide cell. Fast particles that cross the cell
// boundary evaporate. Every 250 steps the averaged energy, temperature and the
// number of surviving particles are printed, together with a rough radius of
// gyration of the droplet.

use droplet_md::{Ensemble, EnsembleSettings, Phase, PhysicalConstants, WindowAverage};
use nalgebra::Vector2;

fn radius_of_gyration(ensemble: &Ensemble) -> f64 {
    let particles = ensemble.particles();
    if particles.is_empty() {
        return 0.0;
    }
    let n = particles.len() as f64;
    let centre: Vector2<f64> = particles.iter().map(|p| p.position).sum::<Vector2<f64>>() / n;
    let msd: f64 = particles
        .iter()
        .map(|p| (p.position - centre).norm_squared())
        .sum::<f64>()
        / n;
    msd.sqrt()
}

fn main() {
    let constants = PhysicalConstants::argon();
    let d = constants.particle_diameter;

    let settings = EnsembleSettings {
        randomize_coordinates: true,
        randomize_velocities: true,
        speed_range: 60.0,
        seed: Some(17),
        ..EnsembleSettings::new(64, d, 1.1 * d, PhysicalConstants::default_time_step())
    };

    println!("Droplet evolution");
    println!("  Particles:     {}", settings.particle_count);
    println!("  a = {:.3e} m, b = {:.3e} m", settings.a, settings.b);
    println!("  dt = {:.2e} s", settings.dt);
    println!(
        "  Cell:          [{:.3e}; {:.3e}] m",
        constants.cell_min(),
        constants.cell_max()
    );
    println!();

    let mut ensemble = match Ensemble::new(settings, constants) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Could not build the droplet: {e}");
            return;
        }
    };

    let total_steps = 5000;
    let report_every = 250;
    let warmup = 500;
    let mut energy = WindowAverage::new();
    let mut temperature = WindowAverage::new();

    println!(
        "{:>6} | {:>4} | {:>13} | {:>9} | {:>8}",
        "Step", "N", "<E> (J)", "<T> (K)", "Rg / d"
    );
    println!("{}", "-".repeat(52));

    for step in 0..total_steps {
        let obs = ensemble.advance_one_step();
        energy.push(obs.total_energy);
        if step >= warmup {
            temperature.push(obs.temperature);
        }

        if step % report_every == 0 {
            let e = energy.take_mean().unwrap_or(obs.total_energy);
            let t = temperature
                .take_mean()
                .map(|t| format!("{:9.2}", t))
                .unwrap_or_else(|| format!("{:>9}", "-"));
            println!(
                "{:>6} | {:>4} | {:+13.5e} | {} | {:8.3}",
                step,
                obs.particle_count,
                e,
                t,
                radius_of_gyration(&ensemble) / d
            );
        }

        if ensemble.phase() == Phase::Depleted {
            println!("All particles evaporated at step {}", step);
            break;
        }
    }

    println!();
    println!(
        "Evaporated {} of {} particles; final T = {:.2} K ({:.2} °C)",
        ensemble.evaporated_count(),
        ensemble.initial_count(),
        ensemble.temperature(),
        ensemble.observables().temperature_celsius()
    );
}
