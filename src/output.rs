//! Logging setup and run reporting

use crate::constants::PhysicalConstants;
use crate::ensemble::Ensemble;
use crate::observables::Observables;
use crate::research::EvaporationRecord;
use std::fmt;
use std::fs::File;
use std::time::SystemTime as StdSystemTime;
use tracing::info;
use tracing_subscriber::{
    fmt::format::Writer, fmt::layer, fmt::time::FormatTime, layer::SubscriberExt,
    util::SubscriberInitExt, Registry,
};

/// Custom time formatter that shows only seconds
struct SecondPrecisionTimer;

impl FormatTime for SecondPrecisionTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let now = StdSystemTime::now();
        let duration = now
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();

        let total_seconds = duration.as_secs();
        let hours = (total_seconds / 3600) % 24;
        let minutes = (total_seconds / 60) % 60;
        let seconds = total_seconds % 60;

        write!(w, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Setup output logging to file or stdout
pub fn setup_output(output_path: Option<&String>) {
    match output_path {
        Some(path) => {
            if let Ok(log) = File::create(path) {
                let file_layer = layer()
                    .with_writer(log)
                    .with_timer(SecondPrecisionTimer)
                    .with_ansi(false);
                Registry::default().with(file_layer).init();
                info!("Output will be written to: {}", path);
            } else {
                eprintln!("Could not create output file: {}", path);
            }
        }
        None => {
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(SecondPrecisionTimer)
                .with_ansi(true);
            Registry::default().with(stdout_layer).init();
        }
    }
}

pub fn report_constants(constants: &PhysicalConstants) {
    info!("Simulation parameters:");
    info!("  Particle mass:    {:.6e} kg", constants.particle_mass);
    info!("  Particle radius:  {:.6e} m", constants.particle_radius());
    info!("  Cell length:      {:.6e} m", constants.cell_length);
    info!(
        "  Cell range:       [{:.6e}; {:.6e}] m",
        constants.cell_min(),
        constants.cell_max()
    );
    info!(
        "  Cutoff radii:     R1 = {:.6e} m, R2 = {:.6e} m",
        constants.cutoff_inner, constants.cutoff_outer
    );
}

pub fn report_step(step: u64, obs: &Observables, mean_energy: f64, mean_temperature: Option<f64>) {
    match mean_temperature {
        Some(t) => info!(
            "Step {:>6}: N = {:>4}, <E> = {:+.6e} J, <T> = {:.2} °C",
            step, obs.particle_count, mean_energy, t
        ),
        None => info!(
            "Step {:>6}: N = {:>4}, <E> = {:+.6e} J",
            step, obs.particle_count, mean_energy
        ),
    }
}

pub fn report_summary(ensemble: &Ensemble) {
    let obs = ensemble.observables();
    info!("Run finished after {} steps", ensemble.step_count());
    info!("  Particles left:   {}", ensemble.particle_count());
    info!("  Evaporated:       {}", ensemble.evaporated_count());
    info!("  Kinetic energy:   {:+.6e} J", obs.kinetic_energy);
    info!("  Potential energy: {:+.6e} J", obs.potential_energy);
    info!("  Total energy:     {:+.6e} J", obs.total_energy);
    info!(
        "  Temperature:      {:.3} K ({:.2} °C)",
        obs.temperature,
        obs.temperature_celsius()
    );
}

pub fn report_sweep(records: &[EvaporationRecord]) {
    info!("Evaporation sweep results:");
    for record in records {
        info!(
            "  b = {:.4e} m  <T> = {:>9.3} K  evaporated = {}",
            record.b, record.temperature, record.evaporated
        );
    }
}
