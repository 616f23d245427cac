//! Droplet simulation command-line interface
//!
//! Runs a single 2D Lennard-Jones droplet until it evaporates or the step
//! budget is spent, or sweeps the initial lattice period and records how many
//! particles each droplet loses.

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use droplet_md::config::{Args, MdConfig};
use droplet_md::output::{report_constants, report_step, report_summary, report_sweep, setup_output};
use droplet_md::{Ensemble, Phase, ResultLog, WindowAverage};
use tracing::info;

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_output(args.output.as_ref());

    let config = load_config(&args)?;
    report_constants(&config.constants);

    if args.research {
        run_research(&args, &config)
    } else {
        run_single(&config)
    }
}

fn load_config(args: &Args) -> Result<MdConfig> {
    let mut config = match &args.config_file {
        Some(path) => {
            info!("Reading configuration from: {}", path);
            MdConfig::from_file(path)
                .wrap_err_with(|| format!("Unable to load configuration file: {}", path))?
        }
        None => {
            info!("No configuration file given, using argon defaults");
            MdConfig::default()
        }
    };

    if let Some(n) = args.particles {
        info!("Overriding particle count with: {}", n);
        config.ensemble.particle_count = n;
    }
    if let Some(steps) = args.steps {
        info!("Overriding steps with: {}", steps);
        config.run.steps = steps;
    }
    if let Some(interval) = args.report_interval {
        config.run.report_interval = interval;
    }
    if let Some(seed) = args.seed {
        config.ensemble.seed = Some(seed);
    }

    config.validate().wrap_err("Invalid configuration")?;
    Ok(config)
}

fn run_single(config: &MdConfig) -> Result<()> {
    let mut ensemble = Ensemble::new(config.ensemble.clone(), config.constants)
        .wrap_err("Failed to build the ensemble")?;
    info!(
        "Ensemble ready: {} particles, a = {:.4e} m, b = {:.4e} m, dt = {:.3e} s",
        ensemble.particle_count(),
        config.ensemble.a,
        config.ensemble.b,
        ensemble.dt()
    );

    let run = &config.run;
    let mut energy = WindowAverage::new();
    let mut temperature = WindowAverage::new();

    for frame in 0..run.steps {
        let obs = ensemble.advance_one_step();
        energy.push(obs.total_energy);
        temperature.push(obs.temperature_celsius());

        if frame == 0 {
            info!("Initial potential energy: {:+.6e} J", obs.potential_energy);
        }

        if frame % run.report_interval == 0 {
            let mean_energy = energy.take_mean().unwrap_or(obs.total_energy);
            let mean_temperature = temperature.take_mean();
            let shown = if frame >= run.warmup_steps {
                mean_temperature
            } else {
                None
            };
            report_step(ensemble.step_count(), &obs, mean_energy, shown);
        }

        if ensemble.phase() == Phase::Depleted {
            info!("All particles evaporated at step {}", ensemble.step_count());
            break;
        }
    }

    report_summary(&ensemble);
    Ok(())
}

fn run_research(args: &Args, config: &MdConfig) -> Result<()> {
    let mut sweep = config.sweep();
    if let Some(n) = args.particles {
        sweep.particle_count = n;
    }
    if let Some(steps) = args.steps {
        sweep.steps = steps;
    }
    if let Some(seed) = args.seed {
        sweep.seed = Some(seed);
    }

    let records = sweep
        .run(config.constants)
        .wrap_err("Evaporation sweep failed")?;
    report_sweep(&records);

    let log = ResultLog::new(&args.result_log);
    log.append_all(&records)
        .wrap_err_with(|| format!("Unable to append to result log: {}", args.result_log))?;
    info!("Appended {} records to {}", records.len(), log.path().display());
    Ok(())
}
