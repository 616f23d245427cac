// Evaporation Sweep Example
//
// Runs a shortened version of the evaporation study: droplets of 36 particles
// start from lattices of increasing period b, and for each one the mean
// temperature after warm-up is recorded against the number of particles lost.
// Results are appended to `research.txt` in the system temp directory, one
// `evaporated, temperature` line per run.

use droplet_md::research::EvaporationSweep;
use droplet_md::{PhysicalConstants, ResultLog};

fn main() {
    let sweep = EvaporationSweep {
        particle_count: 36,
        b_steps: 10,
        b_step: 0.05,
        steps: 2000,
        warmup_steps: 200,
        seed: Some(1),
        ..Default::default()
    };

    println!(
        "Sweeping {} lattice periods from {:.2} a to {:.2} a",
        sweep.b_steps + 1,
        sweep.b_start,
        sweep.b_start + sweep.b_steps as f64 * sweep.b_step
    );

    let records = match sweep.run(PhysicalConstants::argon()) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Sweep failed: {e}");
            return;
        }
    };

    println!("{:>12} | {:>10} | {:>10}", "b (m)", "<T> (K)", "evaporated");
    println!("{}", "-".repeat(38));
    for r in &records {
        println!("{:>12.4e} | {:>10.2} | {:>10}", r.b, r.temperature, r.evaporated);
    }

    let log = ResultLog::new(std::env::temp_dir().join("research.txt"));
    match log.append_all(&records) {
        Ok(()) => println!("\nAppended results to {}", log.path().display()),
        Err(e) => eprintln!("\nCould not write {}: {e}", log.path().display()),
    }
}
