//! Command-line argument parsing for droplet simulations

use clap::Parser;

/// 2D Lennard-Jones droplet simulation with optional YAML configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file (built-in argon defaults if absent)
    #[arg(short, long)]
    pub config_file: Option<String>,

    /// Override output file: (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override number of particles (must be a perfect square)
    #[arg(long)]
    pub particles: Option<usize>,

    /// Override number of time steps
    #[arg(long)]
    pub steps: Option<usize>,

    /// Override reporting interval in steps
    #[arg(long)]
    pub report_interval: Option<usize>,

    /// Override random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run the evaporation sweep instead of a single simulation
    #[arg(long)]
    pub research: bool,

    /// File the sweep results are appended to
    #[arg(long, default_value = "research.txt")]
    pub result_log: String,
}
