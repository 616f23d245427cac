pub mod config;
pub mod constants;
pub mod ensemble;
pub mod error;
pub mod lattice;
pub mod lj_pot;
pub mod observables;
pub mod output;
pub mod particle;
pub mod research;
pub mod run_md;

pub use constants::PhysicalConstants;
pub use ensemble::{Ensemble, EnsembleSettings, Phase};
pub use error::{Error, Result};
pub use lj_pot::LennardJones;
pub use observables::{Observables, WindowAverage};
pub use particle::Particle;
pub use research::{EvaporationRecord, EvaporationSweep, ResultLog};
pub use run_md::{ForceField, ForceProvider, VelocityVerlet};
