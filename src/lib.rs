pub mod config;
pub mod simulation;
pub mod arrivals;
pub mod error;

pub use simulation::*;
pub use config::*;
pub use error::SimError;
