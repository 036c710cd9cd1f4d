use crate::simulation::Vehicle;
use anyhow::Result;

pub mod random;
pub mod scripted;

pub use random::*;
pub use scripted::*;

/// A vehicle bound for a specific lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    pub road_id: String,
    pub lane_id: String,
    pub vehicle: Vehicle,
}

pub trait ArrivalSource {
    /// Vehicles arriving before tick `tick` is stepped.
    fn next_arrivals(&mut self, tick: u64) -> Result<Vec<Arrival>>;
    fn name(&self) -> &'static str;
    /// True once the source will never produce another vehicle.
    fn is_exhausted(&self) -> bool;
}

#[derive(Debug)]
pub enum ArrivalGenerator {
    Random(RandomArrivals),
    Scripted(ScriptedArrivals),
}

impl ArrivalSource for ArrivalGenerator {
    fn next_arrivals(&mut self, tick: u64) -> Result<Vec<Arrival>> {
        match self {
            ArrivalGenerator::Random(source) => source.next_arrivals(tick),
            ArrivalGenerator::Scripted(source) => source.next_arrivals(tick),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ArrivalGenerator::Random(source) => source.name(),
            ArrivalGenerator::Scripted(source) => source.name(),
        }
    }

    fn is_exhausted(&self) -> bool {
        match self {
            ArrivalGenerator::Random(source) => source.is_exhausted(),
            ArrivalGenerator::Scripted(source) => source.is_exhausted(),
        }
    }
}
