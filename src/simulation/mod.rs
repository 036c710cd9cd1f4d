use std::fmt;

pub mod queue;
pub mod light;
pub mod lane;
pub mod intersection;
pub mod controller;
pub mod stepper;
pub mod metrics;
pub mod timing;

pub use queue::*;
pub use light::*;
pub use lane::*;
pub use intersection::*;
pub use controller::*;
pub use stepper::*;
pub use metrics::*;
pub use timing::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

/// A vehicle waiting at the junction. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    id: VehicleId,
    priority: bool,
    source_lane: Option<String>,
}

impl Vehicle {
    pub fn new(id: u64) -> Self {
        Self {
            id: VehicleId(id),
            priority: false,
            source_lane: None,
        }
    }

    /// A vehicle that jumps to the head of the priority lane.
    pub fn priority(id: u64) -> Self {
        Self {
            priority: true,
            ..Self::new(id)
        }
    }

    pub fn with_source_lane(mut self, lane: impl Into<String>) -> Self {
        self.source_lane = Some(lane.into());
        self
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn is_priority(&self) -> bool {
        self.priority
    }

    pub fn source_lane(&self) -> Option<&str> {
        self.source_lane.as_deref()
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.priority {
            write!(f, "{}*", self.id)
        } else {
            write!(f, "{}", self.id)
        }
    }
}

/// A vehicle released by a lane during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedVehicle {
    pub road_id: String,
    pub lane_id: String,
    pub vehicle: Vehicle,
}

/// Outcome of one `Simulation::step`.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick: u64,
    pub mode: ControlMode,
    /// Lane id holding the controlled green after this tick.
    pub current_green: Option<String>,
    pub green_duration: u32,
    /// True when the controller switched its green lane this tick.
    pub phase_changed: bool,
    pub served: Vec<ServedVehicle>,
}
