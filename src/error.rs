use thiserror::Error;

use crate::simulation::VehicleId;

/// Errors raised by the junction core.
///
/// An empty queue is not an error: `dequeue`, `peek` and `process_vehicle`
/// return `None` for it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("unknown road '{road}' or lane '{lane}'")]
    UnknownLaneOrRoad { road: String, lane: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("vehicle {0} is already waiting at the junction")]
    DuplicateVehicle(VehicleId),
}

impl SimError {
    pub(crate) fn unknown(road: &str, lane: &str) -> Self {
        SimError::UnknownLaneOrRoad {
            road: road.to_string(),
            lane: lane.to_string(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SimError::InvalidConfiguration(message.into())
    }
}
