use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};
use super::Validate;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArrivalsConfig {
    pub seed: Option<u64>,
    /// Mean number of random arrivals per tick.
    pub rate_per_tick: f64,
    /// Chance that a random arrival is flagged as a priority vehicle.
    pub priority_probability: f64,
    /// Lane ids that receive random arrivals; empty means every lane that
    /// can turn green under the junction's phase scope.
    pub lanes: Vec<String>,
    /// Vehicles released per tick from a vehicle file.
    pub per_tick: usize,
}

impl Default for ArrivalsConfig {
    fn default() -> Self {
        Self {
            seed: None,
            rate_per_tick: 0.5,
            priority_probability: 0.05,
            lanes: Vec::new(),
            per_tick: 1,
        }
    }
}

impl Validate for ArrivalsConfig {
    fn validate(&self) -> Result<()> {
        if !self.rate_per_tick.is_finite() || self.rate_per_tick < 0.0 {
            return Err(anyhow!("Arrival rate must be a non-negative number, got {}", self.rate_per_tick));
        }

        if !(0.0..=1.0).contains(&self.priority_probability) {
            return Err(anyhow!("Priority probability must be in range [0, 1]"));
        }

        if self.per_tick == 0 {
            return Err(anyhow!("Scripted arrivals per tick must be greater than zero"));
        }

        Ok(())
    }
}
