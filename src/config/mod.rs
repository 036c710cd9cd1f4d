use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod junction;
pub mod demand;

pub use junction::*;
pub use demand::*;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub intersection: IntersectionConfig,
    #[serde(default)]
    pub timing: SignalTiming,
    #[serde(default)]
    pub arrivals: ArrivalsConfig,
}

impl SimulationConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file '{}'", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in '{}'", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;

        // Validate configurations
        config.validate()?;

        Ok(config)
    }
}

impl Validate for SimulationConfig {
    fn validate(&self) -> Result<()> {
        self.intersection.validate()?;
        self.timing.validate()?;
        self.arrivals.validate()?;

        // Arrival lanes must name lanes of this junction
        let known = self.intersection.lane_ids();
        for lane in &self.arrivals.lanes {
            if !known.iter().any(|id| id == lane) {
                anyhow::bail!("Arrival lane '{}' does not exist in the junction layout", lane);
            }
        }

        Ok(())
    }
}

pub trait Validate {
    fn validate(&self) -> Result<()>;
}
