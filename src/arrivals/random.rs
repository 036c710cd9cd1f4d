use super::{Arrival, ArrivalSource};
use crate::config::ArrivalsConfig;
use crate::simulation::{Intersection, Vehicle};
use anyhow::{anyhow, Result};
use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Poisson};

/// Poisson arrivals spread uniformly over a set of lanes.
#[derive(Debug)]
pub struct RandomArrivals {
    targets: Vec<(String, String)>,
    arrivals_per_tick: Option<Poisson<f64>>,
    priority_probability: f64,
    next_vehicle_id: u64,
    rng: StdRng,
}

impl RandomArrivals {
    pub fn new(config: &ArrivalsConfig, intersection: &Intersection) -> Result<Self> {
        let targets = if config.lanes.is_empty() {
            intersection.servable_lane_ids()
        } else {
            let targets = config
                .lanes
                .iter()
                .map(|lane| {
                    intersection
                        .road_of_lane(lane)
                        .map(|road| (road.to_string(), lane.clone()))
                        .ok_or_else(|| anyhow!("Arrival lane '{}' is not part of the junction", lane))
                })
                .collect::<Result<Vec<_>>>()?;

            let servable = intersection.servable_lane_ids();
            for target in targets.iter().filter(|t| !servable.contains(t)) {
                warn!(
                    "Arrival lane {} never turns green under {:?} phase scope; its queue will only grow",
                    target.1,
                    intersection.phase_scope()
                );
            }
            targets
        };

        if !(0.0..=1.0).contains(&config.priority_probability) {
            return Err(anyhow!("Priority probability must be in range [0, 1]"));
        }

        let arrivals_per_tick = if config.rate_per_tick > 0.0 {
            let poisson = Poisson::new(config.rate_per_tick)
                .map_err(|e| anyhow!("Invalid arrival rate {}: {}", config.rate_per_tick, e))?;
            Some(poisson)
        } else {
            None
        };

        let rng = if let Some(seed) = config.seed {
            StdRng::seed_from_u64(seed)
        } else {
            StdRng::from_entropy()
        };

        Ok(Self {
            targets,
            arrivals_per_tick,
            priority_probability: config.priority_probability,
            next_vehicle_id: 0,
            rng,
        })
    }

    pub fn targets(&self) -> &[(String, String)] {
        &self.targets
    }
}

impl ArrivalSource for RandomArrivals {
    fn next_arrivals(&mut self, _tick: u64) -> Result<Vec<Arrival>> {
        let Some(poisson) = self.arrivals_per_tick.as_ref() else {
            return Ok(Vec::new());
        };
        if self.targets.is_empty() {
            return Ok(Vec::new());
        }

        let count = poisson.sample(&mut self.rng) as usize;
        let mut arrivals = Vec::with_capacity(count);

        for _ in 0..count {
            let (road_id, lane_id) = &self.targets[self.rng.gen_range(0..self.targets.len())];
            let id = self.next_vehicle_id;
            self.next_vehicle_id += 1;

            let vehicle = if self.rng.gen_bool(self.priority_probability) {
                Vehicle::priority(id)
            } else {
                Vehicle::new(id)
            };

            arrivals.push(Arrival {
                road_id: road_id.clone(),
                lane_id: lane_id.clone(),
                vehicle: vehicle.with_source_lane(lane_id.clone()),
            });
        }

        Ok(arrivals)
    }

    fn name(&self) -> &'static str {
        "random"
    }

    fn is_exhausted(&self) -> bool {
        false
    }
}
