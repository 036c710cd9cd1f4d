use std::collections::HashSet;

use log::{debug, trace};

use super::{Lane, LightState, Road, ServedVehicle, Vehicle, VehicleId};
use crate::config::{lane_id, IntersectionConfig, PhaseScope};
use crate::error::SimError;

/// Position of a lane inside an `Intersection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LaneAddr {
    pub road: usize,
    pub lane: usize,
}

/// The roads meeting at the junction plus the vehicles waiting on them.
#[derive(Debug, Clone)]
pub struct Intersection {
    roads: Vec<Road>,
    priority_lane: LaneAddr,
    representative_lane: usize,
    phase_scope: PhaseScope,
    /// Ids of vehicles currently waiting in some queue.
    queued_ids: HashSet<VehicleId>,
}

impl Intersection {
    pub fn new(config: &IntersectionConfig) -> Result<Self, SimError> {
        if let Err(err) = config.check() {
            debug!("Rejected junction layout: {}", err);
            return Err(err);
        }

        let (road, lane) = config.locate(&config.priority_lane).ok_or_else(|| {
            SimError::invalid(format!("priority lane '{}' not found", config.priority_lane))
        })?;
        let priority_lane = LaneAddr { road, lane };

        let roads = config
            .roads
            .iter()
            .enumerate()
            .map(|(r, road_id)| {
                let lanes = config
                    .lanes
                    .iter()
                    .enumerate()
                    .map(|(l, kind)| {
                        let is_priority = priority_lane == LaneAddr { road: r, lane: l };
                        Lane::new(lane_id(road_id, l + 1), *kind, is_priority)
                    })
                    .collect();
                Road::new(road_id.clone(), lanes)
            })
            .collect();

        Ok(Self {
            roads,
            priority_lane,
            representative_lane: config.representative_lane - 1,
            phase_scope: config.phase_scope,
            queued_ids: HashSet::new(),
        })
    }

    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    pub fn num_roads(&self) -> usize {
        self.roads.len()
    }

    pub fn road(&self, road_id: &str) -> Option<&Road> {
        self.roads.iter().find(|road| road.id() == road_id)
    }

    pub fn lane(&self, road_id: &str, lane_id: &str) -> Result<&Lane, SimError> {
        self.road(road_id)
            .and_then(|road| road.lane(lane_id))
            .ok_or_else(|| SimError::unknown(road_id, lane_id))
    }

    fn lane_mut(&mut self, road_id: &str, lane_id: &str) -> Result<&mut Lane, SimError> {
        self.roads
            .iter_mut()
            .find(|road| road.id() == road_id)
            .and_then(|road| road.lane_mut(lane_id))
            .ok_or_else(|| SimError::unknown(road_id, lane_id))
    }

    pub fn lane_at(&self, addr: LaneAddr) -> &Lane {
        &self.roads[addr.road].lanes()[addr.lane]
    }

    pub fn priority_addr(&self) -> LaneAddr {
        self.priority_lane
    }

    pub fn priority_lane(&self) -> &Lane {
        self.lane_at(self.priority_lane)
    }

    /// The lane that turns green when road `road` holds the round-robin turn.
    pub fn representative(&self, road: usize) -> LaneAddr {
        LaneAddr {
            road,
            lane: self.representative_lane,
        }
    }

    /// Road id owning `lane_id`, if any.
    pub fn road_of_lane(&self, lane_id: &str) -> Option<&str> {
        self.roads
            .iter()
            .find(|road| road.lane(lane_id).is_some())
            .map(Road::id)
    }

    /// `(road id, lane id)` for every lane, in road order.
    pub fn lane_ids(&self) -> Vec<(String, String)> {
        self.roads
            .iter()
            .flat_map(|road| {
                road.lanes()
                    .iter()
                    .map(move |lane| (road.id().to_string(), lane.id().to_string()))
            })
            .collect()
    }

    /// True when the lane can ever release vehicles: free-turn lanes, the
    /// priority lane, and whatever a round-robin turn lights under the
    /// current `PhaseScope`.
    pub fn can_turn_green(&self, addr: LaneAddr) -> bool {
        !self.lane_at(addr).is_controlled()
            || addr == self.priority_lane
            || match self.phase_scope {
                PhaseScope::Lane => addr.lane == self.representative_lane,
                PhaseScope::Road => true,
            }
    }

    /// `(road id, lane id)` for every lane that `can_turn_green`.
    pub fn servable_lane_ids(&self) -> Vec<(String, String)> {
        self.addrs()
            .filter(|addr| self.can_turn_green(*addr))
            .map(|addr| {
                (
                    self.roads[addr.road].id().to_string(),
                    self.lane_at(addr).id().to_string(),
                )
            })
            .collect()
    }

    /// Queues an arriving vehicle on the named lane.
    pub fn enqueue_vehicle(
        &mut self,
        road_id: &str,
        lane_id: &str,
        vehicle: Vehicle,
    ) -> Result<(), SimError> {
        let id = vehicle.id();
        if self.queued_ids.contains(&id) {
            return Err(SimError::DuplicateVehicle(id));
        }

        self.lane_mut(road_id, lane_id)?.add_vehicle(vehicle);
        self.queued_ids.insert(id);
        Ok(())
    }

    pub fn queue_size(&self, road_id: &str, lane_id: &str) -> Result<usize, SimError> {
        self.lane(road_id, lane_id).map(Lane::queue_size)
    }

    pub fn light_state(&self, road_id: &str, lane_id: &str) -> Result<LightState, SimError> {
        self.lane(road_id, lane_id).map(Lane::light_state)
    }

    pub fn total_queued(&self) -> usize {
        self.roads.iter().map(Road::queued).sum()
    }

    /// Controller-managed lanes currently showing green.
    pub fn green_lanes(&self) -> Vec<LaneAddr> {
        self.addrs()
            .filter(|addr| {
                let lane = self.lane_at(*addr);
                lane.is_controlled() && lane.light().is_green()
            })
            .collect()
    }

    pub fn phase_scope(&self) -> PhaseScope {
        self.phase_scope
    }

    /// Gives `target` alone the green.
    pub(crate) fn activate_lane(&mut self, target: LaneAddr, green_duration: u32) {
        self.set_green(|addr| addr == target, green_duration);
    }

    /// Gives road `road` its round-robin green.
    pub(crate) fn activate_road(&mut self, road: usize, green_duration: u32) {
        let representative = self.representative(road);
        match self.phase_scope {
            PhaseScope::Lane => self.set_green(|addr| addr == representative, green_duration),
            PhaseScope::Road => self.set_green(|addr| addr.road == road, green_duration),
        }
    }

    /// Turns the selected lanes green and every other controlled lane red.
    /// Green lights take the phase length; a light already in its target
    /// state keeps its timer.
    fn set_green(&mut self, green: impl Fn(LaneAddr) -> bool, green_duration: u32) {
        for (r, road) in self.roads.iter_mut().enumerate() {
            for (l, lane) in road.lanes_mut().iter_mut().enumerate() {
                if !lane.is_controlled() {
                    continue;
                }
                let light = lane.light_mut();
                let target = if green(LaneAddr { road: r, lane: l }) {
                    light.set_green_duration(green_duration);
                    LightState::Green
                } else {
                    LightState::Red
                };
                if light.state() != target {
                    light.force(target);
                }
            }
        }
    }

    /// Advances every light's timer by one tick. States only change through
    /// `set_green`.
    pub(crate) fn hold_lights(&mut self) {
        for road in &mut self.roads {
            for lane in road.lanes_mut() {
                lane.light_mut().hold();
            }
        }
    }

    /// One release attempt on every lane; red lanes yield nothing.
    pub(crate) fn serve(&mut self) -> Vec<ServedVehicle> {
        let mut served = Vec::new();
        for road in &mut self.roads {
            let road_id = road.id().to_string();
            for lane in road.lanes_mut() {
                if let Some(vehicle) = lane.process_vehicle() {
                    trace!("{} left {} ({} waiting)", vehicle, lane.id(), lane.queue_size());
                    self.queued_ids.remove(&vehicle.id());
                    served.push(ServedVehicle {
                        road_id: road_id.clone(),
                        lane_id: lane.id().to_string(),
                        vehicle,
                    });
                }
            }
        }
        served
    }

    fn addrs(&self) -> impl Iterator<Item = LaneAddr> + '_ {
        self.roads.iter().enumerate().flat_map(|(road, r)| {
            (0..r.lanes().len()).map(move |lane| LaneAddr { road, lane })
        })
    }
}
