use super::{LightState, Queue, TrafficLight, Vehicle};
use crate::config::LaneKind;

/// A single approach with its own queue and signal.
#[derive(Debug, Clone)]
pub struct Lane {
    id: String,
    kind: LaneKind,
    is_priority: bool,
    queue: Queue<Vehicle>,
    light: TrafficLight,
}

impl Lane {
    pub fn new(id: impl Into<String>, kind: LaneKind, is_priority: bool) -> Self {
        let mut light = TrafficLight::default();
        if kind == LaneKind::FreeTurn {
            light.force(LightState::Green);
        }

        Self {
            id: id.into(),
            kind,
            is_priority,
            queue: Queue::new(),
            light,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> LaneKind {
        self.kind
    }

    pub fn is_priority(&self) -> bool {
        self.is_priority
    }

    /// Whether the controller switches this lane's light.
    pub fn is_controlled(&self) -> bool {
        self.kind != LaneKind::FreeTurn
    }

    /// Queues a vehicle. Priority vehicles entering the priority lane go to
    /// the head; everything else joins the tail.
    pub fn add_vehicle(&mut self, vehicle: Vehicle) {
        if self.is_priority && vehicle.is_priority() {
            self.queue.enqueue_front(vehicle);
        } else {
            self.queue.enqueue(vehicle);
        }
    }

    /// Releases the head vehicle, but only while the light is green.
    pub fn process_vehicle(&mut self) -> Option<Vehicle> {
        if !self.light.is_green() {
            return None;
        }
        self.queue.dequeue()
    }

    pub fn queue_size(&self) -> usize {
        self.queue.size()
    }

    pub fn queue(&self) -> &Queue<Vehicle> {
        &self.queue
    }

    pub fn light(&self) -> &TrafficLight {
        &self.light
    }

    pub fn light_state(&self) -> LightState {
        self.light.state()
    }

    pub(crate) fn light_mut(&mut self) -> &mut TrafficLight {
        &mut self.light
    }
}

/// Lanes entering the junction from one direction.
#[derive(Debug, Clone)]
pub struct Road {
    id: String,
    lanes: Vec<Lane>,
}

impl Road {
    pub fn new(id: impl Into<String>, lanes: Vec<Lane>) -> Self {
        Self {
            id: id.into(),
            lanes,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub(crate) fn lanes_mut(&mut self) -> &mut [Lane] {
        &mut self.lanes
    }

    pub fn lane(&self, lane_id: &str) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.id == lane_id)
    }

    pub fn lane_mut(&mut self, lane_id: &str) -> Option<&mut Lane> {
        self.lanes.iter_mut().find(|lane| lane.id == lane_id)
    }

    pub fn queued(&self) -> usize {
        self.lanes.iter().map(Lane::queue_size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(lane: &mut Lane) -> Vec<u64> {
        lane.light_mut().force(LightState::Green);
        std::iter::from_fn(|| lane.process_vehicle())
            .map(|v| v.id().0)
            .collect()
    }

    #[test]
    fn general_lane_is_fifo() {
        let mut lane = Lane::new("BL1", LaneKind::General, false);
        for id in 1..=4 {
            lane.add_vehicle(Vehicle::new(id));
        }
        assert_eq!(drain(&mut lane), vec![1, 2, 3, 4]);
    }

    #[test]
    fn priority_vehicles_jump_the_priority_lane() {
        let mut lane = Lane::new("AL2", LaneKind::PriorityCapable, true);
        lane.add_vehicle(Vehicle::new(1));
        lane.add_vehicle(Vehicle::priority(2));
        lane.add_vehicle(Vehicle::priority(3));
        lane.add_vehicle(Vehicle::new(4));

        assert_eq!(drain(&mut lane), vec![3, 2, 1, 4]);
    }

    #[test]
    fn priority_flag_is_ignored_outside_the_priority_lane() {
        // priority-capable but not designated
        let mut lane = Lane::new("BL2", LaneKind::PriorityCapable, false);
        lane.add_vehicle(Vehicle::new(1));
        lane.add_vehicle(Vehicle::priority(2));

        assert_eq!(drain(&mut lane), vec![1, 2]);
    }

    #[test]
    fn red_lane_releases_nothing() {
        let mut lane = Lane::new("CL2", LaneKind::PriorityCapable, false);
        lane.add_vehicle(Vehicle::new(7));

        assert_eq!(lane.light_state(), LightState::Red);
        assert_eq!(lane.process_vehicle(), None);
        assert_eq!(lane.queue_size(), 1);
    }

    #[test]
    fn green_empty_lane_returns_none() {
        let mut lane = Lane::new("DL2", LaneKind::PriorityCapable, false);
        lane.light_mut().force(LightState::Green);

        assert_eq!(lane.process_vehicle(), None);
        assert_eq!(lane.queue_size(), 0);
    }

    #[test]
    fn free_turn_lane_always_flows() {
        let mut lane = Lane::new("AL3", LaneKind::FreeTurn, false);
        assert!(!lane.is_controlled());
        lane.add_vehicle(Vehicle::new(9));
        assert_eq!(lane.process_vehicle().map(|v| v.id().0), Some(9));
    }

    #[test]
    fn road_counts_all_lanes() {
        let mut road = Road::new(
            "A",
            vec![
                Lane::new("AL1", LaneKind::General, false),
                Lane::new("AL2", LaneKind::PriorityCapable, true),
            ],
        );
        road.lane_mut("AL1").unwrap().add_vehicle(Vehicle::new(1));
        road.lane_mut("AL2").unwrap().add_vehicle(Vehicle::new(2));
        road.lane_mut("AL2").unwrap().add_vehicle(Vehicle::new(3));

        assert_eq!(road.queued(), 3);
        assert!(road.lane("AL3").is_none());
    }
}
