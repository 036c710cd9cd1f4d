use super::{
    ControlMode, Intersection, IntersectionController, LightState, TickReport, Vehicle,
};
use crate::config::{IntersectionConfig, SignalTiming};
use crate::error::SimError;

/// Discrete simulation time.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    tick: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self) {
        self.tick += 1;
    }

    /// Ticks completed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

/// A junction together with its controller, advanced one tick at a time.
///
/// Arrivals go through `enqueue_vehicle` between calls to `step`; holding
/// `&mut self` for the whole step keeps them from landing mid-decision.
#[derive(Debug, Clone)]
pub struct Simulation {
    intersection: Intersection,
    controller: IntersectionController,
    clock: Clock,
}

impl Simulation {
    pub fn new(config: &IntersectionConfig, timing: SignalTiming) -> Result<Self, SimError> {
        timing.check()?;
        Ok(Self {
            intersection: Intersection::new(config)?,
            controller: IntersectionController::new(timing),
            clock: Clock::new(),
        })
    }

    /// The canonical four-road junction with default timing.
    pub fn with_defaults() -> Result<Self, SimError> {
        Self::new(&IntersectionConfig::default(), SignalTiming::default())
    }

    pub fn enqueue_vehicle(
        &mut self,
        road_id: &str,
        lane_id: &str,
        vehicle: Vehicle,
    ) -> Result<(), SimError> {
        self.intersection.enqueue_vehicle(road_id, lane_id, vehicle)
    }

    /// Controller update, then one release attempt per lane, then the light
    /// timers and the clock.
    pub fn step(&mut self) -> TickReport {
        let phase_changed = self.controller.update(&mut self.intersection);
        let served = self.intersection.serve();
        self.intersection.hold_lights();
        self.clock.advance();

        TickReport {
            tick: self.clock.tick(),
            mode: self.controller.mode(),
            current_green: self.current_green().map(|(_, lane)| lane.to_string()),
            green_duration: self.controller.green_duration(),
            phase_changed,
            served,
        }
    }

    pub fn queue_size(&self, road_id: &str, lane_id: &str) -> Result<usize, SimError> {
        self.intersection.queue_size(road_id, lane_id)
    }

    pub fn light_state(&self, road_id: &str, lane_id: &str) -> Result<LightState, SimError> {
        self.intersection.light_state(road_id, lane_id)
    }

    /// `(road id, lane id)` of the controlled green lane.
    pub fn current_green(&self) -> Option<(&str, &str)> {
        self.controller.current_green().map(|addr| {
            (
                self.intersection.roads()[addr.road].id(),
                self.intersection.lane_at(addr).id(),
            )
        })
    }

    pub fn mode(&self) -> ControlMode {
        self.controller.mode()
    }

    pub fn priority_mode(&self) -> bool {
        self.controller.priority_mode()
    }

    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    pub fn total_queued(&self) -> usize {
        self.intersection.total_queued()
    }

    pub fn intersection(&self) -> &Intersection {
        &self.intersection
    }

    pub fn controller(&self) -> &IntersectionController {
        &self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_counts_steps() {
        let mut sim = Simulation::with_defaults().unwrap();
        assert_eq!(sim.tick(), 0);
        assert_eq!(sim.current_green(), None);

        let report = sim.step();
        assert_eq!(report.tick, 1);
        assert_eq!(sim.tick(), 1);
        assert!(report.phase_changed);
        assert_eq!(sim.current_green(), Some(("A", "AL2")));
    }

    #[test]
    fn served_vehicles_are_reported_with_their_lane() {
        let mut sim = Simulation::with_defaults().unwrap();
        sim.enqueue_vehicle("A", "AL2", Vehicle::new(1)).unwrap();
        sim.enqueue_vehicle("B", "BL2", Vehicle::new(2)).unwrap();

        let report = sim.step();
        assert_eq!(report.served.len(), 1);
        assert_eq!(report.served[0].road_id, "A");
        assert_eq!(report.served[0].lane_id, "AL2");
        assert_eq!(report.served[0].vehicle.id().0, 1);
        assert_eq!(sim.queue_size("B", "BL2"), Ok(1));
    }

    #[test]
    fn bad_timing_is_rejected_at_construction() {
        let timing = SignalTiming {
            min_green: 0,
            ..Default::default()
        };
        let err = Simulation::new(&IntersectionConfig::default(), timing).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration(_)));
    }

    #[test]
    fn light_timers_count_ticks_in_the_current_state() {
        let mut sim = Simulation::with_defaults().unwrap();
        for id in 0..11 {
            sim.enqueue_vehicle("A", "AL2", Vehicle::new(id)).unwrap();
        }

        // priority mode re-asserts the same green every tick
        for _ in 0..3 {
            sim.step();
        }
        assert!(sim.priority_mode());
        let lane = sim.intersection().lane("A", "AL2").unwrap();
        assert_eq!(lane.light().timer(), 3);
        assert_eq!(lane.light().green_duration(), 180);
        assert_eq!(sim.intersection().lane("B", "BL2").unwrap().light().timer(), 3);
    }

    #[test]
    fn light_timers_restart_on_a_phase_change() {
        let mut sim = Simulation::with_defaults().unwrap();
        for _ in 0..51 {
            sim.step();
        }
        assert_eq!(sim.current_green(), Some(("A", "AL2")));
        assert_eq!(sim.intersection().lane("A", "AL2").unwrap().light().timer(), 51);

        let report = sim.step();
        assert!(report.phase_changed);
        assert_eq!(sim.current_green(), Some(("B", "BL2")));
        assert_eq!(sim.intersection().lane("A", "AL2").unwrap().light().timer(), 1);
        assert_eq!(sim.intersection().lane("B", "BL2").unwrap().light().timer(), 1);
    }
}
