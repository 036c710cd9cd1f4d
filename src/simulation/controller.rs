//! Signal scheduling for the junction.
//!
//! Two modes:
//!
//! - **Normal**: roads take turns in fixed order. Each turn lights the
//!   road's representative lane (or the whole road, per `PhaseScope`) for
//!   `max(queued * per_vehicle_green, min_green)` ticks, sized from the
//!   representative lane when the turn starts.
//! - **Priority**: entered when the priority lane holds more than
//!   `priority_enter_threshold` vehicles. The priority lane alone is green,
//!   re-asserted every tick, until it drops below `priority_exit_threshold`.
//!   Normal mode then resumes at the road whose turn was interrupted.
//!
//! Lights are only ever set by whole-junction assignment ("these green, all
//! others red"), so after every update the green lanes belong to one road,
//! and in priority mode the priority lane is the only green.

use std::fmt;

use log::{debug, info};

use super::{Intersection, LaneAddr};
use crate::config::SignalTiming;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    Normal,
    Priority,
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlMode::Normal => write!(f, "NORMAL"),
            ControlMode::Priority => write!(f, "PRIORITY"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntersectionController {
    timing: SignalTiming,
    mode: ControlMode,
    round_robin_index: usize,
    green_timer: u32,
    green_duration: u32,
    current_green: Option<LaneAddr>,
}

impl IntersectionController {
    pub fn new(timing: SignalTiming) -> Self {
        Self {
            timing,
            mode: ControlMode::Normal,
            round_robin_index: 0,
            green_timer: 0,
            green_duration: timing.min_green,
            current_green: None,
        }
    }

    pub fn timing(&self) -> &SignalTiming {
        &self.timing
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn priority_mode(&self) -> bool {
        self.mode == ControlMode::Priority
    }

    pub fn round_robin_index(&self) -> usize {
        self.round_robin_index
    }

    pub fn green_timer(&self) -> u32 {
        self.green_timer
    }

    pub fn green_duration(&self) -> u32 {
        self.green_duration
    }

    /// Lane holding the controlled green; `None` until the first update.
    pub fn current_green(&self) -> Option<LaneAddr> {
        self.current_green
    }

    /// Runs one tick of scheduling. Returns true when the green lane changed.
    pub fn update(&mut self, intersection: &mut Intersection) -> bool {
        let before = self.current_green;
        let waiting = intersection.priority_lane().queue_size();

        match self.mode {
            ControlMode::Normal if waiting > self.timing.priority_enter_threshold => {
                info!(
                    "Priority lane {} holds {} vehicles, entering priority mode",
                    intersection.priority_lane().id(),
                    waiting
                );
                self.mode = ControlMode::Priority;
            }
            ControlMode::Priority if waiting < self.timing.priority_exit_threshold => {
                info!(
                    "Priority lane {} down to {} vehicles, resuming round-robin at road {}",
                    intersection.priority_lane().id(),
                    waiting,
                    intersection.roads()[self.round_robin_index].id()
                );
                self.mode = ControlMode::Normal;
                self.activate_normal_road(intersection);
                return before != self.current_green;
            }
            _ => {}
        }

        match self.mode {
            ControlMode::Priority => self.activate_priority_lane(intersection),
            ControlMode::Normal if self.current_green.is_none() => {
                self.activate_normal_road(intersection)
            }
            ControlMode::Normal => {
                self.green_timer += 1;
                if self.green_timer > self.green_duration {
                    self.round_robin_index =
                        (self.round_robin_index + 1) % intersection.num_roads();
                    self.activate_normal_road(intersection);
                }
            }
        }

        before != self.current_green
    }

    fn activate_priority_lane(&mut self, intersection: &mut Intersection) {
        let target = intersection.priority_addr();
        self.green_duration = self
            .timing
            .green_duration_for(intersection.lane_at(target).queue_size());
        self.green_timer = 0;
        self.current_green = Some(target);
        intersection.activate_lane(target, self.green_duration);
    }

    fn activate_normal_road(&mut self, intersection: &mut Intersection) {
        let target = intersection.representative(self.round_robin_index);
        self.green_duration = self
            .timing
            .green_duration_for(intersection.lane_at(target).queue_size());
        self.green_timer = 0;
        self.current_green = Some(target);
        intersection.activate_road(target.road, self.green_duration);

        debug!(
            "Road {} green on {} for {} ticks",
            intersection.roads()[target.road].id(),
            intersection.lane_at(target).id(),
            self.green_duration
        );
    }
}
