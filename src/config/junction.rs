use serde::{Deserialize, Serialize};
use anyhow::Result;
use super::Validate;
use crate::error::SimError;

/// Role of a lane within its road.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneKind {
    General,
    /// May be designated the junction's priority lane.
    PriorityCapable,
    /// Always flowing; never switched by the controller.
    FreeTurn,
}

/// Which lanes of the active road turn green during a round-robin turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseScope {
    /// Only the representative lane.
    #[default]
    Lane,
    /// Every controlled lane of the road.
    Road,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IntersectionConfig {
    /// Road ids in round-robin order.
    #[serde(default = "default_roads")]
    pub roads: Vec<String>,
    /// Lane layout shared by every road, first lane first.
    #[serde(default = "default_lanes")]
    pub lanes: Vec<LaneKind>,
    /// 1-based lane number that receives green when its road is active.
    #[serde(default = "default_representative_lane")]
    pub representative_lane: usize,
    /// Id of the single lane eligible for priority preemption.
    #[serde(default = "default_priority_lane")]
    pub priority_lane: String,
    #[serde(default)]
    pub phase_scope: PhaseScope,
}

fn default_roads() -> Vec<String> {
    ["A", "B", "C", "D"].iter().map(|r| r.to_string()).collect()
}

fn default_lanes() -> Vec<LaneKind> {
    vec![LaneKind::General, LaneKind::PriorityCapable, LaneKind::General]
}

fn default_representative_lane() -> usize {
    2
}

fn default_priority_lane() -> String {
    "AL2".to_string()
}

impl Default for IntersectionConfig {
    fn default() -> Self {
        Self {
            roads: default_roads(),
            lanes: default_lanes(),
            representative_lane: default_representative_lane(),
            priority_lane: default_priority_lane(),
            phase_scope: PhaseScope::default(),
        }
    }
}

/// Builds the id of lane `number` (1-based) on `road`, e.g. `AL2`.
pub fn lane_id(road: &str, number: usize) -> String {
    format!("{}L{}", road, number)
}

impl IntersectionConfig {
    /// Every lane id in road order.
    pub fn lane_ids(&self) -> Vec<String> {
        self.roads
            .iter()
            .flat_map(|road| (1..=self.lanes.len()).map(move |n| lane_id(road, n)))
            .collect()
    }

    /// Resolves a lane id to `(road index, lane index)`.
    pub fn locate(&self, id: &str) -> Option<(usize, usize)> {
        self.roads.iter().enumerate().find_map(|(r, road)| {
            (1..=self.lanes.len())
                .position(|n| lane_id(road, n) == id)
                .map(|l| (r, l))
        })
    }

    /// Structural checks shared by file validation and `Intersection::new`.
    pub fn check(&self) -> Result<(), SimError> {
        if self.roads.is_empty() {
            return Err(SimError::invalid("at least one road must be configured"));
        }

        for (i, road) in self.roads.iter().enumerate() {
            if road.is_empty() {
                return Err(SimError::invalid(format!("road {} has an empty id", i)));
            }
            if self.roads[..i].contains(road) {
                return Err(SimError::invalid(format!("road id '{}' is listed twice", road)));
            }
        }

        if self.lanes.is_empty() {
            return Err(SimError::invalid("each road needs at least one lane"));
        }

        let rep = self.representative_lane;
        if rep == 0 || rep > self.lanes.len() {
            return Err(SimError::invalid(format!(
                "representative lane {} is out of range (1-{})",
                rep,
                self.lanes.len()
            )));
        }
        if self.lanes[rep - 1] == LaneKind::FreeTurn {
            return Err(SimError::invalid(format!(
                "representative lane {} is a free-turn lane",
                rep
            )));
        }

        if self.priority_lane.is_empty() {
            return Err(SimError::invalid("a priority lane must be designated"));
        }
        let (_, lane) = self.locate(&self.priority_lane).ok_or_else(|| {
            SimError::invalid(format!(
                "priority lane '{}' does not exist in the junction layout",
                self.priority_lane
            ))
        })?;
        if self.lanes[lane] != LaneKind::PriorityCapable {
            return Err(SimError::invalid(format!(
                "priority lane '{}' is not a priority-capable lane",
                self.priority_lane
            )));
        }

        Ok(())
    }
}

impl Validate for IntersectionConfig {
    fn validate(&self) -> Result<()> {
        self.check()?;
        Ok(())
    }
}

/// Controller constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SignalTiming {
    /// Priority mode starts once the priority lane holds more than this.
    pub priority_enter_threshold: usize,
    /// Priority mode ends once the priority lane holds fewer than this.
    pub priority_exit_threshold: usize,
    /// Shortest green phase, in ticks.
    pub min_green: u32,
    /// Green ticks granted per queued vehicle when sizing a phase.
    pub per_vehicle_green: u32,
}

impl Default for SignalTiming {
    fn default() -> Self {
        Self {
            priority_enter_threshold: 10,
            priority_exit_threshold: 5,
            min_green: 50,
            per_vehicle_green: 20,
        }
    }
}

impl SignalTiming {
    /// Phase length for a lane holding `queued` vehicles.
    pub fn green_duration_for(&self, queued: usize) -> u32 {
        let queued = u32::try_from(queued).unwrap_or(u32::MAX);
        queued
            .saturating_mul(self.per_vehicle_green)
            .max(self.min_green)
    }

    pub fn check(&self) -> Result<(), SimError> {
        if self.min_green == 0 {
            return Err(SimError::invalid("min_green must be greater than zero"));
        }

        // the exit test is `waiting < exit`, which never holds for zero
        if self.priority_exit_threshold == 0 {
            return Err(SimError::invalid(
                "priority exit threshold must be greater than zero",
            ));
        }

        if self.priority_exit_threshold > self.priority_enter_threshold {
            return Err(SimError::invalid(format!(
                "priority exit threshold {} must not exceed enter threshold {}",
                self.priority_exit_threshold, self.priority_enter_threshold
            )));
        }

        Ok(())
    }
}

impl Validate for SignalTiming {
    fn validate(&self) -> Result<()> {
        self.check()?;
        Ok(())
    }
}
