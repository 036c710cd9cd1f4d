use std::collections::{BTreeMap, HashMap};

use super::{ControlMode, TickReport, Vehicle, VehicleId};

/// Running totals fed by arrivals and tick reports.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    arrived: u64,
    served: u64,
    served_per_lane: BTreeMap<String, u64>,
    arrival_ticks: HashMap<VehicleId, u64>,
    total_wait: u64,
    peak_queued: usize,
    priority_entries: u64,
    phase_changes: u64,
    last_mode: Option<ControlMode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    pub arrived: u64,
    pub served: u64,
    pub served_per_lane: BTreeMap<String, u64>,
    pub average_wait: f64,
    pub peak_queued: usize,
    pub priority_entries: u64,
    pub phase_changes: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// `tick` is the number of completed ticks when the vehicle arrived.
    pub fn record_arrival(&mut self, tick: u64, vehicle: &Vehicle) {
        self.arrived += 1;
        self.arrival_ticks.insert(vehicle.id(), tick);
    }

    pub fn record(&mut self, report: &TickReport) {
        for served in &report.served {
            self.served += 1;
            *self
                .served_per_lane
                .entry(served.lane_id.clone())
                .or_insert(0) += 1;

            if let Some(arrived) = self.arrival_ticks.remove(&served.vehicle.id()) {
                self.total_wait += report.tick.saturating_sub(arrived);
            }
        }

        if report.mode == ControlMode::Priority && self.last_mode != Some(ControlMode::Priority) {
            self.priority_entries += 1;
        }
        self.last_mode = Some(report.mode);

        if report.phase_changed {
            self.phase_changes += 1;
        }
    }

    /// Tracks the largest total backlog seen.
    pub fn observe_queued(&mut self, queued: usize) {
        self.peak_queued = self.peak_queued.max(queued);
    }

    pub fn total_served(&self) -> u64 {
        self.served
    }

    pub fn summary(&self) -> MetricsSummary {
        let average_wait = if self.served == 0 {
            0.0
        } else {
            self.total_wait as f64 / self.served as f64
        };

        MetricsSummary {
            arrived: self.arrived,
            served: self.served,
            served_per_lane: self.served_per_lane.clone(),
            average_wait,
            peak_queued: self.peak_queued,
            priority_entries: self.priority_entries,
            phase_changes: self.phase_changes,
        }
    }
}
