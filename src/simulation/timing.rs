use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Wall-clock cost of recent `Simulation::step` calls.
#[derive(Debug)]
pub struct StepTimings {
    samples: VecDeque<Duration>,
    max_samples: usize,
    current_step_start: Option<Instant>,
}

impl StepTimings {
    pub fn new(max_samples: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            current_step_start: None,
        }
    }

    pub fn start_step(&mut self) {
        self.current_step_start = Some(Instant::now());
    }

    pub fn end_step(&mut self) {
        if let Some(start) = self.current_step_start.take() {
            if self.samples.len() >= self.max_samples {
                self.samples.pop_front();
            }
            self.samples.push_back(start.elapsed());
        }
    }

    pub fn average_step_time(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }

        let total: Duration = self.samples.iter().sum();
        total / self.samples.len() as u32
    }

    pub fn last_step_time(&self) -> Duration {
        self.samples.back().copied().unwrap_or(Duration::ZERO)
    }
}
