use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightState {
    Red,
    Green,
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightState::Red => write!(f, "RED"),
            LightState::Green => write!(f, "GREEN"),
        }
    }
}

/// Two-state signal head.
///
/// Left alone, `update` cycles the light on its own timer. The junction
/// controller instead calls `force`, which switches state immediately and
/// restarts the timer so that a later `update` does not flip it straight back,
/// and advances the timer with `hold`.
#[derive(Debug, Clone)]
pub struct TrafficLight {
    state: LightState,
    timer: u32,
    green_duration: u32,
    red_duration: u32,
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new(3, 3)
    }
}

impl TrafficLight {
    pub fn new(green_duration: u32, red_duration: u32) -> Self {
        Self {
            state: LightState::Red,
            timer: 0,
            green_duration,
            red_duration,
        }
    }

    /// Advances the timer by one tick and flips state once it expires.
    pub fn update(&mut self) {
        self.timer += 1;

        match self.state {
            LightState::Red if self.timer >= self.red_duration => {
                self.state = LightState::Green;
                self.timer = 0;
            }
            LightState::Green if self.timer >= self.green_duration => {
                self.state = LightState::Red;
                self.timer = 0;
            }
            _ => {}
        }
    }

    /// Counts one tick in the current state without ever switching it.
    /// Used for lights whose state is owned by the junction controller.
    pub fn hold(&mut self) {
        self.timer = self.timer.saturating_add(1);
    }

    pub fn force(&mut self, state: LightState) {
        self.state = state;
        self.timer = 0;
    }

    pub fn state(&self) -> LightState {
        self.state
    }

    pub fn is_green(&self) -> bool {
        self.state == LightState::Green
    }

    /// Ticks spent in the current state.
    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn green_duration(&self) -> u32 {
        self.green_duration
    }

    pub fn red_duration(&self) -> u32 {
        self.red_duration
    }

    pub fn set_green_duration(&mut self, ticks: u32) {
        self.green_duration = ticks;
    }

    pub fn set_red_duration(&mut self, ticks: u32) {
        self.red_duration = ticks;
    }
}
