use std::time::Duration;

pub const TIMER_DEC_PER_SECOND: u64 = 60;

/// Period of the fixed timer clock.
pub const TIMER_INTERVAL: Duration = Duration::from_micros(1_000_000 / TIMER_DEC_PER_SECOND);

#[derive(Debug, Clone, Copy, Default)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self { count: init_count }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    /// One 60 Hz period elapsed. Stops at zero.
    pub fn tick(&mut self) {
        self.count = self.count.saturating_sub(1);
    }

    pub fn is_active(&self) -> bool {
        self.count > 0
    }
}

/// Delay and sound timers; they only move on `tick`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timers {
    pub delay: Timer,
    pub sound: Timer,
}

impl Timers {
    pub fn tick(&mut self) {
        self.delay.tick();
        self.sound.tick();
    }
}
