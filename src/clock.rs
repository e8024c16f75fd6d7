use std::time::{Duration, Instant};

use crate::timer::TIMER_INTERVAL;

/// Deadlines further behind than this are dropped instead of replayed.
const MAX_LAG: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Run one instruction.
    Cycle,
    /// Decrement the timers (fixed 60 Hz).
    Timer,
}

/// Multiplexes the instruction clock and the 60 Hz timer clock for a single
/// threaded host loop.
///
/// ```ignore
/// loop {
///     match clock.poll(Instant::now()) {
///         Some(Signal::Cycle) => emu.step()?,
///         Some(Signal::Timer) => emu.tick_timers(),
///         None => thread::sleep(clock.until_next(Instant::now())),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    cycle_interval: Duration,
    timer_interval: Duration,
    next_cycle: Instant,
    next_timer: Instant,
}

impl Clock {
    pub fn new(cycle_interval: Duration, start: Instant) -> Self {
        Self::with_intervals(cycle_interval, TIMER_INTERVAL, start)
    }

    pub fn with_intervals(
        cycle_interval: Duration,
        timer_interval: Duration,
        start: Instant,
    ) -> Self {
        Self {
            cycle_interval,
            timer_interval,
            next_cycle: start + cycle_interval,
            next_timer: start + timer_interval,
        }
    }

    /// Returns the signal that is due at `now`, earliest deadline first, and
    /// schedules its next occurrence. Timer wins a tie.
    pub fn poll(&mut self, now: Instant) -> Option<Signal> {
        let timer_due = self.next_timer <= now;
        let cycle_due = self.next_cycle <= now;
        if timer_due && (!cycle_due || self.next_timer <= self.next_cycle) {
            Self::advance(&mut self.next_timer, self.timer_interval, now);
            Some(Signal::Timer)
        } else if cycle_due {
            Self::advance(&mut self.next_cycle, self.cycle_interval, now);
            Some(Signal::Cycle)
        } else {
            None
        }
    }

    fn advance(deadline: &mut Instant, interval: Duration, now: Instant) {
        *deadline += interval;
        if *deadline + MAX_LAG < now {
            *deadline = now + interval;
        }
    }

    pub fn next_deadline(&self) -> Instant {
        self.next_cycle.min(self.next_timer)
    }

    /// Time left before anything is due; zero if something already is.
    pub fn until_next(&self, now: Instant) -> Duration {
        self.next_deadline().saturating_duration_since(now)
    }
}
