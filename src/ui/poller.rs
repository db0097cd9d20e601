use std::time::{Duration, Instant};

/// Fixed-cadence repeating trigger for list refreshes.
///
/// Fires every `interval` whether or not the previous fetch has completed;
/// overlapping fetches are neither cancelled nor merged. Missed ticks are
/// skipped rather than replayed in a burst.
#[derive(Debug)]
pub struct Poller {
    interval: Option<Duration>,
    next_at: Option<Instant>,
}

impl Poller {
    /// `None` disables the recurring trigger.
    pub fn new(interval: Option<Duration>) -> Self {
        Poller {
            interval,
            next_at: None,
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Arm the trigger; the first firing is one interval after `now`. An
    /// interval too large to schedule never fires.
    pub fn start(&mut self, now: Instant) {
        self.next_at = self.interval.and_then(|interval| now.checked_add(interval));
    }

    /// Whether a poll is due at `now`. Advances the schedule when it is.
    pub fn due(&mut self, now: Instant) -> bool {
        match (self.interval, self.next_at) {
            (Some(interval), Some(next)) if now >= next => {
                self.next_at = next
                    .checked_add(interval)
                    .filter(|upcoming| *upcoming > now)
                    .or_else(|| now.checked_add(interval));
                true
            }
            _ => false,
        }
    }
}
