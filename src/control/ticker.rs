use std::time::{Duration, Instant};

/// A periodic deadline polled from the control loop.
///
/// Firing is best effort: a slow step delays it but a due tick is reported by the next
/// poll. Missed periods are not queued; the next deadline is measured from the poll that
/// consumed the tick.
#[derive(Debug, Clone)]
pub(crate) struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    pub(crate) fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next: now + period,
        }
    }

    /// `true` once per elapsed period.
    pub(crate) fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next = now + self.period;
        true
    }
}
