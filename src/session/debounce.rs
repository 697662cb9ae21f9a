//! Last-write-wins debouncing driven by caller-supplied instants

use std::time::{Duration, Instant};

/// Holds the most recent value until `delay` has passed without a newer one.
///
/// Time is passed in explicitly, so the owner decides when to poll (a UI
/// tick, a sleep, or a test advancing a fake clock).
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending value and restart the quiet period
    pub fn submit(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Take the pending value once the quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.delay => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Take the pending value immediately
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes ready
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_quiet_period() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));

        d.submit("ars", start);
        assert_eq!(d.poll(start + Duration::from_millis(299)), None);
        assert_eq!(d.poll(start + Duration::from_millis(300)), Some("ars"));
        assert!(!d.is_pending());
    }

    #[test]
    fn test_last_write_wins() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));

        d.submit("a", start);
        d.submit("ar", start + Duration::from_millis(200));
        // first value would have fired here, but it was superseded
        assert_eq!(d.poll(start + Duration::from_millis(350)), None);
        assert_eq!(d.poll(start + Duration::from_millis(500)), Some("ar"));
    }

    #[test]
    fn test_flush_and_cancel() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));

        d.submit(1, start);
        assert_eq!(d.deadline(), Some(start + Duration::from_millis(300)));
        assert_eq!(d.flush(), Some(1));

        d.submit(2, start);
        d.cancel();
        assert_eq!(d.poll(start + Duration::from_secs(5)), None);
    }
}
