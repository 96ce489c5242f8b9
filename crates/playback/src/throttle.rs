use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// Already the visible value. Any deferred change is dropped.
    Unchanged,
    Applied,
    /// Too soon after the previous change. Call [`ToggleThrottle::flush`]
    /// at `until` to publish it.
    Deferred { until: Instant },
}

/// Rate limit for a visible boolean: at most one change per window, last
/// offer wins. A burst such as play, pause, play inside one window collapses
/// to no visible flicker at all.
#[derive(Debug, Clone)]
pub struct ToggleThrottle {
    window: Duration,
    published: bool,
    pending: Option<bool>,
    last_change: Option<Instant>,
}

impl ToggleThrottle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            published: false,
            pending: None,
            last_change: None,
        }
    }

    pub fn published(&self) -> bool {
        self.published
    }

    pub fn pending(&self) -> Option<bool> {
        self.pending
    }

    pub fn offer(&mut self, value: bool, now: Instant) -> Offer {
        if value == self.published {
            self.pending = None;
            return Offer::Unchanged;
        }

        match self.next_allowed() {
            Some(until) if now < until => {
                self.pending = Some(value);
                Offer::Deferred { until }
            }
            _ => {
                self.apply(value, now);
                Offer::Applied
            }
        }
    }

    /// Publish a deferred value whose window has passed. Returns whether the
    /// visible value changed.
    pub fn flush(&mut self, now: Instant) -> bool {
        let Some(value) = self.pending else {
            return false;
        };
        if self.next_allowed().is_some_and(|until| now < until) {
            return false;
        }

        self.pending = None;
        if value == self.published {
            return false;
        }
        self.apply(value, now);
        true
    }

    /// Set the visible value immediately, ignoring the window.
    pub fn reset(&mut self, value: bool) {
        self.published = value;
        self.pending = None;
        self.last_change = None;
    }

    fn next_allowed(&self) -> Option<Instant> {
        self.last_change.map(|at| at + self.window)
    }

    fn apply(&mut self, value: bool, now: Instant) {
        self.published = value;
        self.pending = None;
        self.last_change = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn first_change_is_immediate() {
        let t0 = Instant::now();
        let mut throttle = ToggleThrottle::new(WINDOW);
        assert_eq!(throttle.offer(true, t0), Offer::Applied);
        assert!(throttle.published());
    }

    #[test]
    fn change_inside_window_is_deferred() {
        let t0 = Instant::now();
        let mut throttle = ToggleThrottle::new(WINDOW);
        throttle.offer(true, t0);

        assert_eq!(
            throttle.offer(false, t0 + ms(30)),
            Offer::Deferred { until: t0 + WINDOW }
        );
        assert!(throttle.published());
        assert!(!throttle.flush(t0 + ms(60)));
        assert!(throttle.flush(t0 + WINDOW));
        assert!(!throttle.published());
    }

    #[test]
    fn burst_collapses() {
        let t0 = Instant::now();
        let mut throttle = ToggleThrottle::new(WINDOW);
        throttle.offer(true, t0);

        throttle.offer(false, t0 + ms(10));
        assert_eq!(throttle.offer(true, t0 + ms(20)), Offer::Unchanged);
        assert_eq!(throttle.pending(), None);
        assert!(!throttle.flush(t0 + ms(200)));
        assert!(throttle.published());
    }

    #[test]
    fn change_after_window_is_immediate() {
        let t0 = Instant::now();
        let mut throttle = ToggleThrottle::new(WINDOW);
        throttle.offer(true, t0);
        assert_eq!(throttle.offer(false, t0 + ms(150)), Offer::Applied);
    }

    #[test]
    fn reset_bypasses_window() {
        let t0 = Instant::now();
        let mut throttle = ToggleThrottle::new(WINDOW);
        throttle.offer(true, t0);
        throttle.offer(false, t0 + ms(10));
        throttle.reset(false);
        assert!(!throttle.published());
        assert_eq!(throttle.pending(), None);
        assert_eq!(throttle.offer(true, t0 + ms(20)), Offer::Applied);
    }
}
