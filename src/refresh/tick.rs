//! Periodic refresh tick
//!
//! A schedulable tick with pause/resume, independent of any platform
//! display-timing primitive. The host asks for the next deadline and calls
//! back; tests drive it directly.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RefreshTicker {
    interval: Duration,
    paused: bool,
    last_fire: Option<Instant>,
    fired: u64,
}

impl RefreshTicker {
    /// A paused ticker firing every `interval` once resumed
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            paused: true,
            last_fire: None,
            fired: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            tracing::trace!(fired = self.fired, "refresh tick paused");
        }
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            tracing::trace!("refresh tick resumed");
        }
        self.paused = false;
    }

    /// When the host should next call back, or `None` while paused
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        if self.paused {
            return None;
        }
        Some(match self.last_fire {
            Some(last) => (last + self.interval).max(now),
            None => now,
        })
    }

    /// Record a fire. Returns false while paused.
    pub(crate) fn fire(&mut self, now: Instant) -> bool {
        if self.paused {
            return false;
        }
        self.last_fire = Some(now);
        self.fired += 1;
        true
    }

    /// Number of ticks delivered while running
    pub fn fired(&self) -> u64 {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_paused() {
        let mut ticker = RefreshTicker::new(Duration::from_millis(16));
        assert!(ticker.is_paused());
        assert_eq!(ticker.next_deadline(Instant::now()), None);
        assert!(!ticker.fire(Instant::now()));
        assert_eq!(ticker.fired(), 0);
    }

    #[test]
    fn test_deadline_follows_last_fire() {
        let mut ticker = RefreshTicker::new(Duration::from_millis(16));
        let start = Instant::now();
        ticker.resume();
        assert_eq!(ticker.next_deadline(start), Some(start));

        assert!(ticker.fire(start));
        assert_eq!(
            ticker.next_deadline(start),
            Some(start + Duration::from_millis(16))
        );

        let late = start + Duration::from_millis(40);
        assert_eq!(ticker.next_deadline(late), Some(late));

        ticker.pause();
        assert_eq!(ticker.next_deadline(late), None);
        assert_eq!(ticker.fired(), 1);
    }
}
