//! Frame-aligned scheduling of choreography ticks.
//!
//! Scroll input can arrive far faster than frames are drawn.  Every scroll
//! event calls [`FrameScheduler::request`]; the host polls once per loop
//! iteration and runs the choreography only when [`FrameScheduler::poll`]
//! says so, which is at most once per frame interval.

use std::time::{Duration, Instant};

/// Default frame interval (60 fps).
pub const DEFAULT_FRAME: Duration = Duration::from_micros(16_667);

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Duration,
    /// When `false`, every request runs on the next poll regardless of time.
    aligned: bool,
    pending: bool,
    last_run: Option<Instant>,
    /// Requests folded into an already-pending frame.
    coalesced: u64,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME, true)
    }
}

impl FrameScheduler {
    pub fn new(interval: Duration, aligned: bool) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            aligned,
            pending: false,
            last_run: None,
            coalesced: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_aligned(&self) -> bool {
        self.aligned
    }

    pub fn set_aligned(&mut self, aligned: bool) {
        self.aligned = aligned;
    }

    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Record that something moved and a tick is wanted.
    pub fn request(&mut self) {
        if self.pending {
            self.coalesced += 1;
        }
        self.pending = true;
    }

    /// `true` when a tick should run now.  Consumes the pending request.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.pending {
            return false;
        }
        if self.aligned {
            if let Some(last) = self.last_run {
                if now.saturating_duration_since(last) < self.interval {
                    return false;
                }
            }
        }
        self.pending = false;
        self.last_run = Some(now);
        true
    }

    /// Earliest instant at which a pending request could run.
    pub fn next_deadline(&self) -> Option<Instant> {
        if !self.pending {
            return None;
        }
        match (self.aligned, self.last_run) {
            (true, Some(last)) => Some(last + self.interval),
            _ => Some(Instant::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_at_most_once_per_frame() {
        let t0 = Instant::now();
        let mut s = FrameScheduler::new(Duration::from_millis(16), true);

        assert!(!s.poll(t0), "nothing requested");

        s.request();
        assert!(s.poll(t0));

        // A burst of scroll events inside one frame collapses to one tick.
        for _ in 0..10 {
            s.request();
        }
        assert!(!s.poll(t0 + Duration::from_millis(5)));
        assert!(s.next_deadline().is_some());
        assert_eq!(s.coalesced(), 9);
        assert!(s.poll(t0 + Duration::from_millis(16)));
        assert!(!s.poll(t0 + Duration::from_millis(40)));
    }

    #[test]
    fn unaligned_runs_every_request() {
        let t0 = Instant::now();
        let mut s = FrameScheduler::new(Duration::from_millis(16), false);
        for i in 0..5 {
            s.request();
            assert!(s.poll(t0 + Duration::from_micros(i)));
        }
    }

    #[test]
    fn deadline_follows_last_run() {
        let t0 = Instant::now();
        let mut s = FrameScheduler::new(Duration::from_millis(16), true);
        assert_eq!(s.next_deadline(), None);
        s.request();
        s.poll(t0);
        s.request();
        assert_eq!(s.next_deadline(), Some(t0 + Duration::from_millis(16)));
    }
}
