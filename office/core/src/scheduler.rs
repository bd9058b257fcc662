//! Frame Scheduler
//!
//! A rate-limiting gate around the per-refresh callback. The display loop
//! calls [`FrameScheduler::on_refresh`] every refresh with the shared `now`
//! and whether anything is currently animating; the scheduler decides
//! whether that refresh should propagate a redraw and whether the coarse
//! prune sweep is due.
//!
//! Adaptive throttling: ~60fps while anything is live, ~5fps when the scene
//! is fully idle. The loop keeps refreshing either way so the next
//! live-ness flip is noticed promptly.

use std::time::{Duration, Instant};

use crate::config::SchedulerConfig;

/// What a single refresh should do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameDecision {
    /// Propagate an update / redraw this refresh.
    pub redraw: bool,
    /// Run the coarse expiry sweep this refresh.
    pub prune: bool,
}

/// Adaptive redraw gate with a coarse prune cadence.
#[derive(Debug)]
pub struct FrameScheduler {
    active_interval: Duration,
    idle_interval: Duration,
    prune_interval: Duration,
    last_redraw: Option<Instant>,
    last_prune: Option<Instant>,
}

impl FrameScheduler {
    #[must_use]
    pub fn new(config: &SchedulerConfig, prune_interval: Duration) -> Self {
        Self {
            active_interval: Duration::from_millis(config.active_interval_ms),
            idle_interval: Duration::from_millis(config.idle_interval_ms),
            prune_interval,
            last_redraw: None,
            last_prune: None,
        }
    }

    /// Record a display refresh and decide what it should do.
    ///
    /// `live` is the caller's liveness snapshot: any pending transfer, any
    /// pending effect, or any agent mid-entering/walking/returning.
    pub fn on_refresh(&mut self, now: Instant, live: bool) -> FrameDecision {
        let prune = match self.last_prune {
            None => true,
            Some(at) => now.saturating_duration_since(at) >= self.prune_interval,
        };
        if prune {
            self.last_prune = Some(now);
        }

        let interval = if live {
            self.active_interval
        } else {
            self.idle_interval
        };
        let redraw = match self.last_redraw {
            None => true,
            Some(at) => now.saturating_duration_since(at) > interval,
        };
        if redraw {
            self.last_redraw = Some(now);
        }

        FrameDecision { redraw, prune }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> FrameScheduler {
        FrameScheduler::new(&SchedulerConfig::default(), Duration::from_millis(500))
    }

    #[test]
    fn test_first_refresh_redraws_and_prunes() {
        let mut s = scheduler();
        let decision = s.on_refresh(Instant::now(), false);
        assert!(decision.redraw);
        assert!(decision.prune);
    }

    #[test]
    fn test_live_scene_updates_at_frame_rate() {
        let mut s = scheduler();
        let base = Instant::now();
        s.on_refresh(base, true);

        // 10ms later: under the 16ms active interval, gated
        assert!(!s.on_refresh(base + Duration::from_millis(10), true).redraw);
        // 17ms after the last propagated update: passes
        assert!(s.on_refresh(base + Duration::from_millis(17), true).redraw);
    }

    #[test]
    fn test_idle_scene_throttles_to_slow_rate() {
        let mut s = scheduler();
        let base = Instant::now();
        s.on_refresh(base, false);

        assert!(!s.on_refresh(base + Duration::from_millis(17), false).redraw);
        assert!(!s.on_refresh(base + Duration::from_millis(150), false).redraw);
        assert!(s.on_refresh(base + Duration::from_millis(201), false).redraw);
    }

    #[test]
    fn test_going_live_drops_back_to_fast_interval() {
        let mut s = scheduler();
        let base = Instant::now();
        s.on_refresh(base, false);

        // Idle gating would hold for 200ms, but the scene went live
        assert!(s.on_refresh(base + Duration::from_millis(20), true).redraw);
    }

    #[test]
    fn test_prune_cadence_is_coarse() {
        let mut s = scheduler();
        let base = Instant::now();
        assert!(s.on_refresh(base, true).prune);
        assert!(!s.on_refresh(base + Duration::from_millis(100), true).prune);
        assert!(!s.on_refresh(base + Duration::from_millis(400), true).prune);
        assert!(s.on_refresh(base + Duration::from_millis(500), true).prune);
    }
}
