//! Agent Motion Engine
//!
//! Owns the motion phase machine for every tracked agent and the one active
//! interpolation segment per agent. Phases:
//!
//! - `Absent`: never materialized, or off-scene
//! - `Entering`: walking in from the entrance after first becoming busy
//! - `Present`: settled at the desk
//! - `Walking`: idle wandering between waypoints along curved paths
//! - `Returning`: heading back to the desk after becoming busy again
//!
//! A new transition always fully replaces the prior segment; there is no
//! blending between superseded segments and no cancellation primitive.
//! Superseding a walk samples the walker's current position first, so the
//! replacement starts where the agent visibly is.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::MotionConfig;
use crate::events::{Agent, AgentStatus};
use crate::geometry::{self, Easing, Point};
use crate::layout;

/// One state of the motion phase machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MotionPhase {
    #[default]
    Absent,
    Entering,
    Present,
    Walking,
    Returning,
}

/// Position + opacity triple; segment endpoint and sample result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionPoint {
    pub x: f32,
    pub y: f32,
    pub alpha: f32,
}

impl MotionPoint {
    #[must_use]
    pub const fn new(x: f32, y: f32, alpha: f32) -> Self {
        Self { x, y, alpha }
    }

    #[must_use]
    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// One scheduled interpolation (from -> to over a duration).
#[derive(Clone, Debug)]
pub struct MotionSegment {
    pub phase: MotionPhase,
    pub started_at: Instant,
    /// Always > 0; creation sites enforce floors.
    pub duration: Duration,
    pub from: MotionPoint,
    pub to: MotionPoint,
    /// Present only for curved (Bezier) paths.
    pub control: Option<Point>,
}

impl MotionSegment {
    /// Normalized progress at `now`, clamped to [0, 1].
    ///
    /// A segment scheduled in the future (walking pause) reports 0, which is
    /// what freezes the agent at the previous waypoint during the pause.
    #[must_use]
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

/// Interpolated draw state of a segment at a point in time.
///
/// Pure read. Returns the exact endpoints at the boundaries: no float
/// overshoot past `to`, no extrapolation before `from`.
#[must_use]
pub fn sample(segment: &MotionSegment, now: Instant) -> MotionPoint {
    let t = segment.progress(now);
    if t <= 0.0 {
        return segment.from;
    }
    if t >= 1.0 {
        return segment.to;
    }

    let e = Easing::OutCubic.apply(t);
    let alpha = geometry::lerp(segment.from.alpha, segment.to.alpha, e);

    match segment.control {
        Some(control) => {
            let pos =
                geometry::quadratic_bezier(segment.from.point(), control, segment.to.point(), e);
            MotionPoint::new(pos.x, pos.y, alpha)
        }
        None => MotionPoint::new(
            geometry::lerp(segment.from.x, segment.to.x, e),
            geometry::lerp(segment.from.y, segment.to.y, e),
            alpha,
        ),
    }
}

/// Phase machine and segment owner for all tracked agents.
#[derive(Debug)]
pub struct MotionEngine {
    segments: HashMap<String, MotionSegment>,
    config: MotionConfig,
    /// True randomness for waypoint targets only; curve geometry stays on
    /// the deterministic hash.
    rng: StdRng,
}

impl MotionEngine {
    #[must_use]
    pub fn new(config: MotionConfig) -> Self {
        Self {
            segments: HashMap::new(),
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Engine with a seeded RNG for reproducible tests.
    #[must_use]
    pub fn with_seed(config: MotionConfig, seed: u64) -> Self {
        Self {
            segments: HashMap::new(),
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Reconcile desired visibility with the current phase for every agent.
    ///
    /// Runs once per tick, before [`MotionEngine::advance`]. Idempotent
    /// within a tick: transitions are keyed on the current phase, so calling
    /// this again with unchanged inputs produces no state churn.
    pub fn reconcile(
        &mut self,
        agents: &HashMap<String, Agent>,
        blocked: &HashMap<String, bool>,
        now: Instant,
    ) {
        for agent in agents.values() {
            let wants_visible = agent.status != AgentStatus::Idle
                || blocked.get(&agent.id).copied().unwrap_or(false);
            let phase = self.phase_of(&agent.id);
            let desk = layout::agent_position(&agent.id);

            if wants_visible {
                match phase {
                    MotionPhase::Absent => {
                        // First appearance: walk in from the entrance
                        let segment = MotionSegment {
                            phase: MotionPhase::Entering,
                            started_at: now,
                            duration: self.config.enter_duration(),
                            from: MotionPoint::new(
                                layout::ENTRY_START.x,
                                layout::ENTRY_START.y,
                                0.0,
                            ),
                            to: MotionPoint::new(desk.x, desk.y, 1.0),
                            control: None,
                        };
                        self.segments.insert(agent.id.clone(), segment);
                    }
                    MotionPhase::Walking => {
                        // Supersede the walk from wherever the agent is now,
                        // not from the walk's origin, to avoid a teleport.
                        let current = self
                            .segments
                            .get(&agent.id)
                            .map(|segment| sample(segment, now))
                            .unwrap_or(MotionPoint::new(desk.x, desk.y, 1.0));
                        let from = Point::new(current.x, current.y);
                        let segment = MotionSegment {
                            phase: MotionPhase::Returning,
                            started_at: now,
                            duration: self.return_duration(from, desk),
                            from: MotionPoint::new(from.x, from.y, 1.0),
                            to: MotionPoint::new(desk.x, desk.y, 1.0),
                            control: None,
                        };
                        self.segments.insert(agent.id.clone(), segment);
                    }
                    // Entering/Returning already head to the desk; Present
                    // is already there.
                    _ => {}
                }
            } else if phase == MotionPhase::Present {
                // Became idle at the desk: start wandering
                let segment = self.walking_segment(desk, now);
                self.segments.insert(agent.id.clone(), segment);
            }
            // Absent and not visible: never start wandering before the
            // first appearance.
        }
    }

    /// Advance time-driven completions.
    ///
    /// Runs every tick regardless of input changes; it has to observe time
    /// passing even when no external event occurred.
    pub fn advance(&mut self, now: Instant) {
        let mut completed_walks: Vec<(String, Point)> = Vec::new();

        for (id, segment) in &mut self.segments {
            match segment.phase {
                MotionPhase::Entering | MotionPhase::Returning => {
                    if segment.progress(now) >= 1.0 {
                        segment.phase = MotionPhase::Present;
                    }
                }
                MotionPhase::Walking => {
                    if segment.progress(now) >= 1.0 {
                        completed_walks.push((id.clone(), segment.to.point()));
                    }
                }
                _ => {}
            }
        }

        for (id, reached) in completed_walks {
            // Stand at the reached waypoint for a beat, then wander on
            // within the same band.
            let pause = Duration::from_millis(
                self.rng
                    .gen_range(self.config.walk_pause_min_ms..=self.config.walk_pause_max_ms),
            );
            let segment = self.walking_segment(reached, now + pause);
            self.segments.insert(id, segment);
        }
    }

    /// Build a walking segment starting at `start`.
    ///
    /// The waypoint stays in the band containing `start`; an unmapped y
    /// degrades to the default band rather than failing the frame.
    fn walking_segment(&mut self, start: Point, started_at: Instant) -> MotionSegment {
        let band = layout::find_band(start.y).unwrap_or_else(|| {
            tracing::debug!(y = start.y, "no walkable band contains y, using default");
            layout::default_band()
        });
        let waypoint = layout::waypoint_in_band(band, &mut self.rng);
        let control = geometry::bezier_control_point(start, waypoint, self.config.curve_strength);

        MotionSegment {
            phase: MotionPhase::Walking,
            started_at,
            duration: self.walk_duration(start, waypoint, control),
            from: MotionPoint::new(start.x, start.y, 1.0),
            to: MotionPoint::new(waypoint.x, waypoint.y, 1.0),
            control: Some(control),
        }
    }

    /// Walk duration from sampled arc length at the configured speed,
    /// floored so short hops still read as a stroll.
    fn walk_duration(&self, from: Point, to: Point, control: Point) -> Duration {
        let arc = geometry::approximate_bezier_length(from, control, to, 12);
        let ms = (arc / self.config.walk_speed_px_per_sec * 1000.0) as u64;
        Duration::from_millis(ms.max(self.config.walk_min_duration_ms))
    }

    /// Return duration, distance-proportional within a fixed clamp.
    fn return_duration(&self, from: Point, to: Point) -> Duration {
        let dist = geometry::distance(from, to);
        let ms = (dist / self.config.return_speed_px_per_sec * 1000.0) as u64;
        Duration::from_millis(ms.clamp(
            self.config.return_min_duration_ms,
            self.config.return_max_duration_ms,
        ))
    }

    /// Current phase of an agent (`Absent` when never materialized).
    #[must_use]
    pub fn phase_of(&self, id: &str) -> MotionPhase {
        self.segments.get(id).map_or(MotionPhase::Absent, |s| s.phase)
    }

    /// The agent's active segment, if any.
    #[must_use]
    pub fn segment(&self, id: &str) -> Option<&MotionSegment> {
        self.segments.get(id)
    }

    /// Interpolated draw state for an agent.
    #[must_use]
    pub fn sample_agent(&self, id: &str, now: Instant) -> Option<MotionPoint> {
        self.segments.get(id).map(|segment| sample(segment, now))
    }

    /// Cosmetic body lean for an agent's current travel.
    #[must_use]
    pub fn lean_of(&self, id: &str, now: Instant) -> f32 {
        let Some(segment) = self.segments.get(id) else {
            return 0.0;
        };
        if segment.phase != MotionPhase::Walking && segment.phase != MotionPhase::Returning {
            return 0.0;
        }

        let max = self.config.lean_max_angle;
        match segment.control {
            Some(control) => {
                let e = Easing::OutCubic.apply(segment.progress(now));
                let here =
                    geometry::quadratic_bezier(segment.from.point(), control, segment.to.point(), e);
                let ahead = geometry::quadratic_bezier(
                    segment.from.point(),
                    control,
                    segment.to.point(),
                    (e + 0.1).min(1.0),
                );
                geometry::lean_angle(here, ahead, max) * 0.5
            }
            None => geometry::lean_angle(segment.from.point(), segment.to.point(), max) * 0.3,
        }
    }

    /// Whether any agent is mid-animation (entering, walking or returning).
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.segments.values().any(|s| {
            matches!(
                s.phase,
                MotionPhase::Entering | MotionPhase::Walking | MotionPhase::Returning
            )
        })
    }

    /// Whether an agent should be drawn at all.
    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        self.phase_of(id) != MotionPhase::Absent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn agent(id: &str, status: AgentStatus) -> Agent {
        Agent {
            id: id.to_string(),
            status,
            current_task: None,
            desk_position: (0.0, 0.0),
        }
    }

    fn agents(entries: &[(&str, AgentStatus)]) -> HashMap<String, Agent> {
        entries
            .iter()
            .map(|(id, status)| (id.to_string(), agent(id, *status)))
            .collect()
    }

    fn engine() -> MotionEngine {
        MotionEngine::with_seed(MotionConfig::default(), 42)
    }

    #[test]
    fn test_idle_agent_never_materializes() {
        let mut e = engine();
        let now = Instant::now();
        e.reconcile(&agents(&[("explorer", AgentStatus::Idle)]), &HashMap::new(), now);
        assert_eq!(e.phase_of("explorer"), MotionPhase::Absent);
        assert!(!e.is_live());
    }

    #[test]
    fn test_entering_lifecycle() {
        let mut e = engine();
        let now = Instant::now();
        let working = agents(&[("explorer", AgentStatus::Working)]);
        e.reconcile(&working, &HashMap::new(), now);

        let segment = e.segment("explorer").unwrap();
        assert_eq!(segment.phase, MotionPhase::Entering);
        assert_eq!(segment.duration, Duration::from_millis(700));
        assert_eq!(segment.from.alpha, 0.0);
        assert_eq!(segment.to.alpha, 1.0);
        let desk = layout::agent_position("explorer");
        assert_eq!(segment.to.point(), desk);

        // Not there yet mid-flight
        e.advance(now + Duration::from_millis(350));
        assert_eq!(e.phase_of("explorer"), MotionPhase::Entering);

        // Settled after the full duration
        e.advance(now + Duration::from_millis(700));
        assert_eq!(e.phase_of("explorer"), MotionPhase::Present);
        let settled = e.sample_agent("explorer", now + Duration::from_secs(1)).unwrap();
        assert_eq!(settled.point(), desk);
        assert_eq!(settled.alpha, 1.0);
    }

    #[test]
    fn test_reconcile_is_idempotent_within_a_tick() {
        let mut e = engine();
        let now = Instant::now();
        let working = agents(&[("developer", AgentStatus::Working)]);

        e.reconcile(&working, &HashMap::new(), now);
        let first = e.segment("developer").unwrap().clone();

        let later = now + Duration::from_millis(5);
        e.reconcile(&working, &HashMap::new(), later);
        let second = e.segment("developer").unwrap();

        assert_eq!(first.phase, second.phase);
        assert_eq!(first.started_at, second.started_at);
        assert_eq!(first.from, second.from);
        assert_eq!(first.to, second.to);
    }

    #[test]
    fn test_present_to_walking_on_idle() {
        let mut e = engine();
        let now = Instant::now();
        let working = agents(&[("developer", AgentStatus::Working)]);
        e.reconcile(&working, &HashMap::new(), now);
        e.advance(now + Duration::from_millis(700));
        assert_eq!(e.phase_of("developer"), MotionPhase::Present);

        let idle = agents(&[("developer", AgentStatus::Idle)]);
        let t1 = now + Duration::from_millis(800);
        e.reconcile(&idle, &HashMap::new(), t1);

        let segment = e.segment("developer").unwrap();
        assert_eq!(segment.phase, MotionPhase::Walking);
        assert!(segment.duration >= Duration::from_millis(800));
        assert!(segment.control.is_some());

        // Waypoint stays in the band containing the desk stand position
        let desk = layout::agent_position("developer");
        let band = layout::find_band(desk.y).unwrap_or_else(layout::default_band);
        assert!(segment.to.y >= band.min_y && segment.to.y <= band.max_y);
        assert!(segment.to.x >= layout::WALK_X_MIN && segment.to.x <= layout::WALK_X_MAX);
    }

    #[test]
    fn test_walk_superseded_by_return_keeps_continuity() {
        let mut e = engine();
        let now = Instant::now();
        let working = agents(&[("developer", AgentStatus::Working)]);
        e.reconcile(&working, &HashMap::new(), now);
        e.advance(now + Duration::from_millis(700));

        let idle = agents(&[("developer", AgentStatus::Idle)]);
        let walk_start = now + Duration::from_millis(800);
        e.reconcile(&idle, &HashMap::new(), walk_start);
        let walk = e.segment("developer").unwrap().clone();

        // 40% through the walk the agent becomes busy again
        let mid = walk_start + walk.duration.mul_f32(0.4);
        let expected = sample(&walk, mid);

        e.reconcile(&working, &HashMap::new(), mid);
        let ret = e.segment("developer").unwrap();
        assert_eq!(ret.phase, MotionPhase::Returning);
        // The return starts from the sampled mid-walk position, not the
        // walk's origin
        assert_eq!(ret.from.x, expected.x);
        assert_eq!(ret.from.y, expected.y);
        assert_eq!(ret.from.alpha, 1.0);
        assert_eq!(ret.to.point(), layout::agent_position("developer"));
        assert!(ret.duration >= Duration::from_millis(300));
        assert!(ret.duration <= Duration::from_millis(800));
    }

    #[test]
    fn test_walking_completion_schedules_paused_next_leg() {
        let mut e = engine();
        let now = Instant::now();
        let working = agents(&[("connector", AgentStatus::Working)]);
        e.reconcile(&working, &HashMap::new(), now);
        e.advance(now + Duration::from_millis(700));

        let idle = agents(&[("connector", AgentStatus::Idle)]);
        let walk_start = now + Duration::from_secs(1);
        e.reconcile(&idle, &HashMap::new(), walk_start);
        let first_walk = e.segment("connector").unwrap().clone();

        let done = walk_start + first_walk.duration + Duration::from_millis(1);
        e.advance(done);

        let next = e.segment("connector").unwrap();
        assert_eq!(next.phase, MotionPhase::Walking);
        // Next leg starts where the previous one ended...
        assert_eq!(next.from.point(), first_walk.to.point());
        // ...after a pause in the configured range
        let pause = next.started_at.duration_since(done);
        assert!(pause >= Duration::from_millis(2000) && pause <= Duration::from_millis(4000));

        // Frozen at the waypoint during the pause
        let standing = sample(next, done + Duration::from_millis(100));
        assert_eq!(standing.point(), first_walk.to.point());

        // Next waypoint stays in the same band as the one just reached
        let band = layout::find_band(first_walk.to.y).unwrap_or_else(layout::default_band);
        assert!(next.to.y >= band.min_y && next.to.y <= band.max_y);
    }

    #[test]
    fn test_blocked_idle_agent_is_visible() {
        let mut e = engine();
        let now = Instant::now();
        // The blocked flag forces visibility even for an idle status, so a
        // rate-limited agent walks in and sits at its desk with the sign up
        let idle = agents(&[("operator", AgentStatus::Idle)]);
        let blocked: HashMap<String, bool> = [("operator".to_string(), true)].into();

        e.reconcile(&idle, &blocked, now);
        assert_eq!(e.phase_of("operator"), MotionPhase::Entering);
    }

    #[test]
    fn test_sample_clamps_to_endpoints() {
        let segment = MotionSegment {
            phase: MotionPhase::Walking,
            started_at: Instant::now() + Duration::from_secs(1),
            duration: Duration::from_millis(1000),
            from: MotionPoint::new(10.0, 20.0, 1.0),
            to: MotionPoint::new(200.0, 100.0, 1.0),
            control: Some(Point::new(100.0, 0.0)),
        };

        // Before start: exactly from (standing still through the pause)
        let before = sample(&segment, Instant::now());
        assert_eq!(before, segment.from);

        // Way past the end: exactly to
        let after = sample(&segment, segment.started_at + Duration::from_secs(10));
        assert_eq!(after, segment.to);
    }

    #[test]
    fn test_lean_is_zero_when_not_traveling() {
        let mut e = engine();
        let now = Instant::now();
        let working = agents(&[("analyzer", AgentStatus::Working)]);
        e.reconcile(&working, &HashMap::new(), now);
        e.advance(now + Duration::from_millis(700));
        assert_eq!(e.lean_of("analyzer", now + Duration::from_secs(1)), 0.0);
    }
}
