//! Scene Math
//!
//! Pure math helpers shared by the motion engine and the renderers: easing,
//! quadratic Bezier evaluation, and the deterministic integer hash used
//! wherever geometry must be reproducible across redraws (curve direction,
//! per-instance particle placement). Nothing in this module touches an RNG.

use serde::{Deserialize, Serialize};

/// A point in scene coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Clamp a value to the [0, 1] range.
#[must_use]
pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// Linear interpolation between `a` and `b`.
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(from: Point, to: Point) -> f32 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    (dx * dx + dy * dy).sqrt()
}

/// Easing functions for smooth animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Easing {
    /// No easing (constant speed)
    #[default]
    Linear,

    /// Gentle deceleration (softer than cubic)
    OutQuad,

    /// Smooth acceleration and deceleration
    InOutQuad,

    /// Strong deceleration toward the end
    OutCubic,

    /// Smooth start/stop (natural for walking)
    InOutSine,

    /// Slight overshoot at the end (bouncy arrival)
    OutBack,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0).
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutSine => -((std::f32::consts::PI * t).cos() - 1.0) / 2.0,
            Self::OutBack => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                let t_minus_1 = t - 1.0;
                1.0 + c3 * t_minus_1.powi(3) + c1 * t_minus_1.powi(2)
            }
        }
    }
}

/// Quadratic Bezier interpolation: P(t) = (1-t)²P0 + 2(1-t)tP1 + t²P2.
#[must_use]
pub fn quadratic_bezier(p0: Point, p1: Point, p2: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let t2 = t * t;
    Point {
        x: mt2 * p0.x + 2.0 * mt * t * p1.x + t2 * p2.x,
        y: mt2 * p0.y + 2.0 * mt * t * p1.y + t2 * p2.y,
    }
}

/// Approximate the arc length of a quadratic Bezier curve by sampling.
///
/// A polyline approximation is enough here: the result only feeds the
/// distance-to-duration conversion for walking segments, which needs to be
/// monotonic with curve extremity, not exact.
#[must_use]
pub fn approximate_bezier_length(p0: Point, p1: Point, p2: Point, samples: u32) -> f32 {
    let samples = samples.max(1);
    let mut length = 0.0;
    let mut prev = p0;
    for i in 1..=samples {
        let t = i as f32 / samples as f32;
        let curr = quadratic_bezier(p0, p1, p2, t);
        length += distance(prev, curr);
        prev = curr;
    }
    length
}

/// Deterministic integer hash for 2-D coordinates.
///
/// Pure wrapping integer ops so the result is identical on every platform.
/// Used for stable per-cell variation and for the curve-direction sign.
#[must_use]
pub fn hash2d(x: i32, y: i32) -> u32 {
    let mut h = (x as u32)
        .wrapping_mul(374_761_393)
        .wrapping_add((y as u32).wrapping_mul(668_265_263));
    h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
    h ^ (h >> 16)
}

/// Map a hash value to the [0, 1) range.
#[must_use]
pub fn rand01_from_hash(h: u32) -> f32 {
    h as f32 / u32::MAX as f32
}

/// Generate a control point for a natural curved walking path.
///
/// The control point sits at the segment midpoint, offset perpendicular to
/// the travel direction by `curve_strength` of the travel distance. Whether
/// the curve bows left or right is chosen from a hash of the floored start
/// coordinates, so repeated calls with the same start produce the same curve.
#[must_use]
pub fn bezier_control_point(from: Point, to: Point, curve_strength: f32) -> Point {
    let mid = Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);

    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist <= f32::EPSILON {
        return mid;
    }

    // Perpendicular vector (rotated 90 degrees), scaled by travel distance.
    let perp_x = -dy * curve_strength;
    let perp_y = dx * curve_strength;

    let hash = hash2d(from.x.floor() as i32, from.y.floor() as i32);
    let sign = if hash % 2 == 0 { 1.0 } else { -1.0 };

    Point {
        x: mid.x + perp_x * sign,
        y: mid.y + perp_y * sign,
    }
}

/// Body lean angle from movement direction, in radians.
///
/// Proportional to horizontal speed and clamped to `max_angle`. Positive
/// leans right, negative leans left. Cosmetic only.
#[must_use]
pub fn lean_angle(from: Point, to: Point, max_angle: f32) -> f32 {
    const MAX_SPEED: f32 = 100.0;

    let dx = to.x - from.x;
    let normalized = (dx.abs() / MAX_SPEED).min(1.0);
    let sign = if dx >= 0.0 { 1.0 } else { -1.0 };
    sign * normalized * max_angle
}
