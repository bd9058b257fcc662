//! Office Floor Plan
//!
//! Static scene geometry: desk assignments, the entrance, and the walkable
//! bands that idle wandering must stay within. Bands are horizontal strips
//! that do not cross the partitions, so a wanderer never clips through
//! furniture.

use rand::Rng;

use crate::geometry::Point;

/// Scene width in scene pixels.
pub const OFFICE_WIDTH: f32 = 550.0;
/// Scene height in scene pixels.
pub const OFFICE_HEIGHT: f32 = 700.0;

/// Where entering agents spawn (above the entrance, off-scene).
pub const ENTRY_START: Point = Point::new(OFFICE_WIDTH / 2.0, -60.0);

/// Agents stand this far above their desk anchor.
const AGENT_DESK_OFFSET_Y: f32 = 55.0;

const DESK_X_LEFT: f32 = 60.0;
const DESK_X_MIDDLE: f32 = 150.0;
const DESK_X_RIGHT: f32 = 240.0;

const DESK_Y_SECTION_A: f32 = 130.0;
const DESK_Y_SECTION_B: f32 = 320.0;
const DESK_Y_SECTION_C: f32 = 520.0;

/// One desk in the office, keyed by the agent id that sits at it.
#[derive(Clone, Copy, Debug)]
pub struct DeskSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub x: f32,
    pub y: f32,
    /// Visual direction of the desk row.
    pub facing_up: bool,
}

/// The eight workflow desks, in section order.
pub const DESKS: &[DeskSpec] = &[
    // Section A: exploration / analysis / planning
    DeskSpec { id: "explorer", label: "Explorer", x: DESK_X_LEFT, y: DESK_Y_SECTION_A, facing_up: true },
    DeskSpec { id: "analyzer", label: "Analyzer", x: DESK_X_MIDDLE, y: DESK_Y_SECTION_A, facing_up: true },
    DeskSpec { id: "architect", label: "Architect", x: DESK_X_RIGHT, y: DESK_Y_SECTION_A, facing_up: true },
    // Section B: implementation / execution / validation
    DeskSpec { id: "developer", label: "Developer", x: DESK_X_LEFT, y: DESK_Y_SECTION_B, facing_up: false },
    DeskSpec { id: "operator", label: "Operator", x: DESK_X_MIDDLE, y: DESK_Y_SECTION_B, facing_up: false },
    DeskSpec { id: "validator", label: "Validator", x: DESK_X_RIGHT, y: DESK_Y_SECTION_B, facing_up: false },
    // Section C: integration / communication
    DeskSpec { id: "connector", label: "Connector", x: DESK_X_LEFT, y: DESK_Y_SECTION_C, facing_up: true },
    DeskSpec { id: "liaison", label: "Liaison", x: DESK_X_MIDDLE, y: DESK_Y_SECTION_C, facing_up: true },
];

/// Look up a desk by agent id.
#[must_use]
pub fn desk(id: &str) -> Option<&'static DeskSpec> {
    DESKS.iter().find(|d| d.id == id)
}

/// Where an agent stands when present at its desk.
///
/// Unknown ids fall back to the center of the scene; a cosmetic glitch is
/// preferable to failing the frame.
#[must_use]
pub fn agent_position(id: &str) -> Point {
    match desk(id) {
        Some(d) => Point::new(d.x, d.y - AGENT_DESK_OFFSET_Y),
        None => Point::new(OFFICE_WIDTH / 2.0, OFFICE_HEIGHT / 2.0),
    }
}

/// A horizontal strip of walkable floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WalkBand {
    pub min_y: f32,
    pub max_y: f32,
}

/// Walkable strips between the partitions and desk sections.
pub const WALKABLE_BANDS: &[WalkBand] = &[
    WalkBand { min_y: 85.0, max_y: 115.0 },
    WalkBand { min_y: 175.0, max_y: 280.0 },
    WalkBand { min_y: 360.0, max_y: 410.0 },
    WalkBand { min_y: 440.0, max_y: 490.0 },
    WalkBand { min_y: 565.0, max_y: 670.0 },
];

/// Walkable x range (stays left of the lockers and right wall).
pub const WALK_X_MIN: f32 = 30.0;
pub const WALK_X_MAX: f32 = 295.0;

/// Find the band containing `y`, if any.
#[must_use]
pub fn find_band(y: f32) -> Option<WalkBand> {
    WALKABLE_BANDS
        .iter()
        .copied()
        .find(|b| y >= b.min_y && y <= b.max_y)
}

/// The band used when a position does not fall inside any band.
#[must_use]
pub fn default_band() -> WalkBand {
    WALKABLE_BANDS[1]
}

/// Pick a random waypoint inside a band.
///
/// This is the one place true randomness is used: waypoint targets are
/// cosmetic, unlike curve geometry which must be reproducible.
#[must_use]
pub fn waypoint_in_band(band: WalkBand, rng: &mut impl Rng) -> Point {
    let x = rng.gen_range(WALK_X_MIN..=WALK_X_MAX);
    let y = rng.gen_range(band.min_y..=band.max_y);
    Point::new(x, y)
}
