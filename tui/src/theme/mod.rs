//! Color Tables
//!
//! Palette shared by the scene renderers. Values come straight from the
//! office color scheme (0xRRGGBB) and are converted to terminal RGB.

use ratatui::style::Color;

use office_core::{AgentStatus, Mood};

/// Convert a packed 0xRRGGBB value to a terminal color.
#[must_use]
pub fn rgb(hex: u32) -> Color {
    Color::Rgb(
        ((hex >> 16) & 0xff) as u8,
        ((hex >> 8) & 0xff) as u8,
        (hex & 0xff) as u8,
    )
}

/// Primary color for each desk/agent.
#[must_use]
pub fn agent_color(id: &str) -> Color {
    let hex = match id {
        "explorer" => 0x3b82f6,
        "analyzer" => 0x06b6d4,
        "architect" => 0xf472b6,
        "developer" => 0x22c55e,
        "operator" => 0xfbbf24,
        "validator" => 0xf97316,
        "connector" => 0x8b5cf6,
        "liaison" => 0xec4899,
        _ => 0x6b7280,
    };
    rgb(hex)
}

/// Status indicator color.
#[must_use]
pub fn status_color(status: AgentStatus) -> Color {
    let hex = match status {
        AgentStatus::Idle => 0x6b7280,
        AgentStatus::Working => 0x22c55e,
        AgentStatus::Thinking => 0x3b82f6,
        AgentStatus::Passing => 0xa855f7,
        AgentStatus::Error => 0xef4444,
    };
    rgb(hex)
}

/// Face glyph for a mood.
#[must_use]
pub fn mood_glyph(mood: Mood) -> char {
    match mood {
        Mood::Neutral => 'o',
        Mood::Focused => '@',
        Mood::Stressed => 'x',
        Mood::Blocked => 'z',
    }
}

/// Partition, wall and floor accents.
pub const PARTITION: Color = Color::Rgb(0xa3, 0xe6, 0x35);
pub const PARTITION_BORDER: Color = Color::Rgb(0x4d, 0x7c, 0x0f);
pub const WALL: Color = Color::Rgb(0xe7, 0xd8, 0xbf);
pub const FLOOR_TILE: Color = Color::Rgb(0x37, 0x41, 0x51);
pub const FLOOR_TILE_ALT: Color = Color::Rgb(0x2b, 0x33, 0x40);
pub const DESK_WOOD: Color = Color::Rgb(0x8b, 0x5a, 0x2b);
pub const DOCUMENT: Color = Color::Rgb(0xff, 0xff, 0xff);
pub const HUD_TEXT: Color = Color::Rgb(0x9c, 0xa3, 0xaf);
pub const ALERT: Color = Color::Rgb(0xef, 0x44, 0x44);
pub const VACATION_SIGN: Color = Color::Rgb(0xfa, 0xcc, 0x15);
