//! Particle Drawing
//!
//! Terminal renditions of the four effect kinds. Particle placement mixes
//! the effect's seed with the particle index through integer arithmetic, so
//! redrawing the same frame puts every particle in the same cell.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use office_core::geometry::Easing;
use office_core::{EffectKind, VisualEffect};

use crate::theme;

/// Draw one effect anchored at a terminal cell.
pub fn draw(
    buf: &mut Buffer,
    area: Rect,
    anchor: (u16, u16),
    effect: &VisualEffect,
    progress: f32,
) {
    let style = Style::default().fg(theme::rgb(effect.color));
    match effect.kind {
        EffectKind::SearchPulse => search_pulse(buf, area, anchor, progress, style),
        EffectKind::TypeParticles => type_particles(buf, area, anchor, effect.seed, progress, style),
        EffectKind::RunSpark => run_spark(buf, area, anchor, effect.seed, progress, style),
        EffectKind::ErrorBurst => error_burst(buf, area, anchor, effect.seed, progress, style),
    }
}

fn plot(buf: &mut Buffer, area: Rect, x: i32, y: i32, ch: char, style: Style) {
    if x < i32::from(area.x)
        || y < i32::from(area.y)
        || x >= i32::from(area.x) + i32::from(area.width)
        || y >= i32::from(area.y) + i32::from(area.height)
    {
        return;
    }
    if let Some(cell) = buf.cell_mut((x as u16, y as u16)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

fn mix(seed: u32, factor: u32, index: u32, salt: u32) -> u32 {
    seed.wrapping_mul(factor)
        .wrapping_add(index.wrapping_mul(salt))
}

/// Expanding concentric ring.
fn search_pulse(buf: &mut Buffer, area: Rect, (x, y): (u16, u16), progress: f32, style: Style) {
    let radius = (progress * 5.0).max(1.0);
    let points = 12;
    let faded = if progress > 0.6 {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    };

    for i in 0..points {
        let angle = i as f32 / points as f32 * std::f32::consts::TAU;
        // Terminal cells are about twice as tall as wide
        let px = i32::from(x) + (angle.cos() * radius).round() as i32;
        let py = i32::from(y) + (angle.sin() * radius * 0.5).round() as i32;
        plot(buf, area, px, py, '·', faded);
    }
}

/// Particles drifting upward.
fn type_particles(
    buf: &mut Buffer,
    area: Rect,
    (x, y): (u16, u16),
    seed: u32,
    progress: f32,
    style: Style,
) {
    let count = 6;
    for i in 0..count {
        let h = mix(seed, 31, i, 17);
        let offset_x = (h % 7) as i32 - 3;
        let wobble = ((h >> 8) % 2) as i32;
        let rise = (progress * 3.0) as i32 + wobble;
        let ch = if (h >> 16) % 2 == 0 { '·' } else { '˙' };
        plot(
            buf,
            area,
            i32::from(x) + offset_x,
            i32::from(y) - 1 - rise,
            ch,
            style,
        );
    }
}

/// Radial spark flash.
fn run_spark(
    buf: &mut Buffer,
    area: Rect,
    (x, y): (u16, u16),
    seed: u32,
    progress: f32,
    style: Style,
) {
    let rays = 8;
    let dist = 1.0 + progress * 3.0;
    for i in 0..rays {
        let jitter = (mix(seed, 13, i, 7) % 100) as f32 * 0.01;
        let angle = i as f32 / rays as f32 * std::f32::consts::TAU + jitter;
        let px = i32::from(x) + (angle.cos() * dist).round() as i32;
        let py = i32::from(y) + (angle.sin() * dist * 0.5).round() as i32;
        plot(buf, area, px, py, '*', style);
    }
    if progress < 0.4 {
        plot(
            buf,
            area,
            i32::from(x),
            i32::from(y),
            '+',
            style.add_modifier(Modifier::BOLD),
        );
    }
}

/// Explosive burst with a brief center flash.
fn error_burst(
    buf: &mut Buffer,
    area: Rect,
    (x, y): (u16, u16),
    seed: u32,
    progress: f32,
    style: Style,
) {
    let shards = 10;
    let dist = Easing::OutCubic.apply(progress) * 4.0;
    for i in 0..shards {
        let h = mix(seed, 23, i, 37);
        let spread = ((h % 50) as f32 / 50.0 - 0.5) * 0.5;
        let angle = i as f32 / shards as f32 * std::f32::consts::TAU + spread;
        let px = i32::from(x) + (angle.cos() * dist).round() as i32;
        let py = i32::from(y) + (angle.sin() * dist * 0.5).round() as i32;
        plot(buf, area, px, py, 'x', style);
    }
    if progress < 0.3 {
        plot(
            buf,
            area,
            i32::from(x),
            i32::from(y),
            '!',
            style.add_modifier(Modifier::BOLD),
        );
    }
}
