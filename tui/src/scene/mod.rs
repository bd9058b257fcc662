//! Scene Renderer
//!
//! Projects the office scene (550x700 scene pixels) onto the terminal grid
//! and draws everything from the sampled core state: floor and partitions,
//! desks, agent sprites, flying documents, particle effects, the status bar
//! and the optional HUD.
//!
//! All drawing is direct buffer cell writes; the renderer holds no state of
//! its own and reads only snapshots, so a frame is consistent from start to
//! finish.

mod particles;

use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use unicode_width::UnicodeWidthChar;

use office_core::geometry::{hash2d, rand01_from_hash, Point};
use office_core::{layout, MotionEngine, OfficeState};

use crate::theme;

/// Everything the renderer needs for one frame.
pub struct SceneView<'a> {
    pub state: &'a OfficeState,
    pub motion: &'a MotionEngine,
    pub now: Instant,
    /// App start; anchors blink phases so they are stable per frame.
    pub epoch: Instant,
    pub show_hud: bool,
}

/// Scene-to-terminal projection for one frame.
struct Projection {
    area: Rect,
}

impl Projection {
    fn new(area: Rect) -> Self {
        Self { area }
    }

    /// Map a scene point to a terminal cell, if it lands inside the area.
    fn cell(&self, p: Point) -> Option<(u16, u16)> {
        if self.area.width == 0 || self.area.height == 0 {
            return None;
        }
        let x = p.x / layout::OFFICE_WIDTH * f32::from(self.area.width);
        let y = p.y / layout::OFFICE_HEIGHT * f32::from(self.area.height);
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let cx = self.area.x + (x as u16).min(self.area.width - 1);
        let cy = self.area.y + (y as u16).min(self.area.height - 1);
        Some((cx, cy))
    }

    /// Terminal row for a scene y coordinate.
    fn row(&self, scene_y: f32) -> Option<u16> {
        self.cell(Point::new(0.0, scene_y)).map(|(_, y)| y)
    }
}

fn put(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

fn put_str(buf: &mut Buffer, area: Rect, x: u16, y: u16, text: &str, style: Style, max_width: u16) {
    let mut cx = x;
    let end = (x + max_width).min(area.x + area.width);
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0) as u16;
        if w == 0 || cx + w > end {
            break;
        }
        put(buf, cx, y, ch, style);
        cx += w;
    }
}

/// Draw one frame of the office.
pub fn render(buf: &mut Buffer, area: Rect, view: &SceneView<'_>) {
    if area.width < 10 || area.height < 8 {
        return;
    }

    // Bottom row is the status bar; everything above is the scene.
    let scene_area = Rect::new(area.x, area.y, area.width, area.height - 1);
    let proj = Projection::new(scene_area);

    draw_background(buf, scene_area, &proj);
    draw_desks(buf, scene_area, &proj, view);
    draw_agents(buf, scene_area, &proj, view);
    draw_transfers(buf, scene_area, &proj, view);
    draw_effects(buf, scene_area, &proj, view);
    draw_status_bar(buf, area, view);
    if view.show_hud {
        draw_hud(buf, scene_area, view);
    }
}

fn draw_background(buf: &mut Buffer, area: Rect, proj: &Projection) {
    let wall_bottom = proj.row(70.0).unwrap_or(area.y);

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if y <= wall_bottom {
                put(buf, x, y, ' ', Style::default().bg(theme::WALL));
                continue;
            }
            // Checkered floor with stable per-cell variation
            let h = hash2d(i32::from(x), i32::from(y));
            let tile = if rand01_from_hash(h) < 0.5 {
                theme::FLOOR_TILE
            } else {
                theme::FLOOR_TILE_ALT
            };
            put(buf, x, y, ' ', Style::default().bg(tile));
        }
    }

    // Partitions between desk sections
    for partition_y in [70.0, 420.0] {
        if let Some(y) = proj.row(partition_y) {
            for x in area.x..area.x + area.width {
                put(
                    buf,
                    x,
                    y,
                    '─',
                    Style::default()
                        .fg(theme::PARTITION)
                        .bg(theme::PARTITION_BORDER),
                );
            }
        }
    }
}

fn draw_desks(buf: &mut Buffer, area: Rect, proj: &Projection, view: &SceneView<'_>) {
    let blink_ms = view.now.duration_since(view.epoch).as_millis();

    for desk in layout::DESKS {
        let Some((x, y)) = proj.cell(Point::new(desk.x, desk.y)) else {
            continue;
        };

        // Desk surface
        let surface = Style::default().fg(theme::DESK_WOOD);
        for dx in 0..5u16 {
            let cx = x.saturating_sub(2) + dx;
            if cx < area.x + area.width {
                put(buf, cx, y, '▄', surface);
            }
        }

        // Status lamp on the desk corner
        let status = view
            .state
            .agents()
            .get(desk.id)
            .map(|a| a.status)
            .unwrap_or_default();
        put(
            buf,
            x.saturating_sub(2),
            y.saturating_sub(1),
            '•',
            Style::default().fg(theme::status_color(status)),
        );

        // Error lamp blinks at 200ms
        if view.state.has_error(desk.id) && (blink_ms / 200) % 2 == 0 {
            put(
                buf,
                x + 2,
                y.saturating_sub(1),
                '!',
                Style::default()
                    .fg(theme::ALERT)
                    .add_modifier(Modifier::BOLD),
            );
        }

        // Vacation sign while the desk's agent is rate-limited
        if view.state.is_blocked(desk.id) {
            put_str(
                buf,
                area,
                x.saturating_sub(2),
                y + 1,
                "[OFF]",
                Style::default().fg(theme::VACATION_SIGN),
                5,
            );
        } else {
            put_str(
                buf,
                area,
                x.saturating_sub(2),
                y + 1,
                desk.label,
                Style::default().fg(theme::agent_color(desk.id)),
                9,
            );
        }
    }
}

fn draw_agents(buf: &mut Buffer, area: Rect, proj: &Projection, view: &SceneView<'_>) {
    for (id, agent) in view.state.agents() {
        if !view.motion.is_visible(id) {
            continue;
        }
        let Some(sample) = view.motion.sample_agent(id, view.now) else {
            continue;
        };
        let Some((x, y)) = proj.cell(Point::new(sample.x, sample.y)) else {
            continue;
        };

        let mood = view.state.mood_of(id, view.now);
        let mut head = Style::default()
            .fg(theme::agent_color(id))
            .add_modifier(Modifier::BOLD);
        let mut body = Style::default().fg(theme::status_color(agent.status));
        if sample.alpha < 1.0 {
            head = head.add_modifier(Modifier::DIM);
            body = body.add_modifier(Modifier::DIM);
        }

        put(buf, x, y, theme::mood_glyph(mood), head);

        // Body leans into the walk direction
        let lean = view.motion.lean_of(id, view.now);
        let torso = if lean > 0.05 {
            '/'
        } else if lean < -0.05 {
            '\\'
        } else {
            '|'
        };
        if y + 1 < area.y + area.height {
            put(buf, x, y + 1, torso, body);
        }

        // Speech bubble with the current task label
        if let Some(task) = &agent.current_task {
            if y > area.y {
                let text: String = task.chars().take(28).collect();
                put_str(
                    buf,
                    area,
                    x + 2,
                    y.saturating_sub(1).max(area.y),
                    &text,
                    Style::default().fg(theme::HUD_TEXT),
                    28,
                );
            }
        }
    }
}

fn draw_transfers(buf: &mut Buffer, area: Rect, proj: &Projection, view: &SceneView<'_>) {
    for transfer in view.state.transfers.snapshot() {
        let progress = view.state.transfers.progress(transfer, view.now);
        if progress >= 1.0 {
            continue;
        }

        let from = view.state.anchor_of(&transfer.from_agent_id);
        let to = view.state.anchor_of(&transfer.to_agent_id);
        let pos = view.state.transfers.arc_position(from, to, progress);
        let Some((x, y)) = proj.cell(pos) else {
            continue;
        };

        put(
            buf,
            x,
            y,
            '▯',
            Style::default()
                .fg(theme::DOCUMENT)
                .add_modifier(Modifier::BOLD),
        );
        if let Some(stamp) = transfer.stamp {
            put_str(
                buf,
                area,
                x + 1,
                y,
                stamp.label(),
                Style::default().fg(theme::rgb(stamp.color())),
                4,
            );
        }
    }
}

fn draw_effects(buf: &mut Buffer, area: Rect, proj: &Projection, view: &SceneView<'_>) {
    for effect in view.state.effects.snapshot() {
        let progress = effect.progress(view.now);
        if progress >= 1.0 {
            continue;
        }
        let anchor = view.state.anchor_of(&effect.agent_id);
        let Some(cell) = proj.cell(anchor) else {
            continue;
        };
        particles::draw(buf, area, cell, effect, progress);
    }
}

fn draw_status_bar(buf: &mut Buffer, area: Rect, view: &SceneView<'_>) {
    let y = area.y + area.height - 1;
    let style = Style::default().fg(theme::HUD_TEXT);
    for x in area.x..area.x + area.width {
        put(buf, x, y, ' ', style);
    }

    let session = view.state.session_id().unwrap_or("-");
    let watcher = match view.state.watcher() {
        Some(w) if w.active => format!("watching {}", w.path),
        Some(w) => format!("watcher inactive ({})", w.path),
        None => "no watcher".to_string(),
    };
    let line = format!(
        " session: {session} | {watcher} | agents: {} | q quit, h hud",
        view.state.agents().len()
    );
    put_str(buf, area, area.x, y, &line, style, area.width);
}

fn draw_hud(buf: &mut Buffer, area: Rect, view: &SceneView<'_>) {
    let metrics = view.state.metrics.metrics(view.now);
    let avg = metrics
        .avg_tool_response_ms
        .map_or("-".to_string(), |ms| format!("{ms}ms"));
    let mut line = format!(
        " tools: {} | avg: {} | errors: {} | switches: {}",
        metrics.tool_call_count, avg, metrics.error_count, metrics.agent_switch_count
    );
    if metrics.rate_limit_active {
        line.push_str(" | RATE LIMITED");
    }

    let style = Style::default()
        .fg(Color::Black)
        .bg(theme::VACATION_SIGN)
        .add_modifier(Modifier::BOLD);
    for x in area.x..area.x + area.width {
        put(buf, x, area.y, ' ', style);
    }
    put_str(buf, area, area.x, area.y, &line, style, area.width);
}

#[cfg(test)]
mod tests {
    use super::*;
    use office_core::events::{Agent, AgentStatus, AppEvent};
    use office_core::{MotionEngine, OfficeConfig, OfficeState};

    fn working_state() -> (OfficeState, MotionEngine, Instant) {
        let config = OfficeConfig::default();
        let mut state = OfficeState::new(config.clone());
        let mut motion = MotionEngine::with_seed(config.motion, 9);
        let now = Instant::now();

        state.apply_event(
            AppEvent::AgentUpdate(Agent {
                id: "developer".to_string(),
                status: AgentStatus::Working,
                current_task: Some("Tool call: Edit".to_string()),
                desk_position: (60.0, 320.0),
            }),
            now,
        );
        motion.reconcile(state.agents(), state.blocked(), now);
        (state, motion, now)
    }

    #[test]
    fn test_render_into_buffer_draws_something() {
        let (state, motion, now) = working_state();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);

        let view = SceneView {
            state: &state,
            motion: &motion,
            now: now + std::time::Duration::from_millis(700),
            epoch: now,
            show_hud: true,
        };
        render(&mut buf, area, &view);

        let non_blank = buf
            .content
            .iter()
            .filter(|cell| cell.symbol() != " ")
            .count();
        assert!(non_blank > 20, "expected a drawn scene, got {non_blank} cells");
    }

    #[test]
    fn test_render_survives_tiny_area() {
        let (state, motion, now) = working_state();
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);

        let view = SceneView {
            state: &state,
            motion: &motion,
            now,
            epoch: now,
            show_hud: false,
        };
        // Must not panic or write out of bounds
        render(&mut buf, area, &view);
    }

    #[test]
    fn test_projection_rejects_offscene_points() {
        let proj = Projection::new(Rect::new(0, 0, 80, 24));
        // Entrance spawn sits above the scene
        assert_eq!(proj.cell(layout::ENTRY_START), None);
        assert!(proj.cell(Point::new(275.0, 350.0)).is_some());
    }
}
