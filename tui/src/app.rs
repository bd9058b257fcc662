//! Main Application
//!
//! The frame loop gluing everything together. Each refresh, in order:
//!
//! 1. Drain the event feed and fold events into [`OfficeState`] (arrival
//!    order preserved)
//! 2. Reconcile status-driven motion transitions, then advance time-driven
//!    completions
//! 3. Ask the [`FrameScheduler`] whether this refresh should prune and/or
//!    redraw
//!
//! The loop never blocks on the feed: the producer only enqueues, and an
//! idle office still refreshes (throttled) so the next live-ness flip is
//! noticed.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use office_core::{AppEvent, FrameScheduler, MotionEngine, OfficeConfig, OfficeState};

use crate::scene::{self, SceneView};

/// Refresh cadence of the loop itself; the scheduler throttles propagation.
const REFRESH_MS: u64 = 16;

/// Main application state.
pub struct App {
    state: OfficeState,
    motion: MotionEngine,
    scheduler: FrameScheduler,
    events: mpsc::Receiver<AppEvent>,
    feed_open: bool,
    show_hud: bool,
    running: bool,
    epoch: Instant,
    last_task_sweep: Instant,
    task_sweep_interval: Duration,
}

impl App {
    #[must_use]
    pub fn new(config: OfficeConfig, events: mpsc::Receiver<AppEvent>) -> Self {
        let scheduler = FrameScheduler::new(&config.scheduler, config.effects.prune_interval());
        let motion = MotionEngine::new(config.motion.clone());
        let task_sweep_interval = config.tasks.sweep_interval();
        let now = Instant::now();

        Self {
            state: OfficeState::new(config),
            motion,
            scheduler,
            events,
            feed_open: true,
            show_hud: false,
            running: true,
            epoch: now,
            last_task_sweep: now,
            task_sweep_interval,
        }
    }

    /// Main event loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        // Render the first frame immediately
        self.draw(terminal, Instant::now())?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events first: quitting must stay responsive
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        if let Event::Key(key) = event {
                            if key.kind == KeyEventKind::Press {
                                self.handle_key(key.code, key.modifiers);
                            }
                        }
                    }
                }

                // Producer events, only while the feed is alive
                maybe_app_event = self.events.recv(), if self.feed_open => {
                    match maybe_app_event {
                        Some(event) => {
                            let now = Instant::now();
                            self.state.apply_event(event, now);
                            // Drain whatever else arrived without waiting
                            while let Ok(event) = self.events.try_recv() {
                                self.state.apply_event(event, now);
                            }
                        }
                        None => {
                            // Feed ended; keep animating what we have
                            self.feed_open = false;
                        }
                    }
                }

                // Display refresh tick
                _ = tokio::time::sleep(Duration::from_millis(REFRESH_MS)) => {}
            }

            self.tick(terminal)?;
        }

        Ok(())
    }

    /// One display refresh.
    fn tick(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let now = Instant::now();

        // Status-driven transitions take effect before time-driven
        // completions are checked
        self.motion
            .reconcile(self.state.agents(), self.state.blocked(), now);
        self.motion.advance(now);

        let live = self.motion.is_live() || self.state.has_pending_visuals();
        let decision = self.scheduler.on_refresh(now, live);

        if decision.prune {
            self.state.effects.prune_expired(now);
            self.state.metrics.prune(now);
        }

        if now.duration_since(self.last_task_sweep) >= self.task_sweep_interval {
            self.last_task_sweep = now;
            self.state.clear_expired_tasks(now);
        }

        if decision.redraw {
            // Transfers are pruned opportunistically by the render consumer
            self.state.transfers.prune_expired(now);
            self.draw(terminal, now)?;
        }

        Ok(())
    }

    fn draw(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        now: Instant,
    ) -> anyhow::Result<()> {
        terminal.draw(|frame| {
            let area = frame.area();
            let view = SceneView {
                state: &self.state,
                motion: &self.motion,
                now,
                epoch: self.epoch,
                show_hud: self.show_hud,
            };
            scene::render(frame.buffer_mut(), area, &view);
        })?;
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.running = false;
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Char('h') => {
                self.show_hud = !self.show_hud;
            }
            _ => {}
        }
    }
}
