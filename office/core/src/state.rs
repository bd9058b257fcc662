//! Office State Container
//!
//! The single source of truth for everything outside the motion engine:
//! agent status, blocked/error flags, recency timestamps, the transfer and
//! effect queues, the metrics window, and session/watcher bookkeeping.
//!
//! The ingestion adapter lives here as [`OfficeState::apply_event`]: the
//! external producer only enqueues events, and the frame loop folds them in
//! arrival order before reconciling motion. State machines are
//! level-triggered on current fields, so a missed or duplicated event
//! self-corrects on the next consistent one.

use std::collections::HashMap;
use std::time::Instant;

use crate::config::OfficeConfig;
use crate::effects::{EffectKind, EffectQueue};
use crate::events::{Agent, AgentStatus, AppEvent, LogEntry, LogEntryType, WatcherStatus};
use crate::geometry::Point;
use crate::ingest;
use crate::layout;
use crate::metrics::MetricsWindow;
use crate::mood::{self, Mood};
use crate::transfer::TransferQueue;

/// Task labels longer than this are cut for the speech bubble.
const TASK_LABEL_MAX_CHARS: usize = 200;

/// Shared mutable state, owned by the frame loop.
#[derive(Debug)]
pub struct OfficeState {
    config: OfficeConfig,
    agents: HashMap<String, Agent>,
    blocked: HashMap<String, bool>,
    errors: HashMap<String, bool>,
    last_tool_call_at: HashMap<String, Instant>,
    last_error_at: HashMap<String, Instant>,
    last_task_update_at: HashMap<String, Instant>,
    last_active_agent: Option<String>,
    pub transfers: TransferQueue,
    pub effects: EffectQueue,
    pub metrics: MetricsWindow,
    session_id: Option<String>,
    watcher: Option<WatcherStatus>,
}

impl OfficeState {
    #[must_use]
    pub fn new(config: OfficeConfig) -> Self {
        let transfers = TransferQueue::new(
            config.transfers.capacity,
            config.transfers.duration(),
            config.transfers.arc_height,
        );
        let effects = EffectQueue::new(config.effects.default_duration());
        let metrics = MetricsWindow::new(config.metrics.clone());

        Self {
            config,
            agents: HashMap::new(),
            blocked: HashMap::new(),
            errors: HashMap::new(),
            last_tool_call_at: HashMap::new(),
            last_error_at: HashMap::new(),
            last_task_update_at: HashMap::new(),
            last_active_agent: None,
            transfers,
            effects,
            metrics,
            session_id: None,
            watcher: None,
        }
    }

    /// Fold one producer event into the state.
    pub fn apply_event(&mut self, event: AppEvent, now: Instant) {
        match event {
            AppEvent::LogEntry(entry) => self.apply_log(&entry, now),
            AppEvent::AgentUpdate(agent) => self.apply_agent(agent, now),
            AppEvent::SessionStart { session_id } => {
                tracing::info!(%session_id, "session started");
                self.session_id = Some(session_id);
            }
            AppEvent::SessionEnd => {
                tracing::info!("session ended");
                self.session_id = None;
                self.reset_all_to_idle();
            }
            AppEvent::WatcherStatus(status) => {
                self.watcher = Some(status);
            }
            AppEvent::BatchUpdate { logs, agents } => {
                // Same per-entry logic as individual events, in array order
                for entry in logs {
                    self.apply_log(&entry, now);
                }
                for agent in agents {
                    self.apply_agent(agent, now);
                }
            }
        }
    }

    fn apply_log(&mut self, entry: &LogEntry, now: Instant) {
        let agent_id = ingest::infer_agent_id(entry);

        match entry.entry_type {
            LogEntryType::ToolCall => {
                self.metrics.record_tool_call(now);

                if let Some(id) = &agent_id {
                    self.note_activity(id, now);

                    if let Some(tool) = &entry.tool_name {
                        let (kind, color) = ingest::effect_for_tool(tool, &entry.content);
                        self.effects.enqueue(id.clone(), kind, color, None, now);
                    }

                    // Attribution moved between desks: fly a document
                    if let Some(prev) = self.last_active_agent.clone() {
                        if prev != *id {
                            self.metrics.record_agent_switch(now);
                            let stamp = entry.tool_name.as_deref().map(ingest::stamp_for_tool);
                            self.transfers.enqueue(prev, id.clone(), stamp, now);
                        }
                    }
                    self.last_active_agent = Some(id.clone());
                }
            }
            LogEntryType::ToolResult => {
                self.metrics.record_tool_result(now);
                if let Some(id) = &agent_id {
                    self.note_activity(id, now);
                }
            }
            LogEntryType::Error => {
                self.metrics.record_error(now);
                if let Some(id) = &agent_id {
                    self.errors.insert(id.clone(), true);
                    self.last_error_at.insert(id.clone(), now);
                    self.effects.enqueue(
                        id.clone(),
                        EffectKind::ErrorBurst,
                        ingest::ERROR_COLOR,
                        None,
                        now,
                    );
                }
            }
            _ => {}
        }

        if ingest::is_limit_reached(&entry.content) {
            // Blame the inferred agent, falling back to whoever acted last
            let target = agent_id.or_else(|| self.last_active_agent.clone());
            self.metrics.set_rate_limit_active(true);
            if let Some(id) = target {
                tracing::warn!(agent = %id, "rate limit detected, blocking agent");
                self.blocked.insert(id, true);
            }
        }
    }

    /// Stamp activity for an agent and clear its blocked/error flags.
    ///
    /// Real activity is what ends a rate-limit pause.
    fn note_activity(&mut self, id: &str, now: Instant) {
        self.last_tool_call_at.insert(id.to_string(), now);
        self.errors.remove(id);
        if self.blocked.remove(id).is_some() && !self.blocked.values().any(|&b| b) {
            self.metrics.set_rate_limit_active(false);
        }
    }

    fn apply_agent(&mut self, mut agent: Agent, now: Instant) {
        // First-appearance gating: an agent we have never seen working does
        // not belong in the office yet.
        if !self.agents.contains_key(&agent.id) && agent.status == AgentStatus::Idle {
            return;
        }

        if let Some(task) = &agent.current_task {
            if task.chars().count() > TASK_LABEL_MAX_CHARS {
                agent.current_task = Some(task.chars().take(TASK_LABEL_MAX_CHARS).collect());
            }
        }

        let task_changed = self
            .agents
            .get(&agent.id)
            .map_or(true, |prev| prev.current_task != agent.current_task);
        if task_changed && agent.current_task.is_some() {
            self.last_task_update_at.insert(agent.id.clone(), now);
        }

        self.agents.insert(agent.id.clone(), agent);
    }

    /// Background sweep: drop task labels that have gone stale.
    pub fn clear_expired_tasks(&mut self, now: Instant) {
        let timeout = self.config.tasks.label_timeout();
        let expired: Vec<String> = self
            .last_task_update_at
            .iter()
            .filter(|(_, &at)| now.saturating_duration_since(at) > timeout)
            .map(|(id, _)| id.clone())
            .collect();

        for id in expired {
            self.last_task_update_at.remove(&id);
            if let Some(agent) = self.agents.get_mut(&id) {
                agent.current_task = None;
            }
        }
    }

    /// Session over: everyone back to idle, bubbles cleared.
    fn reset_all_to_idle(&mut self) {
        for agent in self.agents.values_mut() {
            agent.status = AgentStatus::Idle;
            agent.current_task = None;
        }
        self.last_task_update_at.clear();
    }

    /// Mood for an agent right now.
    #[must_use]
    pub fn mood_of(&self, id: &str, now: Instant) -> Mood {
        mood::compute(
            self.is_blocked(id),
            self.errors.get(id).copied().unwrap_or(false),
            self.last_error_at.get(id).copied(),
            self.last_tool_call_at.get(id).copied(),
            now,
            &self.config.mood,
        )
    }

    /// Stand position for an agent: the static desk table when the id is
    /// known, the reported desk position otherwise.
    #[must_use]
    pub fn anchor_of(&self, id: &str) -> Point {
        if layout::desk(id).is_some() {
            return layout::agent_position(id);
        }
        match self.agents.get(id) {
            Some(agent) => Point::new(agent.desk_position.0, agent.desk_position.1 - 55.0),
            None => layout::agent_position(id),
        }
    }

    #[must_use]
    pub fn agents(&self) -> &HashMap<String, Agent> {
        &self.agents
    }

    #[must_use]
    pub fn blocked(&self) -> &HashMap<String, bool> {
        &self.blocked
    }

    #[must_use]
    pub fn is_blocked(&self, id: &str) -> bool {
        self.blocked.get(id).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn has_error(&self, id: &str) -> bool {
        self.errors.get(id).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    #[must_use]
    pub fn watcher(&self) -> Option<&WatcherStatus> {
        self.watcher.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &OfficeConfig {
        &self.config
    }

    /// Liveness of the transient queues (for the scheduler).
    #[must_use]
    pub fn has_pending_visuals(&self) -> bool {
        !self.transfers.is_empty() || !self.effects.is_empty()
    }
}
