//! HUD Metrics Window
//!
//! A sliding 60-second log of typed events plus tool round-trip durations,
//! backing the optional HUD row. All buffers are rings: capacity is applied
//! on every record, so callers never need to enforce bounds separately.
//!
//! Latency pairing is positional: a tool result closes the oldest pending
//! tool call. Log streams are ordered per source, so positional pairing
//! attributes correctly; a stray unmatched result is simply ignored.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::config::MetricsConfig;

/// Typed events tracked in the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecentEventKind {
    ToolCall,
    Error,
    AgentSwitch,
}

#[derive(Clone, Copy, Debug)]
struct RecentEvent {
    kind: RecentEventKind,
    at: Instant,
}

#[derive(Clone, Copy, Debug)]
struct ToolResponse {
    at: Instant,
    duration: Duration,
}

/// Aggregate metrics over the trailing window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HudMetrics {
    pub tool_call_count: usize,
    pub avg_tool_response_ms: Option<u64>,
    pub error_count: usize,
    pub agent_switch_count: usize,
    pub rate_limit_active: bool,
}

/// Sliding-window event log with bounded rings.
#[derive(Debug)]
pub struct MetricsWindow {
    config: MetricsConfig,
    events: VecDeque<RecentEvent>,
    responses: VecDeque<ToolResponse>,
    pending_calls: VecDeque<Instant>,
    rate_limit_active: bool,
}

impl MetricsWindow {
    #[must_use]
    pub fn new(config: MetricsConfig) -> Self {
        Self {
            config,
            events: VecDeque::new(),
            responses: VecDeque::new(),
            pending_calls: VecDeque::new(),
            rate_limit_active: false,
        }
    }

    pub fn record_tool_call(&mut self, now: Instant) {
        self.push_event(RecentEventKind::ToolCall, now);
        self.pending_calls.push_back(now);
        while self.pending_calls.len() > self.config.max_pending_calls {
            self.pending_calls.pop_front();
        }
    }

    /// Close the oldest pending call and record its round-trip duration.
    pub fn record_tool_result(&mut self, now: Instant) {
        let Some(started_at) = self.pending_calls.pop_front() else {
            return;
        };
        self.responses.push_back(ToolResponse {
            at: now,
            duration: now.saturating_duration_since(started_at),
        });
        while self.responses.len() > self.config.max_responses {
            self.responses.pop_front();
        }
    }

    pub fn record_error(&mut self, now: Instant) {
        self.push_event(RecentEventKind::Error, now);
    }

    pub fn record_agent_switch(&mut self, now: Instant) {
        self.push_event(RecentEventKind::AgentSwitch, now);
    }

    pub fn set_rate_limit_active(&mut self, active: bool) {
        self.rate_limit_active = active;
    }

    fn push_event(&mut self, kind: RecentEventKind, at: Instant) {
        self.events.push_back(RecentEvent { kind, at });
        while self.events.len() > self.config.max_events {
            self.events.pop_front();
        }
    }

    /// Drop everything older than the window.
    pub fn prune(&mut self, now: Instant) {
        let Some(cutoff) = now.checked_sub(self.config.window()) else {
            return;
        };
        while self.events.front().is_some_and(|e| e.at <= cutoff) {
            self.events.pop_front();
        }
        while self.responses.front().is_some_and(|r| r.at <= cutoff) {
            self.responses.pop_front();
        }
        while self.pending_calls.front().is_some_and(|&at| at <= cutoff) {
            self.pending_calls.pop_front();
        }
    }

    /// Snapshot the aggregates over the trailing window ending at `now`.
    #[must_use]
    pub fn metrics(&self, now: Instant) -> HudMetrics {
        let cutoff = now.checked_sub(self.config.window());
        let in_window = |at: Instant| cutoff.is_none_or(|c| at > c);

        let mut tool_call_count = 0;
        let mut error_count = 0;
        let mut agent_switch_count = 0;
        for event in self.events.iter().filter(|e| in_window(e.at)) {
            match event.kind {
                RecentEventKind::ToolCall => tool_call_count += 1,
                RecentEventKind::Error => error_count += 1,
                RecentEventKind::AgentSwitch => agent_switch_count += 1,
            }
        }

        let windowed: Vec<&ToolResponse> = self
            .responses
            .iter()
            .filter(|r| in_window(r.at))
            .collect();
        let avg_tool_response_ms = if windowed.is_empty() {
            None
        } else {
            let total: u128 = windowed.iter().map(|r| r.duration.as_millis()).sum();
            Some((total / windowed.len() as u128) as u64)
        };

        HudMetrics {
            tool_call_count,
            avg_tool_response_ms,
            error_count,
            agent_switch_count,
            rate_limit_active: self.rate_limit_active,
        }
    }
}
