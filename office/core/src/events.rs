//! Inbound Event Contract
//!
//! Typed events delivered by the external log-watching producer. The office
//! never talks back to the producer; these are a one-way feed folded into
//! [`crate::state::OfficeState`] in arrival order.
//!
//! The wire shape is an externally tagged envelope (`{"type": ..,
//! "payload": ..}`) so a batch and its individual events round-trip through
//! the same serde representation.

use serde::{Deserialize, Serialize};

/// Classification of a log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogEntryType {
    ToolCall,
    ToolResult,
    Message,
    Error,
    TodoUpdate,
    SessionStart,
    SessionEnd,
}

/// One parsed log line from the watched session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogEntry {
    /// Raw timestamp text from the log; opaque to the office (the animation
    /// clock is monotonic and local).
    pub timestamp: String,
    pub entry_type: LogEntryType,
    pub content: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub tool_name: Option<String>,
}

/// What an agent is currently doing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Idle,
    Working,
    Thinking,
    Passing,
    Error,
}

/// A tracked agent as reported by the producer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub status: AgentStatus,
    #[serde(default)]
    pub current_task: Option<String>,
    /// Desk anchor in scene coordinates; used only for ids the static desk
    /// table does not know.
    pub desk_position: (f32, f32),
}

/// Health of the external log watcher.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WatcherStatus {
    pub active: bool,
    pub path: String,
}

/// Envelope for everything the producer can deliver.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum AppEvent {
    LogEntry(LogEntry),
    AgentUpdate(Agent),
    SessionStart { session_id: String },
    SessionEnd,
    WatcherStatus(WatcherStatus),
    /// Coalesced form for high-throughput periods. Folded through the same
    /// per-entry logic as individual events, in array order.
    BatchUpdate { logs: Vec<LogEntry>, agents: Vec<Agent> },
}
