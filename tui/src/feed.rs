//! Event Feed
//!
//! The seam to the external producer. Events arrive as JSONL, one per line:
//! either full `AppEvent` envelopes, or raw session-log lines which are
//! parsed here and paired with the agent update they imply, matching what a
//! full log watcher would emit.
//!
//! The feed only enqueues: it never touches office state, and the channel is
//! drained by the frame loop in arrival order.

use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use office_core::events::{Agent, AppEvent, LogEntry, LogEntryType, WatcherStatus};
use office_core::{ingest, layout};

/// How often the file tail is re-polled once EOF is reached.
const TAIL_POLL_MS: u64 = 500;

/// Task labels are cut to this many characters at the source.
const TASK_SUMMARY_MAX_CHARS: usize = 200;

/// Spawn the feed task; events arrive on the returned channel.
///
/// With a path the feed follows the file as it grows; otherwise it reads
/// stdin until EOF.
pub fn spawn(path: Option<PathBuf>) -> mpsc::Receiver<AppEvent> {
    let (tx, rx) = mpsc::channel(256);

    tokio::spawn(async move {
        let result = match path {
            Some(path) => follow_file(path, tx).await,
            None => read_stdin(tx).await,
        };
        if let Err(e) = result {
            tracing::error!("event feed stopped: {e}");
        }
    });

    rx
}

async fn follow_file(path: PathBuf, tx: mpsc::Sender<AppEvent>) -> anyhow::Result<()> {
    let display_path = path.display().to_string();

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => {
            let _ = tx
                .send(AppEvent::WatcherStatus(WatcherStatus {
                    active: true,
                    path: display_path,
                }))
                .await;
            file
        }
        Err(e) => {
            let _ = tx
                .send(AppEvent::WatcherStatus(WatcherStatus {
                    active: false,
                    path: display_path,
                }))
                .await;
            return Err(e.into());
        }
    };

    let mut reader = BufReader::new(file);
    let mut line = String::new();
    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            // At EOF; wait for the file to grow
            tokio::time::sleep(Duration::from_millis(TAIL_POLL_MS)).await;
            continue;
        }
        for event in events_for_line(line.trim()) {
            if tx.send(event).await.is_err() {
                return Ok(());
            }
        }
    }
}

async fn read_stdin(tx: mpsc::Sender<AppEvent>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        for event in events_for_line(line.trim()) {
            if tx.send(event).await.is_err() {
                return Ok(());
            }
        }
    }
    tracing::info!("event feed reached EOF");
    Ok(())
}

/// Turn one input line into the events it implies.
///
/// Full envelopes pass through unchanged. Raw log lines yield the parsed
/// entry plus the agent update it implies, so a plain session log animates
/// the office on its own.
pub fn events_for_line(line: &str) -> Vec<AppEvent> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }

    if let Ok(event) = serde_json::from_str::<AppEvent>(line) {
        return vec![event];
    }

    let Some(entry) = parse_session_line(line) else {
        return Vec::new();
    };

    let mut events = vec![AppEvent::LogEntry(entry.clone())];
    if let Some(agent) = derive_agent_update(&entry) {
        events.push(AppEvent::AgentUpdate(agent));
    }
    events
}

/// Parse one raw session-log line.
///
/// JSON session records are preferred; anything else falls back to text
/// heuristics.
fn parse_session_line(line: &str) -> Option<LogEntry> {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(line) {
        let entry_type = match json.get("type").and_then(|v| v.as_str()) {
            Some("tool_use") => LogEntryType::ToolCall,
            Some("tool_result") => LogEntryType::ToolResult,
            Some("error") => LogEntryType::Error,
            _ => LogEntryType::Message,
        };

        let tool_name = json
            .get("name")
            .or_else(|| json.get("tool"))
            .and_then(|v| v.as_str())
            .map(String::from);

        let content = json
            .get("content")
            .or_else(|| json.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let timestamp = json
            .get("timestamp")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        return Some(LogEntry {
            timestamp,
            entry_type,
            content,
            agent_id: json
                .get("agent_id")
                .and_then(|v| v.as_str())
                .map(String::from),
            tool_name,
        });
    }

    parse_text_line(line)
}

fn parse_text_line(line: &str) -> Option<LogEntry> {
    let (timestamp, content) = split_timestamp(line);
    if content.is_empty() {
        return None;
    }

    let (entry_type, tool_name) = classify_text(content);
    Some(LogEntry {
        timestamp: timestamp.unwrap_or_default(),
        entry_type,
        content: content.to_string(),
        agent_id: None,
        tool_name,
    })
}

/// Pull a leading `YYYY-MM-DD HH:MM:SS`-style timestamp off the line.
fn split_timestamp(line: &str) -> (Option<String>, &str) {
    if line.len() >= 19
        && line.is_char_boundary(19)
        && line.chars().take(4).all(|c| c.is_ascii_digit())
    {
        let candidate = &line[..19];
        if candidate.contains('-') && (candidate.contains(':') || candidate.contains('T')) {
            return (Some(candidate.to_string()), line[19..].trim_start());
        }
    }
    (None, line)
}

fn classify_text(content: &str) -> (LogEntryType, Option<String>) {
    if let Some(rest) = content.strip_prefix("Tool call: ") {
        let tool_name = rest.split_whitespace().next().map(String::from);
        return (LogEntryType::ToolCall, tool_name);
    }
    if let Some(rest) = content.strip_prefix("Tool result: ") {
        let tool_name = rest.split_whitespace().next().map(String::from);
        return (LogEntryType::ToolResult, tool_name);
    }

    if content.contains("[ERROR]")
        || content.contains("[error]")
        || content.contains("Error:")
        || content.contains("error:")
    {
        return (LogEntryType::Error, None);
    }

    if content.contains("TodoWrite") || content.contains("TODO") {
        return (LogEntryType::TodoUpdate, Some("TodoWrite".to_string()));
    }

    (LogEntryType::Message, None)
}

/// The agent update a raw entry implies: who handles it, doing what.
fn derive_agent_update(entry: &LogEntry) -> Option<Agent> {
    let id = ingest::infer_agent_id(entry)?;
    let desk = layout::desk(&id)
        .map(|d| (d.x, d.y))
        .unwrap_or((layout::OFFICE_WIDTH / 2.0, layout::OFFICE_HEIGHT / 2.0));

    Some(Agent {
        status: ingest::status_for_entry(entry.entry_type),
        current_task: Some(summarize_task(entry)),
        desk_position: desk,
        id,
    })
}

fn summarize_task(entry: &LogEntry) -> String {
    let summary = match entry.entry_type {
        LogEntryType::ToolCall => match entry.tool_name.as_deref() {
            Some(name) => format!("Tool call: {name}"),
            None => "Tool call".to_string(),
        },
        LogEntryType::ToolResult => match entry.tool_name.as_deref() {
            Some(name) => format!("Tool result: {name}"),
            None => "Tool result".to_string(),
        },
        LogEntryType::TodoUpdate => "Todo update".to_string(),
        LogEntryType::Error => "Error".to_string(),
        _ => entry.content.clone(),
    };
    summary.chars().take(TASK_SUMMARY_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use office_core::events::AgentStatus;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_envelope_passes_through() {
        let line = r#"{"type": "SessionStart", "payload": {"session_id": "s1"}}"#;
        let events = events_for_line(line);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            AppEvent::SessionStart { session_id } if session_id == "s1"
        ));
    }

    #[test]
    fn test_session_json_yields_entry_and_update() {
        let line = r#"{"type": "tool_use", "name": "Read", "content": "src/lib.rs"}"#;
        let events = events_for_line(line);
        assert_eq!(events.len(), 2);

        match &events[0] {
            AppEvent::LogEntry(entry) => {
                assert_eq!(entry.entry_type, LogEntryType::ToolCall);
                assert_eq!(entry.tool_name.as_deref(), Some("Read"));
            }
            other => panic!("expected LogEntry, got {other:?}"),
        }
        match &events[1] {
            AppEvent::AgentUpdate(agent) => {
                assert_eq!(agent.id, "explorer");
                assert_eq!(agent.status, AgentStatus::Working);
                assert_eq!(agent.current_task.as_deref(), Some("Tool call: Read"));
            }
            other => panic!("expected AgentUpdate, got {other:?}"),
        }
    }

    #[test]
    fn test_text_tool_call_with_timestamp() {
        let events = events_for_line("2025-11-02 10:15:00 Tool call: Bash cargo test");
        assert_eq!(events.len(), 2);
        match &events[0] {
            AppEvent::LogEntry(entry) => {
                assert_eq!(entry.timestamp, "2025-11-02 10:15:00");
                assert_eq!(entry.tool_name.as_deref(), Some("Bash"));
            }
            other => panic!("expected LogEntry, got {other:?}"),
        }
        // "cargo test" routes Bash to the validator desk
        match &events[1] {
            AppEvent::AgentUpdate(agent) => assert_eq!(agent.id, "validator"),
            other => panic!("expected AgentUpdate, got {other:?}"),
        }
    }

    #[test]
    fn test_error_line() {
        let events = events_for_line("Error: connection refused");
        match &events[0] {
            AppEvent::LogEntry(entry) => assert_eq!(entry.entry_type, LogEntryType::Error),
            other => panic!("expected LogEntry, got {other:?}"),
        }
        match &events[1] {
            AppEvent::AgentUpdate(agent) => {
                assert_eq!(agent.id, "liaison");
                assert_eq!(agent.status, AgentStatus::Error);
            }
            other => panic!("expected AgentUpdate, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_message_has_no_agent_update() {
        let events = events_for_line("thinking about the next step");
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], AppEvent::LogEntry(_)));
    }

    #[test]
    fn test_empty_line_is_skipped() {
        assert!(events_for_line("").is_empty());
        assert!(events_for_line("   ").is_empty());
    }
}
