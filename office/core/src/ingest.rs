//! Log-Entry Interpretation
//!
//! Pure mapping functions that decide which desk a log entry belongs to and
//! what it should look like: tool name to agent id, tool to document stamp,
//! tool to particle effect, and rate-limit detection. All of these must be
//! stable (same input, same output) because they drive transfer-arc
//! direction and attribution.
//!
//! Workflow mapping:
//! - Explorer: file exploration (Read, Glob)
//! - Analyzer: content analysis (Grep, WebSearch)
//! - Architect: planning (TodoWrite, Task)
//! - Developer: code writing (Write, Edit, NotebookEdit)
//! - Operator: command execution (Bash, general)
//! - Validator: testing (Bash with test/git/jest/vitest/pytest)
//! - Connector: external integrations (WebFetch, mcp__*, Skill)
//! - Liaison: user communication (AskUserQuestion, errors)

use crate::effects::EffectKind;
use crate::events::{AgentStatus, LogEntry, LogEntryType};

/// Fallback desk for tools the table does not know.
pub const FALLBACK_AGENT: &str = "developer";

/// Color used for error bursts.
pub const ERROR_COLOR: u32 = 0xef4444;

/// Keywords that reclassify a generic Bash command to the validator desk.
const VALIDATOR_KEYWORDS: &[&str] = &["test", "git", "jest", "vitest", "pytest"];

/// Case-insensitive fragments that indicate a rate limit was hit.
const LIMIT_PATTERNS: &[&str] = &[
    "limit reached",
    "hit your limit",
    "rate limit",
    "rate_limit",
    "429",
];

/// Workflow category stamped on a flying document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolStamp {
    Explore,
    Analyze,
    Architect,
    Develop,
    Operate,
    Validate,
    Connect,
    Liaison,
    Other,
}

impl ToolStamp {
    /// Four-character stamp label shown on the document.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Explore => "EXPL",
            Self::Analyze => "ANLZ",
            Self::Architect => "ARCH",
            Self::Develop => "DEV",
            Self::Operate => "OPER",
            Self::Validate => "VLDT",
            Self::Connect => "CONN",
            Self::Liaison => "LIAS",
            Self::Other => "????",
        }
    }

    /// Stamp color (0xRRGGBB).
    #[must_use]
    pub fn color(self) -> u32 {
        match self {
            Self::Explore => 0x3b82f6,
            Self::Analyze => 0x06b6d4,
            Self::Architect => 0xf472b6,
            Self::Develop => 0x22c55e,
            Self::Operate => 0xfbbf24,
            Self::Validate => 0xf97316,
            Self::Connect => 0x8b5cf6,
            Self::Liaison => 0xec4899,
            Self::Other => 0x6b7280,
        }
    }
}

fn is_validator_command(content: &str) -> bool {
    let lower = content.to_ascii_lowercase();
    VALIDATOR_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Which desk handles a tool invocation.
///
/// Bash is context-sensitive: validation-flavored commands go to the
/// validator desk, everything else to the operator desk.
#[must_use]
pub fn agent_for_tool(tool_name: &str, content: &str) -> &'static str {
    let tool = tool_name.trim().to_ascii_lowercase();

    match tool.as_str() {
        "read" | "glob" => "explorer",
        "grep" | "websearch" => "analyzer",
        "todowrite" | "task" => "architect",
        "write" | "edit" | "notebookedit" => "developer",
        "bash" => {
            if is_validator_command(content) {
                "validator"
            } else {
                "operator"
            }
        }
        "webfetch" | "skill" => "connector",
        "askuserquestion" => "liaison",
        _ if tool.starts_with("mcp__") => "connector",
        _ => FALLBACK_AGENT,
    }
}

/// Infer the agent an entry belongs to.
///
/// Explicit ids win; otherwise the tool table decides; errors without any
/// tool go to the liaison desk.
#[must_use]
pub fn infer_agent_id(entry: &LogEntry) -> Option<String> {
    if let Some(id) = &entry.agent_id {
        return Some(id.clone());
    }
    if let Some(tool) = &entry.tool_name {
        return Some(agent_for_tool(tool, &entry.content).to_string());
    }
    if entry.entry_type == LogEntryType::Error {
        return Some("liaison".to_string());
    }
    None
}

/// Document stamp for a tool.
#[must_use]
pub fn stamp_for_tool(tool_name: &str) -> ToolStamp {
    let tool = tool_name.trim().to_ascii_lowercase();

    match tool.as_str() {
        "read" | "glob" => ToolStamp::Explore,
        "grep" | "websearch" => ToolStamp::Analyze,
        "todowrite" | "task" => ToolStamp::Architect,
        "write" | "edit" | "notebookedit" => ToolStamp::Develop,
        "bash" => ToolStamp::Operate,
        "webfetch" | "skill" => ToolStamp::Connect,
        "askuserquestion" => ToolStamp::Liaison,
        _ if tool.starts_with("mcp__") => ToolStamp::Connect,
        _ => ToolStamp::Other,
    }
}

/// Particle effect and color for a tool invocation.
#[must_use]
pub fn effect_for_tool(tool_name: &str, content: &str) -> (EffectKind, u32) {
    let tool = tool_name.trim().to_ascii_lowercase();

    match tool.as_str() {
        "glob" | "grep" | "websearch" | "webfetch" => (EffectKind::SearchPulse, 0x06b6d4),
        "bash" => {
            let stamp = if is_validator_command(content) {
                ToolStamp::Validate
            } else {
                ToolStamp::Operate
            };
            (EffectKind::RunSpark, stamp.color())
        }
        _ => {
            let color = stamp_for_tool(&tool).color();
            (EffectKind::TypeParticles, color)
        }
    }
}

/// Status an entry projects onto its agent.
#[must_use]
pub fn status_for_entry(entry_type: LogEntryType) -> AgentStatus {
    match entry_type {
        LogEntryType::ToolCall => AgentStatus::Working,
        LogEntryType::ToolResult => AgentStatus::Idle,
        LogEntryType::Error => AgentStatus::Error,
        LogEntryType::Message => AgentStatus::Thinking,
        _ => AgentStatus::Idle,
    }
}

/// Whether a message indicates the session hit a rate limit.
#[must_use]
pub fn is_limit_reached(content: &str) -> bool {
    let lower = content.to_ascii_lowercase();
    // Fast path before scanning the pattern list
    if !lower.contains("limit") && !lower.contains("429") {
        return false;
    }
    LIMIT_PATTERNS.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(entry_type: LogEntryType, tool: Option<&str>, content: &str) -> LogEntry {
        LogEntry {
            timestamp: String::new(),
            entry_type,
            content: content.to_string(),
            agent_id: None,
            tool_name: tool.map(String::from),
        }
    }

    #[test]
    fn test_tool_table() {
        assert_eq!(agent_for_tool("Read", ""), "explorer");
        assert_eq!(agent_for_tool("Grep", ""), "analyzer");
        assert_eq!(agent_for_tool("TodoWrite", ""), "architect");
        assert_eq!(agent_for_tool("Edit", ""), "developer");
        assert_eq!(agent_for_tool("WebFetch", ""), "connector");
        assert_eq!(agent_for_tool("AskUserQuestion", ""), "liaison");
        assert_eq!(agent_for_tool("mcp__chrome__click", ""), "connector");
        assert_eq!(agent_for_tool("SomethingNew", ""), "developer");
    }

    #[test]
    fn test_bash_reclassification() {
        assert_eq!(agent_for_tool("Bash", "cargo test --workspace"), "validator");
        assert_eq!(agent_for_tool("Bash", "git status"), "validator");
        assert_eq!(agent_for_tool("Bash", "ls -la"), "operator");
    }

    #[test]
    fn test_inference_is_stable() {
        let e = entry(LogEntryType::ToolCall, Some("Bash"), "npm test");
        assert_eq!(infer_agent_id(&e), infer_agent_id(&e));
        assert_eq!(infer_agent_id(&e).as_deref(), Some("validator"));
    }

    #[test]
    fn test_explicit_agent_id_wins() {
        let mut e = entry(LogEntryType::ToolCall, Some("Read"), "");
        e.agent_id = Some("operator".to_string());
        assert_eq!(infer_agent_id(&e).as_deref(), Some("operator"));
    }

    #[test]
    fn test_error_without_tool_goes_to_liaison() {
        let e = entry(LogEntryType::Error, None, "Error: boom");
        assert_eq!(infer_agent_id(&e).as_deref(), Some("liaison"));
    }

    #[test]
    fn test_plain_message_has_no_agent() {
        let e = entry(LogEntryType::Message, None, "hello");
        assert_eq!(infer_agent_id(&e), None);
    }

    #[test]
    fn test_stamps() {
        assert_eq!(stamp_for_tool("Read").label(), "EXPL");
        assert_eq!(stamp_for_tool("grep").label(), "ANLZ");
        assert_eq!(stamp_for_tool("whatever").label(), "????");
    }

    #[test]
    fn test_effect_kinds() {
        assert_eq!(effect_for_tool("Grep", "").0, EffectKind::SearchPulse);
        assert_eq!(effect_for_tool("Bash", "make").0, EffectKind::RunSpark);
        assert_eq!(effect_for_tool("Write", "").0, EffectKind::TypeParticles);
    }

    #[test]
    fn test_status_projection() {
        assert_eq!(status_for_entry(LogEntryType::ToolCall), AgentStatus::Working);
        assert_eq!(status_for_entry(LogEntryType::ToolResult), AgentStatus::Idle);
        assert_eq!(status_for_entry(LogEntryType::Error), AgentStatus::Error);
        assert_eq!(status_for_entry(LogEntryType::Message), AgentStatus::Thinking);
        assert_eq!(status_for_entry(LogEntryType::TodoUpdate), AgentStatus::Idle);
    }

    #[test]
    fn test_limit_detection() {
        assert!(is_limit_reached("Rate limit exceeded, retry later"));
        assert!(is_limit_reached("You've hit your LIMIT for today"));
        assert!(is_limit_reached("HTTP 429 Too Many Requests"));
        assert!(is_limit_reached("usage limit reached"));
        assert!(!is_limit_reached("limitless possibilities"));
        assert!(!is_limit_reached("all good"));
    }
}
