//! TOML Configuration
//!
//! Centralized tunables for the office, loaded from
//! `$XDG_CONFIG_HOME/pixel-office/office.toml` (typically
//! `~/.config/pixel-office/office.toml`). Every bound and timing constant
//! that could need different headroom at a different event rate lives here
//! rather than being hard-coded.
//!
//! A missing file yields the defaults; a malformed file is an error.
//!
//! # Example Configuration
//!
//! ```toml
//! [motion]
//! walk_speed_px_per_sec = 35.0
//! walk_pause_min_ms = 2000
//! walk_pause_max_ms = 4000
//!
//! [transfers]
//! capacity = 8
//! duration_ms = 600
//!
//! [metrics]
//! window_ms = 60000
//! max_events = 2000
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Motion engine tunables.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Entrance walk-in duration.
    pub enter_duration_ms: u64,
    /// Wandering speed along the sampled Bezier arc.
    pub walk_speed_px_per_sec: f32,
    /// Floor for walking segments; also guards the progress division.
    pub walk_min_duration_ms: u64,
    /// Stand-still pause between waypoints (uniform range).
    pub walk_pause_min_ms: u64,
    pub walk_pause_max_ms: u64,
    /// Return-to-desk speed.
    pub return_speed_px_per_sec: f32,
    /// Clamp range for return segments.
    pub return_min_duration_ms: u64,
    pub return_max_duration_ms: u64,
    /// How bowed walking paths are (0 = straight).
    pub curve_strength: f32,
    /// Maximum body lean in radians (~15 degrees).
    pub lean_max_angle: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            enter_duration_ms: 700,
            walk_speed_px_per_sec: 35.0,
            walk_min_duration_ms: 800,
            walk_pause_min_ms: 2000,
            walk_pause_max_ms: 4000,
            return_speed_px_per_sec: 60.0,
            return_min_duration_ms: 300,
            return_max_duration_ms: 800,
            curve_strength: 0.25,
            lean_max_angle: 0.26,
        }
    }
}

/// Flying-document transfer tunables.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Oldest entries are dropped once the queue exceeds this.
    pub capacity: usize,
    /// Display duration of one transfer.
    pub duration_ms: u64,
    /// Peak height of the document arc, in scene pixels.
    pub arc_height: f32,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            capacity: 8,
            duration_ms: 600,
            arc_height: 60.0,
        }
    }
}

/// Particle effect tunables.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Duration used when the trigger does not specify one.
    pub default_duration_ms: u64,
    /// Sweep cadence for expired effects.
    pub prune_interval_ms: u64,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 700,
            prune_interval_ms: 500,
        }
    }
}

/// Mood derivation windows.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodConfig {
    /// Recent activity inside this window reads as focused.
    pub focused_window_ms: u64,
    /// Recent errors inside this window read as stressed.
    pub stressed_window_ms: u64,
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            focused_window_ms: 2000,
            stressed_window_ms: 5000,
        }
    }
}

/// HUD metrics window tunables.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Trailing window over which metrics are computed.
    pub window_ms: u64,
    /// Ring capacity for typed events.
    pub max_events: usize,
    /// Ring capacity for tool round-trip samples.
    pub max_responses: usize,
    /// Cap on tool calls awaiting a result.
    pub max_pending_calls: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            window_ms: 60_000,
            max_events: 2000,
            max_responses: 2000,
            max_pending_calls: 200,
        }
    }
}

/// Frame scheduler tunables.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Minimum interval between propagated updates while anything animates.
    pub active_interval_ms: u64,
    /// Minimum interval while the scene is fully idle.
    pub idle_interval_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            active_interval_ms: 16,
            idle_interval_ms: 200,
        }
    }
}

/// Task-label (speech bubble) tunables.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// A label is cleared after this long without an update.
    pub label_timeout_ms: u64,
    /// How often the expiry sweep runs.
    pub sweep_interval_ms: u64,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            label_timeout_ms: 5000,
            sweep_interval_ms: 1000,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OfficeConfig {
    pub motion: MotionConfig,
    pub transfers: TransferConfig,
    pub effects: EffectConfig,
    pub mood: MoodConfig,
    pub metrics: MetricsConfig,
    pub scheduler: SchedulerConfig,
    pub tasks: TaskConfig,
}

impl OfficeConfig {
    /// XDG-compliant path of the config file.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pixel-office").join("office.toml"))
    }

    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded office configuration");
        Ok(config)
    }
}

impl MotionConfig {
    #[must_use]
    pub fn enter_duration(&self) -> Duration {
        Duration::from_millis(self.enter_duration_ms)
    }
}

impl TransferConfig {
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl EffectConfig {
    #[must_use]
    pub fn default_duration(&self) -> Duration {
        Duration::from_millis(self.default_duration_ms)
    }

    #[must_use]
    pub fn prune_interval(&self) -> Duration {
        Duration::from_millis(self.prune_interval_ms)
    }
}

impl MoodConfig {
    #[must_use]
    pub fn focused_window(&self) -> Duration {
        Duration::from_millis(self.focused_window_ms)
    }

    #[must_use]
    pub fn stressed_window(&self) -> Duration {
        Duration::from_millis(self.stressed_window_ms)
    }
}

impl MetricsConfig {
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl TaskConfig {
    #[must_use]
    pub fn label_timeout(&self) -> Duration {
        Duration::from_millis(self.label_timeout_ms)
    }

    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_scene_tuning() {
        let config = OfficeConfig::default();
        assert_eq!(config.motion.enter_duration_ms, 700);
        assert_eq!(config.motion.walk_min_duration_ms, 800);
        assert_eq!(config.transfers.capacity, 8);
        assert_eq!(config.transfers.duration_ms, 600);
        assert_eq!(config.metrics.max_events, 2000);
        assert_eq!(config.metrics.max_pending_calls, 200);
        assert_eq!(config.scheduler.active_interval_ms, 16);
        assert_eq!(config.scheduler.idle_interval_ms, 200);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[motion]\nwalk_speed_px_per_sec = 50.0\n\n[transfers]\ncapacity = 4\n"
        )
        .unwrap();

        let config = OfficeConfig::load_from(file.path()).unwrap();
        assert_eq!(config.motion.walk_speed_px_per_sec, 50.0);
        assert_eq!(config.transfers.capacity, 4);
        // Untouched sections fall back to defaults
        assert_eq!(config.motion.enter_duration_ms, 700);
        assert_eq!(config.transfers.duration_ms, 600);
        assert_eq!(config.mood.stressed_window_ms, 5000);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[motion\nbroken").unwrap();

        let result = OfficeConfig::load_from(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let result = OfficeConfig::load_from(std::path::Path::new("/nonexistent/office.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
