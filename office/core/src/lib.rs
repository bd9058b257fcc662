//! office-core - Headless motion and state core for the pixel office
//!
//! This crate drives a pixel-art office scene in which desk-bound agent
//! sprites reflect the activity of a software-agent session: they walk in
//! when work starts, wander when idle, hurry back when work resumes, pass
//! documents to each other when attribution switches desks, and emote based
//! on recent activity.
//!
//! # Architecture
//!
//! - **Geometry**: pure math (easing, Bezier paths, deterministic hashing)
//! - **Motion**: the per-agent phase machine and interpolation segments
//! - **Queues**: time-boxed transfers and particle effects
//! - **Mood / Metrics**: derived expression state and the HUD window
//! - **Scheduler**: the adaptive redraw gate shared by every consumer
//! - **State**: the explicit state container + event ingestion adapter
//!
//! The core is synchronous and single-threaded: every operation takes an
//! explicit `Instant` and is O(agents + pending visuals). Rendering and the
//! event feed live in the surface crate.

pub mod config;
pub mod effects;
pub mod events;
pub mod geometry;
pub mod ingest;
pub mod layout;
pub mod metrics;
pub mod mood;
pub mod motion;
pub mod scheduler;
pub mod state;
pub mod transfer;

pub use config::{ConfigError, OfficeConfig};
pub use effects::{EffectKind, EffectQueue, VisualEffect};
pub use events::{Agent, AgentStatus, AppEvent, LogEntry, LogEntryType, WatcherStatus};
pub use geometry::{Easing, Point};
pub use ingest::ToolStamp;
pub use metrics::{HudMetrics, MetricsWindow};
pub use mood::Mood;
pub use motion::{MotionEngine, MotionPhase, MotionPoint, MotionSegment};
pub use scheduler::{FrameDecision, FrameScheduler};
pub use state::OfficeState;
pub use transfer::{DocumentTransfer, TransferQueue};
