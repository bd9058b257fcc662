//! office-tui - Terminal surface for the pixel office
//!
//! A full-screen terminal rendering of the office scene driven by
//! `office-core`:
//!
//! - **App**: select-driven frame loop gluing the feed, the motion engine
//!   and the scheduler together
//! - **Feed**: the external-producer seam, reading JSONL events from a file
//!   or stdin
//! - **Scene**: projection of scene coordinates onto terminal cells and all
//!   the drawing
//! - **Theme**: color tables shared by the scene

pub mod app;
pub mod feed;
pub mod scene;
pub mod theme;

pub use app::App;
