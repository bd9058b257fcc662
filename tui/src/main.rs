//! Pixel Office TUI Entry Point
//!
//! Renders a terminal pixel office driven by a stream of agent-session
//! events.
//!
//! Usage:
//!   office-tui [EVENTS_FILE]
//!
//! With a file argument the feed follows the file (JSONL, one event per
//! line) as it grows; without one it reads events from stdin.

use std::io;
use std::panic;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use office_core::OfficeConfig;
use office_tui::{feed, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set up logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let events_path = std::env::args().nth(1).map(std::path::PathBuf::from);

    // Check for a TTY before touching the terminal. Events may be piped on
    // stdin, so only stdout needs to be interactive in that mode.
    use std::io::IsTerminal;
    if !io::stdout().is_terminal() {
        eprintln!("Error: office-tui requires a terminal (TTY) on stdout");
        eprintln!();
        eprintln!("Run it interactively, optionally piping events in:");
        eprintln!("  office-tui events.jsonl");
        eprintln!("  some-watcher | office-tui");
        std::process::exit(1);
    }

    let config = OfficeConfig::load()?;

    // Set up panic hook to restore the terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let events = feed::spawn(events_path);
    let mut app = App::new(config, events);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
