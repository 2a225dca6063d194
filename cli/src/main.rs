//! Ora CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`ora_engine`] (page shell state) and [`ora_tui`] (rendering),
//! providing RAII-based terminal management with guaranteed cleanup.
//!
//! ```text
//! main() -> Settings::load() -> TerminalSession::new() -> run_app() -> App + TUI
//! ```
//!
//! # Event Loop
//!
//! A fixed 8ms (~120 FPS) render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`ora_tui::InputPump`])
//! 3. Advance the shell clock by the real frame delta (`app.tick()`)
//! 4. Render frame (which also drives the intro fade)

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, File, OpenOptions},
    io::{self, Stdout, stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use ora_config::OraConfig;
use ora_engine::{App, Settings};
use ora_tui::{InputPump, draw, handle_events};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let mut skipped = Vec::new();
    let opened = log_file_candidates()
        .into_iter()
        .find_map(|path| match open_log_file(&path) {
            Ok(file) => Some((path, file)),
            Err(err) => {
                skipped.push(format!("{}: {err}", path.display()));
                None
            }
        });

    // No log file: keep logging off rather than write over the TUI.
    let Some((path, file)) = opened else {
        tracing_subscriber::registry().with(filter).init();
        return;
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();
    tracing::info!(path = %path.display(), "Logging initialized");
    for candidate in skipped {
        tracing::warn!(%candidate, "Log file candidate skipped");
    }
}

/// Open `path` for appending, creating its directory first.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// `logs/ora.log` next to the config file, then under `./.ora`.
fn log_file_candidates() -> Vec<PathBuf> {
    let beside_config = OraConfig::path()
        .and_then(|config| config.parent().map(|dir| dir.join("logs").join("ora.log")));
    beside_config
        .into_iter()
        .chain([PathBuf::from(".ora").join("logs").join("ora.log")])
        .collect()
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Enables raw mode and the alternate screen; on drop both are restored,
/// so the terminal remains usable even after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            let _ = execute!(out, LeaveAlternateScreen);
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let settings = Settings::load();
    tracing::info!(
        reduced_motion = settings.ui.reduced_motion,
        stats = settings.stats.len(),
        "Settings loaded"
    );
    let mut app = App::new(settings);

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app).await
    };

    if let Err(err) = result {
        tracing::error!("{err:?}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

const FRAME_DURATION: Duration = Duration::from_millis(8);

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        let quit_now = match handle_events(app, &mut input) {
            Ok(q) => q,
            Err(e) => break Err(e),
        };
        if quit_now {
            tracing::info!("Quit requested");
            break Ok(());
        }

        app.tick();

        if let Err(e) = terminal.draw(|frame| draw(frame, app)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
