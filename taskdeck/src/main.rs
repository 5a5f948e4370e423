//! `Taskdeck`: terminal client for a remote task-tracking service.
//!
//! Configuration via CLI flags, environment variables, or config file
//! (`~/.config/taskdeck/config.toml`).
//!
//! ```bash
//! # Local service on the default port
//! cargo run --bin taskdeck
//!
//! # Remote service, only high-priority work in progress
//! cargo run --bin taskdeck -- --base-url https://tasks.example.com/api \
//!     --status in_progress --priority high
//!
//! # Or via environment variables
//! TASKDECK_API_URL=https://tasks.example.com/api TASKDECK_LOG=debug cargo run
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use taskdeck::api::RemoteError;
use taskdeck::api::http::HttpTaskApi;
use taskdeck::app::App;
use taskdeck::config::{CliArgs, ClientConfig};
use taskdeck::net::{self, ApiCommand, ApiEvent};
use taskdeck::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    let api = match HttpTaskApi::new(&config.base_url, config.timeout) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error: {e}");
            return Err(io::Error::other(e));
        }
    };

    tracing::info!(base_url = %api.base_url(), "taskdeck starting");

    let (cmd_tx, evt_rx) = net::spawn_worker(Arc::new(api), config.channel_capacity);

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, &config, &cmd_tx, evt_rx);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("taskdeck exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskdeck.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ClientConfig,
    cmd_tx: &mpsc::Sender<ApiCommand>,
    mut evt_rx: mpsc::Receiver<ApiEvent>,
) -> io::Result<()> {
    let mut app = App::new(config);

    let initial = app.mount();
    send_command(&mut app, cmd_tx, initial);

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Drain all completed requests (non-blocking).
        drain_events(&mut app, &mut evt_rx);

        // Step 3: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if let Some(cmd) = app.handle_key_event(key) {
                send_command(&mut app, cmd_tx, cmd);
            }
        }

        if app.should_quit {
            let _ = cmd_tx.try_send(ApiCommand::Shutdown);
            return Ok(());
        }
    }
}

/// Hand a request to the worker. If it cannot be queued, the request fails
/// immediately so the UI leaves its in-flight state.
fn send_command(app: &mut App, tx: &mpsc::Sender<ApiCommand>, cmd: ApiCommand) {
    let (cmd, reason) = match tx.try_send(cmd) {
        Ok(()) => return,
        Err(mpsc::error::TrySendError::Full(cmd)) => (cmd, "request queue is full"),
        Err(mpsc::error::TrySendError::Closed(cmd)) => (cmd, "request worker stopped"),
    };
    tracing::warn!(?cmd, reason, "request not dispatched");
    if let Some(event) = ApiEvent::failure(cmd, RemoteError::Network(reason.to_string())) {
        app.controller.apply(event);
    }
}

/// Drain all pending `ApiEvent`s from the receiver and apply them.
fn drain_events(app: &mut App, rx: &mut mpsc::Receiver<ApiEvent>) {
    while let Ok(event) = rx.try_recv() {
        app.controller.apply(event);
    }
}
