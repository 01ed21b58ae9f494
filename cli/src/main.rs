use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use noteboard_core::controller::{self, NoteController};
use noteboard_core::remote::HttpNoteStore;
use noteboard_tui::config::config_path;
use noteboard_tui::{App, ChannelPresenter, Event, EventHandler};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

fn main() -> Result<()> {
    let path = config_path();
    let mut config = noteboard_tui::load_config(&path)?;
    config.apply_env();

    // the terminal belongs to the UI, so logs go to a file
    let _log_guard = init_logging(&config.ui.log_file)?;
    tracing::info!(config = %path.display(), base_url = %config.remote.base_url, "Starting noteboard");

    let runtime = tokio::runtime::Runtime::new().context("Failed to start the async runtime")?;
    let store = HttpNoteStore::new(
        &config.remote.base_url,
        Duration::from_secs(config.remote.timeout_secs),
    )?;

    let (presenter, ui_events) = ChannelPresenter::connect();
    let (intents, intent_rx) = mpsc::unbounded_channel();
    let controller_task = runtime.spawn(controller::run(NoteController::new(store, presenter), intent_rx));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = config.ui.tick_rate_ms;
    let mut app = App::new(config, intents, ui_events);
    let event_handler = EventHandler::new(tick_rate);

    let result = run_app(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // closing the intent channel ends the controller loop
    drop(app);
    match runtime.block_on(async { tokio::time::timeout(SHUTDOWN_GRACE, controller_task).await }) {
        Ok(Ok(_)) => tracing::info!("Controller stopped"),
        Ok(Err(err)) => tracing::error!(error = %err, "Controller task failed"),
        Err(_) => tracing::warn!("Controller still busy, abandoning it"),
    }
    runtime.shutdown_timeout(SHUTDOWN_GRACE);

    if let Err(err) = result {
        tracing::error!(error = ?err, "Exiting with error");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Log to `log_file` through a background writer; keep the guard alive until
/// exit so buffered lines are flushed.
fn init_logging(log_file: &Path) -> Result<WorkerGuard> {
    let dir = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = log_file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("noteboard.log");

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to initialise logging: {}", err))?;

    Ok(guard)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        app.pump();
        terminal.draw(|f| noteboard_tui::ui::render(f, app))?;

        match event_handler.next()? {
            Event::Key(key) => noteboard_tui::handle_key_event(key, app),
            Event::Mouse(mouse) => noteboard_tui::handle_mouse_event(mouse, app),
            Event::Tick => app.tick(),
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
