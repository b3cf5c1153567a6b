//! Terminal front end: setup/teardown and the event loop.

mod app;
mod input;
mod ui;

pub use app::App;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::cli::Cli;
use crate::controller::Controller;
use crate::engine::{EngineEvent, ProcessTransport, SearchClient};

/// How long a search may run before it is treated as "no move".
const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the interactive client until the user quits.
pub async fn run(cli: &Cli) -> Result<()> {
    // Log to a file so tracing output does not corrupt the terminal.
    let log_file = std::fs::File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(engine = %cli.engine.display(), depth = cli.depth, "Starting Strictly Chess");

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let transport = ProcessTransport::spawn(&cli.engine)?;
    let client = SearchClient::start(transport, cli.depth, SEARCH_TIMEOUT, event_tx);
    let mut app = App::new(Controller::new(client));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, &mut app, &mut event_rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.controller().shutdown();

    if let Err(ref e) = res {
        error!(error = ?e, "Event loop error");
    }
    res
}

/// Draws, drains engine events, and polls input at a 100ms cadence.
async fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_rx: &mut mpsc::UnboundedReceiver<EngineEvent>,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        while let Ok(engine_event) = event_rx.try_recv() {
            app.controller_mut().handle_engine_event(engine_event);
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    app.handle_key(key);
                }
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                        let size = terminal.size()?;
                        let area = Rect::new(0, 0, size.width, size.height);
                        if let Some(square) = ui::square_at(area, mouse.column, mouse.row) {
                            app.handle_click(square);
                        }
                    }
                }
                _ => {}
            }
        }

        if app.should_quit() {
            info!("Quitting");
            return Ok(());
        }
    }
}
