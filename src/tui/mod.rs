//! Terminal User Interface Module
//!
//! The sales dashboard, built with Ratatui.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  📊 Sales Dashboard                         http://127.0.0.1:5000│
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ● Upload → ○ Map Columns → ○ Analyze → ○ Results               │
//! │  ┌─ Upload CSV ────────────────────────────────────────────┐   │
//! │  │ Drop a CSV file here, type a path, or Ctrl+L for sample │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │  ┌─ Map Columns ───────────────────────────────────────────┐   │
//! │  │ ▶ Customer ID          ◀ CustomerID ▶                   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │  ┌─ Results ───────────────────────────────────────────────┐   │
//! │  │ [metric cards]                                          │   │
//! │  │ [chart grid, paged]                                     │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │  [Enter] Upload/Analyze | [Ctrl+L] Sample | [Ctrl+Q] Quit      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;
pub mod widgets;

pub use app::{App, AppEvent, Command, Focus, PipelineStage, ResultsArea, View};
pub use event::{AppAction, EventHandler};

use crate::client::HttpBackend;
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Type alias for our terminal backend
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI application, optionally starting with `initial_file`
pub async fn run(config: crate::config::Config, initial_file: Option<PathBuf>) -> anyhow::Result<()> {
    info!("Starting TUI against {}", config.server.base_url);

    let mut terminal = init_terminal()?;

    let backend = Arc::new(HttpBackend::new(&config.server));
    let tick_rate = Duration::from_millis(config.ui.tick_rate_ms);
    let mut app = App::new(config, backend);

    if let Some(path) = initial_file {
        app.dispatch(Command::SelectFile(path)).await;
    }

    let mut events = EventHandler::new(tick_rate);

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    if let Err(e) = restore_terminal(&mut terminal) {
        error!("Failed to restore terminal: {}", e);
    }

    result
}

/// Main application loop
async fn run_app(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        // Settle finished network requests
        app.poll_events();

        if let Some(action) = events.try_next().await {
            match action {
                AppAction::Quit | AppAction::ForceQuit => break,
                _ => app.handle_action(action).await,
            }
        }

        if app.should_quit {
            break;
        }

        // Small yield to prevent busy loop
        tokio::task::yield_now().await;
    }

    info!("TUI exited normally");
    Ok(())
}
