//! Terminal User Interface Module
//!
//! Interactive front end for the document Q&A assistant, built with Ratatui.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │               📄 Document Q&A · gemini-pro  ●                   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─ Document ──────────────────────────────────────────────┐   │
//! │  │ File: report.pdf (pdf, 12034 chars)                      │   │
//! │  │ ✓ Load → ● Analyze → ○ Ready → ○ Answer   chunk 3/7      │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │  ┌─ Questions & Answers ───────────────────────────────────┐   │
//! │  │  Question 1: / Answer 1: ...                             │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │  ┌─ Your Question ─────────────────────────────────────────┐   │
//! │  │ Type your question here...                               │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │  [Ctrl+O] Open | [Ctrl+P] Process | [Enter] Ask | [Ctrl+Q] Quit │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;
pub mod widgets;

pub use app::{App, AppEvent, PipelineStage, View};
pub use event::{AppAction, EventHandler};

use crate::config::Config;
use crate::llm::LLM;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Type alias for our terminal backend
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
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
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI, optionally loading `initial_file` on start
pub async fn run(config: Config, llm: LLM, initial_file: Option<PathBuf>) -> anyhow::Result<()> {
    info!(model = llm.model(), "Starting TUI mode");

    let mut terminal = init_terminal()?;

    let mut app = App::new(config, Arc::new(llm));
    if let Some(path) = initial_file {
        app.load_document(path);
    }

    let mut events = EventHandler::new(std::time::Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    if let Err(e) = restore_terminal(&mut terminal) {
        error!("Failed to restore terminal: {}", e);
    }

    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut EventHandler,
) -> anyhow::Result<()> {
    loop {
        // Handle results from background tasks
        app.poll_events();

        terminal.draw(|frame| ui::render(frame, app))?;

        // Ticks keep this loop turning while background work runs
        let Some(action) = events.next().await else {
            break;
        };
        app.handle_action(action).await;

        if app.should_quit {
            break;
        }
    }

    info!(
        session_id = %app.session.id,
        questions = app.session.history().len(),
        "TUI exited normally"
    );
    Ok(())
}
