//! usredit binary entry point.
//!
//! Resolves configuration, starts logging and the API worker, runs the TUI
//! event loop, and restores the terminal state on exit.
//!
use std::sync::Arc;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use usredit::api::HttpUserApi;
use usredit::api::worker::ApiWorker;
use usredit::app::keymap::Keymap;
use usredit::app::{self, AppState, Theme};
use usredit::config::{Args, Settings};
use usredit::credentials::FileCredentialStore;
use usredit::error::Result;
use usredit::logging;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let settings = Settings::from_args(Args::parse())?;
    logging::init(&settings.log_level, &settings.log_file)?;
    tracing::info!(base_url = %settings.base_url, "starting usredit");

    let api = HttpUserApi::new(&settings.base_url)?;
    let worker = ApiWorker::spawn(Arc::new(api))?;
    let credentials = FileCredentialStore::new(&settings.credentials_path);
    let theme = Theme::load_or_init(&settings.theme_path.to_string_lossy());
    let keymap = Keymap::load_or_init(&settings.keymap_path.to_string_lossy());
    let mut state = AppState::new(settings.base_url.clone(), theme, keymap);

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;

    let res = app::run(&mut terminal, &mut state, &worker, &credentials);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    tracing::info!("exiting");
    Ok(())
}
