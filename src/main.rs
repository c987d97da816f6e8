//! user-directory binary entry point.
//!
//! Parses arguments, sets up file logging, initializes the terminal in raw
//! mode, runs the TUI event loop and restores the terminal state on exit.
//!
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use user_directory::app;
use user_directory::config::Args;
use user_directory::error::{Context, Result};
use user_directory::logging::{LogConfig, init_logging};

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().with_ctx(|| "enable raw mode".to_string())?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).with_ctx(|| "enter alternate screen".to_string())?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).with_ctx(|| "create terminal".to_string())?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let args = Args::parse();
    if let Err(err) = init_logging(&LogConfig::from_verbosity(args.verbose, args.log_path())) {
        eprintln!("logging disabled: {err}");
    }
    tracing::info!(api_url = %args.api_url, "starting");

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {e}"))?;

    let res = app::run(&mut terminal, &args);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(%err, "application error");
        eprintln!("application error: {err:#}");
    }
    Ok(())
}
