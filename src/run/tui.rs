//! Terminal (TUI) mode implementation.

use std::path::PathBuf;

use crate::config::Config;
use crate::core::app::EditorApp;
use crate::core::dispatcher;
use crate::terminal::{RawMode, TerminalFrontend};

/// Run in terminal (TUI) mode until the editor is killed.
pub fn run_terminal_mode(
    files: &[PathBuf],
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let tab_width = config.get_int("tab_width").unwrap_or(8).max(1) as usize;

    let _raw_mode = RawMode::new()?;
    let frontend = TerminalFrontend::new(tab_width)?;
    let mut app = EditorApp::initialize_with_config(config, files, Box::new(frontend))?;
    app.redisplay()?;

    let exit = dispatcher::command_loop(&mut app)?;
    tracing::info!(?exit, "terminal session ended");
    Ok(())
}
