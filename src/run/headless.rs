//! Headless mode: run a key description through the command loop.

use std::path::PathBuf;

use crate::config::Config;
use crate::core::app::EditorApp;
use crate::core::dispatcher;
use crate::core::frontend::Script;

/// Feed `keys` to a fresh editor and return the current buffer's text once
/// the input runs out or the editor is killed.
pub fn run_headless_mode(
    files: &[PathBuf],
    config: &Config,
    keys: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let script = Script::from_desc(keys)?;
    let mut app = EditorApp::initialize_with_config(config, files, Box::new(script.frontend()))?;

    let exit = dispatcher::command_loop(&mut app)?;
    tracing::info!(
        ?exit,
        unread = script.pending_keys(),
        redisplays = script.redisplay_count(),
        "headless run finished"
    );
    if let Some(echo) = app.echo_area.text() {
        tracing::debug!(echo, "final echo area");
    }

    Ok(app.current_buffer().map(|b| b.text()).unwrap_or_default())
}
