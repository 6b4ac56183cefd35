//! File operations

use crate::core::app::EditorApp;
use crate::core::command::Command;
use crate::core::commands::current_buffer_mut;
use crate::core::error::Result;
use crate::core::prefix_arg::PrefixArg;

/// Save the current buffer to its file (C-x C-s)
#[derive(Clone)]
pub struct SaveBuffer;

impl Command for SaveBuffer {
    fn execute(&self, app: &mut EditorApp, _arg: Option<PrefixArg>) -> Result<()> {
        let buffer = current_buffer_mut(app)?;
        if !buffer.modified {
            app.message("(No changes need to be saved)");
            return Ok(());
        }
        let path = buffer.save()?;
        tracing::info!(path = %path.display(), "buffer saved");
        app.message(format!("Wrote {}", path.display()));
        Ok(())
    }
}
