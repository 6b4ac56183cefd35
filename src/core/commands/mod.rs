//! Command implementations
//!
//! - **control**: prefix arguments, quitting, recursive edits, key help
//! - **macro_cmd**: keyboard macro recording and playback
//! - **editing**: insertion and deletion
//! - **movement**: point motion
//! - **file**: saving
//!
//! All commands implement the [`Command`](crate::core::command::Command) trait.

use std::rc::Rc;

use crate::core::app::EditorApp;
use crate::core::error::{EditorError, Result};
use crate::core::buffer::Buffer;
use crate::core::key::KEY_RESIZE;
use crate::core::keymap::Binding;

/// Application control
pub mod control;
/// Basic editing (insert, delete)
pub mod editing;
/// File operations
pub mod file;
/// Macro recording
pub mod macro_cmd;
/// Cursor movement commands
pub mod movement;

/// Register all commands in the application
pub fn register_all(app: &mut EditorApp) -> Result<()> {
    use self::control::*;
    use self::editing::*;
    use self::file::*;
    use self::macro_cmd::*;
    use self::movement::*;

    let registry = &mut app.registry;

    // Editing
    registry.define("self-insert-command", SelfInsertCommand);
    registry.define("newline", Newline);
    registry.define("delete-char", DeleteChar);
    registry.define("delete-backward-char", DeleteBackwardChar);

    // Movement
    registry.define("forward-char", ForwardChar);
    registry.define("backward-char", BackwardChar);
    registry.define("beginning-of-line", BeginningOfLine);
    registry.define("end-of-line", EndOfLine);

    // Files
    registry.define("save-buffer", SaveBuffer);

    // Control
    registry.define("keyboard-quit", KeyboardQuit);
    registry.define("save-buffers-kill-editor", SaveBuffersKillEditor);
    registry.define("universal-argument", UniversalArgument);
    registry.define("universal-argument-more", UniversalArgumentMore);
    registry.define("digit-argument", DigitArgument);
    registry.define("negative-argument", NegativeArgument);
    registry.define("recursive-edit", RecursiveEdit);
    registry.define("exit-recursive-edit", ExitRecursiveEdit);
    registry.define("abort-recursive-edit", AbortRecursiveEdit);
    registry.define("top-level", TopLevel);
    registry.define("describe-key-briefly", DescribeKeyBriefly);

    // Keyboard macros
    registry.define("start-kbd-macro", StartKbdMacro);
    registry.define("end-kbd-macro", EndKbdMacro);
    registry.define("call-last-kbd-macro", CallLastKbdMacro);

    app.universal_argument_map = Rc::new(universal_argument_map()?);

    // The loop redraws after every key; a resize only has to get through it.
    app.global_map
        .bind(&[KEY_RESIZE], Binding::inline(|app| app.redisplay()))?;

    Ok(())
}

/// The current buffer, for commands that need one.
pub(crate) fn current_buffer_mut(app: &mut EditorApp) -> Result<&mut Buffer> {
    app.current_buffer_mut()
        .ok_or_else(|| EditorError::message("No current buffer"))
}
