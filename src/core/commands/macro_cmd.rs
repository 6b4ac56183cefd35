//! Keyboard macro recording and execution commands

use crate::core::app::EditorApp;
use crate::core::command::Command;
use crate::core::dispatcher::execute_keyboard_macro;
use crate::core::error::{EditorError, Result};
use crate::core::prefix_arg::{PrefixArg, numeric_value};

/// Start recording (C-x ()
#[derive(Clone)]
pub struct StartKbdMacro;

impl Command for StartKbdMacro {
    fn execute(&self, app: &mut EditorApp, _arg: Option<PrefixArg>) -> Result<()> {
        app.controller.macros.start_recording()?;
        tracing::debug!("start recording keyboard macro");
        app.message("Defining kbd macro...");
        Ok(())
    }
}

/// Stop recording (C-x ))
#[derive(Clone)]
pub struct EndKbdMacro;

impl Command for EndKbdMacro {
    fn execute(&self, app: &mut EditorApp, _arg: Option<PrefixArg>) -> Result<()> {
        // Keys that came from a playing macro were never recorded.
        let consumed = if app.controller.macros.is_executing() {
            0
        } else {
            app.controller.this_command_keys.len()
        };
        let keys = app.controller.macros.stop_recording(consumed)?;
        tracing::debug!(len = keys.len(), "keyboard macro defined");
        app.message("Keyboard macro defined");
        Ok(())
    }
}

/// Play the last macro, repeated by the prefix argument (C-x e)
#[derive(Clone)]
pub struct CallLastKbdMacro;

impl Command for CallLastKbdMacro {
    fn execute(&self, app: &mut EditorApp, arg: Option<PrefixArg>) -> Result<()> {
        let keys = app
            .controller
            .macros
            .last_macro()
            .ok_or(EditorError::MacroNotDefined)?;
        let times = numeric_value(arg);
        if times < 1 {
            return Err(EditorError::message(format!(
                "Invalid repeat count: {}",
                times
            )));
        }
        execute_keyboard_macro(app, keys, times as usize)
    }
}
