//! Basic editing commands (insert, delete, newline)

use crate::core::app::EditorApp;
use crate::core::command::Command;
use crate::core::commands::current_buffer_mut;
use crate::core::error::{EditorError, Result};
use crate::core::key::key_sequence_string;
use crate::core::prefix_arg::{PrefixArg, numeric_value};
use crate::core::utf8::keys_to_text;

/// Largest repeat count an inserting command accepts.
pub const MAX_REPEAT_COUNT: i64 = 1 << 20;

fn repeat_count(arg: Option<PrefixArg>) -> Result<usize> {
    let n = numeric_value(arg);
    if n < 0 {
        return Err(EditorError::message(format!(
            "Negative repetition argument {}",
            n
        )));
    }
    if n > MAX_REPEAT_COUNT {
        return Err(EditorError::message("Prefix argument too large"));
    }
    Ok(n as usize)
}

/// Insert the text typed by the keys that invoked this command
#[derive(Clone)]
pub struct SelfInsertCommand;

impl Command for SelfInsertCommand {
    fn execute(&self, app: &mut EditorApp, arg: Option<PrefixArg>) -> Result<()> {
        let keys = &app.controller.this_command_keys;
        let text = keys_to_text(keys).ok_or_else(|| {
            EditorError::message(format!("{} cannot be inserted", key_sequence_string(keys)))
        })?;
        let count = repeat_count(arg)?;
        current_buffer_mut(app)?.insert(&text.repeat(count));
        Ok(())
    }
}

/// Insert newline at point
#[derive(Clone)]
pub struct Newline;

impl Command for Newline {
    fn execute(&self, app: &mut EditorApp, arg: Option<PrefixArg>) -> Result<()> {
        let count = repeat_count(arg)?;
        current_buffer_mut(app)?.insert(&"\n".repeat(count));
        Ok(())
    }
}

/// Delete forward (C-d); a negative argument deletes backward
#[derive(Clone)]
pub struct DeleteChar;

impl Command for DeleteChar {
    fn execute(&self, app: &mut EditorApp, arg: Option<PrefixArg>) -> Result<()> {
        current_buffer_mut(app)?.delete_char(numeric_value(arg))
    }
}

/// Delete backward (DEL)
#[derive(Clone)]
pub struct DeleteBackwardChar;

impl Command for DeleteBackwardChar {
    fn execute(&self, app: &mut EditorApp, arg: Option<PrefixArg>) -> Result<()> {
        current_buffer_mut(app)?.delete_char(numeric_value(arg).saturating_neg())
    }
}
