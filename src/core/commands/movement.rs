//! Point movement commands

use crate::core::app::EditorApp;
use crate::core::command::Command;
use crate::core::commands::current_buffer_mut;
use crate::core::error::Result;
use crate::core::prefix_arg::{PrefixArg, numeric_value};

/// Move forward by characters
#[derive(Clone)]
pub struct ForwardChar;

impl Command for ForwardChar {
    fn execute(&self, app: &mut EditorApp, arg: Option<PrefixArg>) -> Result<()> {
        current_buffer_mut(app)?.forward_char(numeric_value(arg))
    }
}

/// Move backward by characters
#[derive(Clone)]
pub struct BackwardChar;

impl Command for BackwardChar {
    fn execute(&self, app: &mut EditorApp, arg: Option<PrefixArg>) -> Result<()> {
        current_buffer_mut(app)?.forward_char(numeric_value(arg).saturating_neg())
    }
}

/// Move to beginning of line
#[derive(Clone)]
pub struct BeginningOfLine;

impl Command for BeginningOfLine {
    fn execute(&self, app: &mut EditorApp, _arg: Option<PrefixArg>) -> Result<()> {
        current_buffer_mut(app)?.beginning_of_line();
        Ok(())
    }
}

/// Move to end of line
#[derive(Clone)]
pub struct EndOfLine;

impl Command for EndOfLine {
    fn execute(&self, app: &mut EditorApp, _arg: Option<PrefixArg>) -> Result<()> {
        current_buffer_mut(app)?.end_of_line();
        Ok(())
    }
}
