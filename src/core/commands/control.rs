//! Application control commands: prefix arguments, quitting and recursive edits.

use std::rc::Rc;

use crate::core::app::EditorApp;
use crate::core::command::Command;
use crate::core::controller::{ExitRequest, LoopExit};
use crate::core::dispatcher::{key_binding, read_key, recursive_edit};
use crate::core::error::{EditorError, Result};
use crate::core::frontend::ReadMode;
use crate::core::key::{KeyCode, key_sequence_string};
use crate::core::keymap::{Binding, Keymap, Lookup};
use crate::core::prefix_arg::PrefixArg;

/// Keymap active for one key after `C-u` or a digit argument.
pub fn universal_argument_map() -> Result<Keymap> {
    let mut map = Keymap::new();
    for digit in '0'..='9' {
        map.bind(&[KeyCode::from(digit)], Binding::command("digit-argument"))?;
    }
    map.bind_command("-", "negative-argument")?;
    map.bind_command("C-u", "universal-argument-more")?;
    Ok(map)
}

/// `C-u` pressed with `prev` pending. Values saturate at the `i64` bounds.
pub fn universal_argument_value(prev: Option<PrefixArg>) -> PrefixArg {
    match prev {
        Some(PrefixArg::Universal(n)) => PrefixArg::Universal(n.saturating_mul(4)),
        _ => PrefixArg::BARE,
    }
}

/// `C-u` pressed again inside the universal-argument map.
pub fn universal_argument_more_value(prev: Option<PrefixArg>) -> PrefixArg {
    match prev {
        Some(PrefixArg::Universal(n)) => PrefixArg::Universal(n.saturating_mul(4)),
        Some(PrefixArg::Negative) => PrefixArg::Universal(-4),
        Some(value @ PrefixArg::Value(_)) => value,
        None => PrefixArg::BARE,
    }
}

/// Digit `d` typed with `prev` pending.
pub fn digit_argument_value(prev: Option<PrefixArg>, digit: i64) -> PrefixArg {
    match prev {
        None | Some(PrefixArg::Universal(_)) => PrefixArg::Value(digit),
        Some(PrefixArg::Negative) => PrefixArg::Value(-digit),
        Some(PrefixArg::Value(n)) if n < 0 => PrefixArg::Value(n.saturating_mul(10).saturating_sub(digit)),
        Some(PrefixArg::Value(n)) => PrefixArg::Value(n.saturating_mul(10).saturating_add(digit)),
    }
}

/// `-` typed with `prev` pending.
pub fn negative_argument_value(prev: Option<PrefixArg>) -> Option<PrefixArg> {
    match prev {
        None | Some(PrefixArg::Universal(_)) => Some(PrefixArg::Negative),
        Some(PrefixArg::Value(n)) => Some(PrefixArg::Value(n.saturating_neg())),
        Some(PrefixArg::Negative) => None,
    }
}

/// Store a new prefix argument and keep reading digits in the
/// universal-argument map.
fn continue_prefix(app: &mut EditorApp, value: Option<PrefixArg>) {
    app.controller.prefix_arg.set(value);
    let map = Rc::clone(&app.universal_argument_map);
    app.set_transient_map(map);
}

/// Universal argument (C-u): 4, then 16, 64...
#[derive(Clone)]
pub struct UniversalArgument;

impl Command for UniversalArgument {
    fn execute(&self, app: &mut EditorApp, arg: Option<PrefixArg>) -> Result<()> {
        continue_prefix(app, Some(universal_argument_value(arg)));
        Ok(())
    }
}

#[derive(Clone)]
pub struct UniversalArgumentMore;

impl Command for UniversalArgumentMore {
    fn execute(&self, app: &mut EditorApp, arg: Option<PrefixArg>) -> Result<()> {
        continue_prefix(app, Some(universal_argument_more_value(arg)));
        Ok(())
    }
}

/// Digit argument: the digit comes from the key that invoked the command,
/// so `M-5` and `5` after `C-u` both work.
#[derive(Clone)]
pub struct DigitArgument;

impl Command for DigitArgument {
    fn execute(&self, app: &mut EditorApp, arg: Option<PrefixArg>) -> Result<()> {
        let digit = app
            .controller
            .last_key
            .and_then(KeyCode::as_ascii)
            .and_then(|c| c.to_digit(10))
            .ok_or_else(|| EditorError::message("digit-argument must be bound to a digit key"))?;
        continue_prefix(app, Some(digit_argument_value(arg, i64::from(digit))));
        Ok(())
    }
}

#[derive(Clone)]
pub struct NegativeArgument;

impl Command for NegativeArgument {
    fn execute(&self, app: &mut EditorApp, arg: Option<PrefixArg>) -> Result<()> {
        continue_prefix(app, negative_argument_value(arg));
        Ok(())
    }
}

/// Keyboard Quit (C-g)
#[derive(Clone)]
pub struct KeyboardQuit;

impl Command for KeyboardQuit {
    fn execute(&self, _app: &mut EditorApp, _arg: Option<PrefixArg>) -> Result<()> {
        Err(EditorError::Quit)
    }
}

/// Leave the editor (C-x C-c)
#[derive(Clone)]
pub struct SaveBuffersKillEditor;

impl Command for SaveBuffersKillEditor {
    fn execute(&self, app: &mut EditorApp, _arg: Option<PrefixArg>) -> Result<()> {
        let unsaved = app.buffers.values().filter(|b| b.modified && b.filename.is_some()).count();
        tracing::info!(unsaved, "kill editor requested");
        app.controller.request_exit(ExitRequest::KillEditor);
        Ok(())
    }
}

#[derive(Clone)]
pub struct RecursiveEdit;

impl Command for RecursiveEdit {
    fn execute(&self, app: &mut EditorApp, _arg: Option<PrefixArg>) -> Result<()> {
        recursive_edit(app)
    }
}

fn require_recursive_edit(app: &EditorApp) -> Result<()> {
    if app.controller.recursive_edit_level == 0 {
        return Err(EditorError::message("No recursive edit is in progress"));
    }
    Ok(())
}

/// Leave the innermost recursive edit normally (C-M-c)
#[derive(Clone)]
pub struct ExitRecursiveEdit;

impl Command for ExitRecursiveEdit {
    fn execute(&self, app: &mut EditorApp, _arg: Option<PrefixArg>) -> Result<()> {
        require_recursive_edit(app)?;
        app.controller
            .request_exit(ExitRequest::RecursiveEdit(LoopExit::Finished));
        Ok(())
    }
}

/// Abort the innermost recursive edit (C-])
#[derive(Clone)]
pub struct AbortRecursiveEdit;

impl Command for AbortRecursiveEdit {
    fn execute(&self, app: &mut EditorApp, _arg: Option<PrefixArg>) -> Result<()> {
        require_recursive_edit(app)?;
        app.controller
            .request_exit(ExitRequest::RecursiveEdit(LoopExit::Quit));
        Ok(())
    }
}

#[derive(Clone)]
pub struct TopLevel;

impl Command for TopLevel {
    fn execute(&self, app: &mut EditorApp, _arg: Option<PrefixArg>) -> Result<()> {
        app.controller.request_exit(ExitRequest::TopLevel);
        Ok(())
    }
}

/// Read a key sequence the same way the loop does and name its binding.
#[derive(Clone)]
pub struct DescribeKeyBriefly;

impl Command for DescribeKeyBriefly {
    fn execute(&self, app: &mut EditorApp, _arg: Option<PrefixArg>) -> Result<()> {
        let mut keys = Vec::new();
        loop {
            let prompt = if keys.is_empty() {
                "Describe key briefly: ".to_string()
            } else {
                format!("Describe key briefly: {}-", key_sequence_string(&keys))
            };
            app.message(prompt);
            app.redisplay()?;

            let key = read_key(app, ReadMode::Blocking)?.ok_or(EditorError::Quit)?;
            keys.push(key);
            let description = key_sequence_string(&keys);
            match key_binding(app, &keys) {
                Lookup::Partial => continue,
                Lookup::Leaf(binding) => {
                    app.message(format!("{} runs the command {}", description, binding));
                }
                Lookup::Undefined => {
                    app.message(format!("{} is undefined", description));
                }
            }
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_universal_argument_multiplies() {
        let first = universal_argument_value(None);
        assert_eq!(first, PrefixArg::BARE);
        assert_eq!(universal_argument_value(Some(first)), PrefixArg::Universal(16));
        assert_eq!(universal_argument_value(Some(PrefixArg::Value(3))), PrefixArg::BARE);
    }

    #[test]
    fn test_universal_argument_more_keeps_numbers() {
        assert_eq!(universal_argument_more_value(Some(PrefixArg::Value(12))), PrefixArg::Value(12));
        assert_eq!(universal_argument_more_value(Some(PrefixArg::Negative)), PrefixArg::Universal(-4));
        assert_eq!(
            universal_argument_more_value(Some(PrefixArg::Universal(16))),
            PrefixArg::Universal(64)
        );
    }

    #[test]
    fn test_digit_composition() {
        let one = digit_argument_value(Some(PrefixArg::BARE), 1);
        assert_eq!(one, PrefixArg::Value(1));
        assert_eq!(digit_argument_value(Some(one), 2), PrefixArg::Value(12));
        let neg = digit_argument_value(Some(PrefixArg::Negative), 3);
        assert_eq!(neg, PrefixArg::Value(-3));
        assert_eq!(digit_argument_value(Some(neg), 4), PrefixArg::Value(-34));
    }

    #[test]
    fn test_negative_argument() {
        assert_eq!(negative_argument_value(None), Some(PrefixArg::Negative));
        assert_eq!(negative_argument_value(Some(PrefixArg::Value(5))), Some(PrefixArg::Value(-5)));
        assert_eq!(negative_argument_value(Some(PrefixArg::Negative)), None);
    }

    #[test]
    fn test_large_arguments_saturate() {
        let mut arg = PrefixArg::BARE;
        for _ in 0..40 {
            arg = universal_argument_more_value(Some(arg));
        }
        assert_eq!(arg, PrefixArg::Universal(i64::MAX));

        let mut arg = PrefixArg::Negative;
        for _ in 0..25 {
            arg = digit_argument_value(Some(arg), 9);
        }
        assert_eq!(arg, PrefixArg::Value(i64::MIN));
        assert_eq!(negative_argument_value(Some(arg)), Some(PrefixArg::Value(i64::MAX)));
        assert_eq!(
            digit_argument_value(Some(PrefixArg::Value(i64::MAX / 10)), 9),
            PrefixArg::Value(i64::MAX)
        );
    }

    #[test]
    fn test_universal_argument_map_bindings() {
        let map = universal_argument_map().unwrap();
        assert_eq!(map.len(), 12);
        assert!(matches!(map.lookup(&[KeyCode::from('7')]), Lookup::Leaf(b) if b.name() == Some("digit-argument")));
    }
}
