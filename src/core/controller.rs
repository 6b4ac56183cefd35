//! State owned by the dispatch loop.
//!
//! The loop itself lives in [`crate::core::dispatcher`]; this module holds
//! what persists between iterations and across recursive-edit levels.

use std::rc::Rc;
use std::time::Duration;

use crate::core::hooks::HookId;
use crate::core::kbd_macro::KeyboardMacros;
use crate::core::key::{KeyCode, key_sequence_string};
use crate::core::keymap::{Binding, Keymap};
use crate::core::prefix_arg::{PrefixArg, PrefixArgState};

/// How long a pending chord may sit before it is echoed.
pub const ECHO_DELAY: Duration = Duration::from_millis(1000);
/// How long an error message stays up unless a key arrives first.
pub const ERROR_PAUSE: Duration = Duration::from_millis(2000);
pub const DEFAULT_MAX_RECURSIVE_EDIT_DEPTH: usize = 64;

/// Why one level of the command loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// End of input or an ordinary exit request.
    Finished,
    /// The level was aborted.
    Quit,
}

/// A request, raised by a command, to leave one or more loop levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitRequest {
    /// Leave the innermost recursive edit with the given outcome.
    RecursiveEdit(LoopExit),
    /// Unwind every recursive edit back to the top-level loop.
    TopLevel,
    /// Leave every loop, the top level included.
    KillEditor,
}

/// A transient overriding map waiting for the next key sequence to resolve.
#[derive(Clone)]
pub struct TransientMap {
    /// Pre-command hook that restores `saved` when a command is dispatched.
    pub hook: HookId,
    /// Overriding map in force before the transient one was installed.
    pub saved: Option<Rc<Keymap>>,
}

pub struct Controller {
    /// Keys read since the last resolution.
    pub key_sequence: Vec<KeyCode>,
    pub last_key: Option<KeyCode>,
    /// Keys that invoked the command currently running (or last run).
    pub this_command_keys: Vec<KeyCode>,
    pub this_command: Option<Binding>,
    pub last_command: Option<Binding>,
    /// Highest-priority keymap, consulted before the buffer and global maps.
    pub overriding_map: Option<Rc<Keymap>>,
    pub transient_map: Option<TransientMap>,
    pub prefix_arg: PrefixArgState,
    /// Prefix argument taken for the command currently running.
    pub current_prefix_arg: Option<PrefixArg>,
    pub recursive_edit_level: usize,
    pub max_recursive_edit_depth: usize,
    /// Set once a chord has been echoed, so its later keys echo without delay.
    pub echo_immediately: bool,
    pub macros: KeyboardMacros,
    pub exit_request: Option<ExitRequest>,
}

impl Controller {
    pub fn new() -> Self {
        Self {
            key_sequence: Vec::new(),
            last_key: None,
            this_command_keys: Vec::new(),
            this_command: None,
            last_command: None,
            overriding_map: None,
            transient_map: None,
            prefix_arg: PrefixArgState::new(),
            current_prefix_arg: None,
            recursive_edit_level: 0,
            max_recursive_edit_depth: DEFAULT_MAX_RECURSIVE_EDIT_DEPTH,
            echo_immediately: false,
            macros: KeyboardMacros::new(),
            exit_request: None,
        }
    }

    /// A chord or prefix argument is waiting for more keys.
    pub fn has_pending_input(&self) -> bool {
        !self.key_sequence.is_empty() || self.prefix_arg.is_pending()
    }

    /// Echo form of the pending input: `"C-u(12) C-x-"`.
    pub fn pending_input_text(&self) -> String {
        let mut text = String::new();
        if let Some(arg) = self.prefix_arg.pending() {
            text.push_str(&arg.to_string());
        }
        if !self.key_sequence.is_empty() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&key_sequence_string(&self.key_sequence));
        }
        text.push('-');
        text
    }

    /// Forget everything half-typed after a failed iteration.
    pub fn reset_after_error(&mut self) {
        self.key_sequence.clear();
        self.prefix_arg.clear();
        self.macros.cancel_recording();
    }

    pub fn request_exit(&mut self, request: ExitRequest) {
        self.exit_request = Some(request);
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_input_text() {
        let mut controller = Controller::new();
        assert!(!controller.has_pending_input());

        controller.key_sequence.push(KeyCode(0x18));
        assert_eq!(controller.pending_input_text(), "C-x-");

        controller.prefix_arg.set(Some(PrefixArg::BARE));
        assert_eq!(controller.pending_input_text(), "C-u C-x-");

        controller.key_sequence.clear();
        controller.prefix_arg.set(Some(PrefixArg::Value(12)));
        assert_eq!(controller.pending_input_text(), "C-u(12)-");
    }

    #[test]
    fn test_reset_after_error() {
        let mut controller = Controller::new();
        controller.key_sequence.push(KeyCode(0x18));
        controller.prefix_arg.set(Some(PrefixArg::Negative));
        controller.macros.start_recording().unwrap();
        controller.reset_after_error();
        assert!(!controller.has_pending_input());
        assert!(!controller.macros.is_recording());
    }
}
