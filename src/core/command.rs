//! Command Pattern implementation for the editor
//!
//! Every named command implements [`Command`]. Keymaps refer to commands by
//! name; the [`CommandRegistry`] turns a name into something executable at
//! dispatch time, so rebinding or redefining a command never touches keymaps.

use std::collections::HashMap;
use std::rc::Rc;

use crate::core::app::EditorApp;
use crate::core::error::{EditorError, Result};
use crate::core::prefix_arg::PrefixArg;

/// Core command trait implementing the Command Pattern
///
/// `arg` is the prefix argument that was pending when the command was
/// dispatched. It has already been cleared from the controller, so a command
/// that wants to pass a prefix on must set it again.
pub trait Command: CloneCommand {
    fn execute(&self, app: &mut EditorApp, arg: Option<PrefixArg>) -> Result<()>;
}

/// Helper trait for cloning boxed commands
/// This trait is automatically implemented for all Command types
pub trait CloneCommand {
    fn clone_box(&self) -> Box<dyn Command>;
}

impl<T> CloneCommand for T
where
    T: 'static + Command + Clone,
{
    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Command> {
    fn clone(&self) -> Box<dyn Command> {
        self.as_ref().clone_box()
    }
}

type CommandFn = dyn Fn(&mut EditorApp, Option<PrefixArg>) -> Result<()>;

/// A command defined by a closure.
#[derive(Clone)]
pub struct FnCommand(Rc<CommandFn>);

impl FnCommand {
    pub fn new(f: impl Fn(&mut EditorApp, Option<PrefixArg>) -> Result<()> + 'static) -> Self {
        Self(Rc::new(f))
    }
}

impl Command for FnCommand {
    fn execute(&self, app: &mut EditorApp, arg: Option<PrefixArg>) -> Result<()> {
        (self.0)(app, arg)
    }
}

/// Name → command table.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or redefine `name`.
    pub fn define(&mut self, name: &str, command: impl Command + 'static) {
        self.commands.insert(name.to_string(), Box::new(command));
    }

    pub fn define_fn(
        &mut self,
        name: &str,
        f: impl Fn(&mut EditorApp, Option<PrefixArg>) -> Result<()> + 'static,
    ) {
        self.define(name, FnCommand::new(f));
    }

    /// Look a command up. The returned box is a clone, so the caller can run
    /// it while holding `&mut EditorApp`.
    pub fn resolve(&self, name: &str) -> Result<Box<dyn Command>> {
        self.commands
            .get(name)
            .cloned()
            .ok_or_else(|| EditorError::UndefinedCommand(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Sorted command names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_unknown_command() {
        let registry = CommandRegistry::new();
        assert!(matches!(
            registry.resolve("no-such-command"),
            Err(EditorError::UndefinedCommand(name)) if name == "no-such-command"
        ));
    }

    #[test]
    fn test_define_and_redefine() {
        let mut registry = CommandRegistry::new();
        registry.define_fn("b", |_, _| Ok(()));
        registry.define_fn("a", |_, _| Err(EditorError::message("first")));
        registry.define_fn("a", |_, _| Err(EditorError::message("second")));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["a", "b"]);
        assert!(registry.contains("a"));
        assert!(registry.resolve("a").is_ok());
    }
}
