//! Pre- and post-command hooks.
//!
//! Hooks run around every dispatched command. A hook that fails is detached
//! from its list and reported; it never aborts the command it wraps.

use std::fmt;
use std::rc::Rc;

use crate::core::app::EditorApp;
use crate::core::error::Result;

/// A hook receives its own id so it can remove itself.
pub type Hook = Rc<dyn Fn(&mut EditorApp, HookId) -> Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    PreCommand,
    PostCommand,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::PreCommand => write!(f, "pre-command"),
            HookKind::PostCommand => write!(f, "post-command"),
        }
    }
}

#[derive(Default)]
pub struct Hooks {
    next_id: usize,
    pre_command: Vec<(HookId, Hook)>,
    post_command: Vec<(HookId, Hook)>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, kind: HookKind) -> &Vec<(HookId, Hook)> {
        match kind {
            HookKind::PreCommand => &self.pre_command,
            HookKind::PostCommand => &self.post_command,
        }
    }

    fn list_mut(&mut self, kind: HookKind) -> &mut Vec<(HookId, Hook)> {
        match kind {
            HookKind::PreCommand => &mut self.pre_command,
            HookKind::PostCommand => &mut self.post_command,
        }
    }

    /// Append a hook; hooks run in insertion order.
    pub fn add(
        &mut self,
        kind: HookKind,
        hook: impl Fn(&mut EditorApp, HookId) -> Result<()> + 'static,
    ) -> HookId {
        let id = HookId(self.next_id);
        self.next_id += 1;
        self.list_mut(kind).push((id, Rc::new(hook)));
        id
    }

    /// Returns false if the hook was not registered.
    pub fn remove(&mut self, kind: HookKind, id: HookId) -> bool {
        let list = self.list_mut(kind);
        let before = list.len();
        list.retain(|(hook_id, _)| *hook_id != id);
        list.len() != before
    }

    pub fn len(&self, kind: HookKind) -> usize {
        self.list(kind).len()
    }

    pub fn is_empty(&self, kind: HookKind) -> bool {
        self.list(kind).is_empty()
    }

    fn snapshot(&self, kind: HookKind) -> Vec<(HookId, Hook)> {
        self.list(kind).clone()
    }
}

/// Run every hook of `kind`. Hooks may add or remove hooks while running;
/// the set that runs is the one registered when this call started.
pub fn run_hooks(app: &mut EditorApp, kind: HookKind) {
    for (id, hook) in app.hooks.snapshot(kind) {
        if let Err(err) = hook(app, id) {
            app.hooks.remove(kind, id);
            tracing::warn!(%kind, hook = id.0, error = %err, "hook failed; removed");
            app.message(format!("Error in {} hook: {}", kind, err));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::EditorError;
    use crate::core::frontend::Script;
    use std::cell::Cell;

    fn app() -> EditorApp {
        EditorApp::new(Box::new(Script::new().frontend()))
    }

    #[test]
    fn test_hooks_run_in_order() {
        let mut app = app();
        let trace = Rc::new(std::cell::RefCell::new(Vec::new()));
        for n in 0..3 {
            let trace = Rc::clone(&trace);
            app.hooks.add(HookKind::PreCommand, move |_, _| {
                trace.borrow_mut().push(n);
                Ok(())
            });
        }
        run_hooks(&mut app, HookKind::PreCommand);
        assert_eq!(*trace.borrow(), vec![0, 1, 2]);
        assert!(app.hooks.is_empty(HookKind::PostCommand));
    }

    #[test]
    fn test_failing_hook_is_removed_and_others_still_run() {
        let mut app = app();
        let ran = Rc::new(Cell::new(0));
        app.hooks.add(HookKind::PostCommand, |_, _| Err(EditorError::message("broken")));
        let counter = Rc::clone(&ran);
        app.hooks.add(HookKind::PostCommand, move |_, _| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        run_hooks(&mut app, HookKind::PostCommand);
        assert_eq!(ran.get(), 1);
        assert_eq!(app.hooks.len(HookKind::PostCommand), 1);
        assert_eq!(app.echo_area.text(), Some("Error in post-command hook: broken"));

        run_hooks(&mut app, HookKind::PostCommand);
        assert_eq!(ran.get(), 2);
    }

    #[test]
    fn test_hook_can_remove_itself() {
        let mut app = app();
        app.hooks.add(HookKind::PreCommand, |app, id| {
            app.hooks.remove(HookKind::PreCommand, id);
            Ok(())
        });
        run_hooks(&mut app, HookKind::PreCommand);
        assert!(app.hooks.is_empty(HookKind::PreCommand));
        assert!(!app.hooks.remove(HookKind::PreCommand, HookId(0)));
    }
}
