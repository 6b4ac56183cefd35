//! This module defines the central `EditorApp` structure: buffers, keymaps,
//! commands, hooks and the dispatch-loop state, threaded through every
//! command as `&mut EditorApp`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::{Config, ConfigValue};
use crate::core::buffer::{Buffer, BufferId};
use crate::core::command::CommandRegistry;
use crate::core::controller::{Controller, TransientMap};
use crate::core::echo_area::EchoArea;
use crate::core::error::Result;
use crate::core::frontend::{Frame, Frontend};
use crate::core::hooks::{HookId, HookKind, Hooks};
use crate::core::keymap::Keymap;

/// EditorApp: The root application state.
pub struct EditorApp {
    /// All buffers
    pub buffers: HashMap<BufferId, Buffer>,
    /// Buffer commands act on
    pub current_buffer: BufferId,
    /// Next buffer ID to allocate
    next_buffer_id: usize,
    /// Dispatch-loop state
    pub controller: Controller,
    pub global_map: Keymap,
    /// Installed as a transient map by `universal-argument`
    pub universal_argument_map: Rc<Keymap>,
    pub registry: CommandRegistry,
    pub hooks: Hooks,
    pub echo_area: EchoArea,
    pub settings: HashMap<String, ConfigValue>,
    pub frontend: Box<dyn Frontend>,
}

impl EditorApp {
    /// A bare editor: one scratch buffer, empty keymaps, no commands.
    pub fn new(frontend: Box<dyn Frontend>) -> Self {
        let buffer_id = BufferId(0);
        let mut buffers = HashMap::new();
        buffers.insert(buffer_id, Buffer::new("*scratch*"));

        Self {
            buffers,
            current_buffer: buffer_id,
            next_buffer_id: 1,
            controller: Controller::new(),
            global_map: Keymap::new(),
            universal_argument_map: Rc::new(Keymap::new()),
            registry: CommandRegistry::new(),
            hooks: Hooks::new(),
            echo_area: EchoArea::new(),
            settings: HashMap::new(),
            frontend,
        }
    }

    /// Initialize an EditorApp with config settings and initial files.
    ///
    /// Registers every command, compiles the configured bindings into the
    /// global map and visits the first file, if any.
    pub fn initialize_with_config(
        config: &Config,
        files: &[PathBuf],
        frontend: Box<dyn Frontend>,
    ) -> Result<Self> {
        let mut app = Self::new(frontend);
        app.settings = config.settings.clone();

        if let Some(depth) = config.get_int("max_recursive_edit_depth") {
            app.controller.max_recursive_edit_depth = depth.max(1) as usize;
        }

        crate::core::commands::register_all(&mut app)?;

        for (desc, command) in &config.keybindings {
            if !app.registry.contains(command) {
                tracing::warn!(key = %desc, %command, "binding names an unknown command");
            }
            if let Err(err) = app.global_map.bind_command(desc, command) {
                tracing::warn!(key = %desc, %command, error = %err, "skipping keybinding");
            }
        }
        tracing::info!(
            bindings = app.global_map.len(),
            commands = app.registry.len(),
            "editor initialized"
        );

        if let Some(path) = files.first() {
            if let Err(err) = app.open_file(path) {
                tracing::warn!(path = %path.display(), error = %err, "cannot open file");
                app.message(err.to_string());
            }
        }

        Ok(app)
    }

    /// Allocate a new buffer ID
    pub fn alloc_buffer_id(&mut self) -> BufferId {
        let id = BufferId(self.next_buffer_id);
        self.next_buffer_id += 1;
        id
    }

    /// Add a buffer directly (returns its ID)
    pub fn add_buffer(&mut self, buffer: Buffer) -> BufferId {
        let buffer_id = self.alloc_buffer_id();
        self.buffers.insert(buffer_id, buffer);
        buffer_id
    }

    /// Visit `path` in a new buffer and make it current.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> Result<BufferId> {
        let buffer = Buffer::from_file(path)?;
        let buffer_id = self.add_buffer(buffer);
        self.current_buffer = buffer_id;
        Ok(buffer_id)
    }

    pub fn current_buffer(&self) -> Option<&Buffer> {
        self.buffers.get(&self.current_buffer)
    }

    pub fn current_buffer_mut(&mut self) -> Option<&mut Buffer> {
        self.buffers.get_mut(&self.current_buffer)
    }

    /// Show `text` in the echo area.
    pub fn message(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!(message = %text, "echo");
        self.echo_area.show(text);
    }

    pub fn add_hook(
        &mut self,
        kind: HookKind,
        hook: impl Fn(&mut EditorApp, HookId) -> Result<()> + 'static,
    ) -> HookId {
        self.hooks.add(kind, hook)
    }

    pub fn remove_hook(&mut self, kind: HookKind, id: HookId) -> bool {
        self.hooks.remove(kind, id)
    }

    /// Make `map` the overriding keymap for exactly the next key sequence.
    ///
    /// The previous overriding map comes back from a pre-command hook. That
    /// hook runs after resolution, so the next command is still looked up in
    /// `map`. A sequence that ends without a command (undefined, or an error)
    /// restores it through [`EditorApp::clear_transient_map`].
    pub fn set_transient_map(&mut self, map: Rc<Keymap>) {
        let saved = match self.controller.transient_map.take() {
            // Replacing a pending transient map keeps the map it displaced.
            Some(pending) => {
                self.remove_hook(HookKind::PreCommand, pending.hook);
                self.controller.overriding_map = Some(map);
                pending.saved
            }
            None => self.controller.overriding_map.replace(map),
        };
        let hook = self.add_hook(HookKind::PreCommand, |app, _| {
            app.clear_transient_map();
            Ok(())
        });
        self.controller.transient_map = Some(TransientMap { hook, saved });
    }

    /// Drop a pending transient map, restoring the overriding map it replaced.
    pub fn clear_transient_map(&mut self) {
        if let Some(pending) = self.controller.transient_map.take() {
            self.controller.overriding_map = pending.saved;
            self.remove_hook(HookKind::PreCommand, pending.hook);
        }
    }

    /// Push the current state to the frontend.
    pub fn redisplay(&mut self) -> Result<()> {
        let Some(buffer) = self.buffers.get(&self.current_buffer) else {
            return Ok(());
        };
        let frame = Frame {
            buffer,
            echo: self.echo_area.text(),
            recursive_edit_level: self.controller.recursive_edit_level,
            recording_macro: self.controller.macros.is_recording(),
        };
        self.frontend.redisplay(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frontend::Script;
    use crate::core::keymap::{Binding, Lookup};

    fn app() -> EditorApp {
        EditorApp::new(Box::new(Script::new().frontend()))
    }

    #[test]
    fn test_app_new() {
        let app = app();
        assert_eq!(app.buffers.len(), 1);
        assert_eq!(app.current_buffer().map(|b| b.name.as_str()), Some("*scratch*"));
        assert!(app.registry.is_empty());
    }

    #[test]
    fn test_transient_map_restores_previous_overriding_map() {
        let mut app = app();
        let mut outer = Keymap::new();
        outer.bind_command("a", "outer").unwrap();
        let outer = Rc::new(outer);
        app.controller.overriding_map = Some(Rc::clone(&outer));

        let mut transient = Keymap::new();
        transient.bind_command("a", "inner").unwrap();
        app.set_transient_map(Rc::new(transient));

        let active = app.controller.overriding_map.clone().unwrap();
        assert_eq!(active.lookup(&[crate::core::key::KeyCode::from('a')]), Lookup::Leaf(Binding::command("inner")));

        crate::core::hooks::run_hooks(&mut app, HookKind::PreCommand);
        let restored = app.controller.overriding_map.clone().unwrap();
        assert!(Rc::ptr_eq(&restored, &outer));
        assert!(app.hooks.is_empty(HookKind::PreCommand));
        assert!(app.controller.transient_map.is_none());
    }

    #[test]
    fn test_clear_transient_map_without_command() {
        let mut app = app();
        app.set_transient_map(Rc::new(Keymap::new()));
        app.set_transient_map(Rc::new(Keymap::new()));
        assert_eq!(app.hooks.len(HookKind::PreCommand), 1);

        app.clear_transient_map();
        assert!(app.controller.overriding_map.is_none());
        assert!(app.controller.transient_map.is_none());
        assert!(app.hooks.is_empty(HookKind::PreCommand));

        // Nothing pending: a no-op.
        app.clear_transient_map();
        assert!(app.controller.overriding_map.is_none());
    }

    #[test]
    fn test_initialize_with_config_applies_settings_and_bindings() {
        let mut config = Config::default();
        config.bind("C-c z", "keyboard-quit");
        config.bind("C-c", "no-such-key-description-error-here");
        config.bind("C-q C-", "keyboard-quit");
        config.set("max_recursive_edit_depth", 8i64);

        let app = EditorApp::initialize_with_config(
            &config,
            &[],
            Box::new(Script::new().frontend()),
        )
        .unwrap();
        assert_eq!(app.controller.max_recursive_edit_depth, 8);
        assert!(app.registry.contains("keyboard-quit"));
        // Later bindings overwrite earlier ones, invalid descriptions are skipped.
        assert_eq!(
            app.global_map.lookup(&crate::core::key::kbd("C-c").unwrap()),
            Lookup::Leaf(Binding::command("no-such-key-description-error-here"))
        );
    }

    #[test]
    fn test_open_file_makes_buffer_current() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "hello").unwrap();
        let mut app = app();
        let id = app.open_file(&path).unwrap();
        assert_eq!(app.current_buffer, id);
        assert_eq!(app.current_buffer().unwrap().text(), "hello");
    }
}
