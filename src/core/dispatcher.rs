//! The command loop.
//!
//! Each iteration echoes pending input, reads one key, appends it to the
//! pending sequence and resolves the sequence through the overriding,
//! buffer-local and global keymaps. A complete binding is dispatched with
//! the hooks around it; an incomplete one waits for more keys. Whatever a
//! command raises is contained here, so the loop survives every command
//! failure. `Quit` inside a recursive edit ends that level instead.

use std::rc::Rc;
use std::time::Duration;

use crate::core::app::EditorApp;
use crate::core::controller::{ECHO_DELAY, ERROR_PAUSE, ExitRequest, LoopExit};
use crate::core::error::{EditorError, Result};
use crate::core::frontend::ReadMode;
use crate::core::hooks::{HookKind, run_hooks};
use crate::core::key::{KeyCode, key_sequence_string};
use crate::core::keymap::{Binding, Lookup};
use crate::core::utf8::{RawBytes, classify_raw_bytes};

/// Run one level of the command loop until input ends, an exit request
/// applies to this level, or (inside a recursive edit) a command quits.
///
/// Only failures of the key source and of redisplay escape as `Err`.
pub fn command_loop(app: &mut EditorApp) -> Result<LoopExit> {
    loop {
        if let Some(exit) = check_exit_request(app) {
            return Ok(exit);
        }

        echo_input(app)?;

        let Some(key) = read_key(app, ReadMode::Blocking)? else {
            return Ok(LoopExit::Finished);
        };

        if let Err(err) = dispatch_key(app, key) {
            if let Some(exit) = handle_error(app, err)? {
                return Ok(exit);
            }
            continue;
        }

        app.redisplay()?;
    }
}

/// Run a nested command loop. Returns `Err(Quit)` if the level was aborted
/// or an unwind past it is in progress.
pub fn recursive_edit(app: &mut EditorApp) -> Result<()> {
    let controller = &mut app.controller;
    if controller.recursive_edit_level >= controller.max_recursive_edit_depth {
        return Err(EditorError::RecursionLimit);
    }
    controller.recursive_edit_level += 1;
    tracing::debug!(level = controller.recursive_edit_level, "enter recursive edit");

    let outcome = command_loop(app);

    let controller = &mut app.controller;
    controller.recursive_edit_level -= 1;
    controller.key_sequence.clear();
    tracing::debug!(level = controller.recursive_edit_level, ?outcome, "leave recursive edit");

    let exit = outcome?;
    let unwinding = matches!(
        controller.exit_request,
        Some(ExitRequest::TopLevel | ExitRequest::KillEditor)
    );
    if exit == LoopExit::Quit || unwinding {
        return Err(EditorError::Quit);
    }
    Ok(())
}

/// Next key: from the innermost macro player while one is active, else from
/// the live source. Live keys are appended to an active recording.
pub fn read_key(app: &mut EditorApp, mode: ReadMode) -> Result<Option<KeyCode>> {
    if app.controller.macros.is_executing() {
        return Ok(app.controller.macros.next_played_key());
    }
    let key = app.frontend.read_key(mode)?;
    if let Some(key) = key {
        app.controller.macros.record(key);
    }
    Ok(key)
}

/// Wait up to `timeout` for input. During playback there is no waiting; the
/// answer is whether the macro has keys left.
pub fn wait_input(app: &mut EditorApp, timeout: Duration) -> Result<bool> {
    if app.controller.macros.is_executing() {
        return Ok(app.controller.macros.has_pending_played_key());
    }
    app.frontend.wait_input(timeout)
}

/// Resolve `keys` against the active keymaps.
///
/// The overriding map wins over the current buffer's map, which wins over the
/// global map; the first layer that knows the sequence (as a leaf or as a
/// prefix) decides. Raw UTF-8 bytes no layer binds fall back to
/// `self-insert-command`.
pub fn key_binding(app: &EditorApp, keys: &[KeyCode]) -> Lookup {
    let layers = [
        app.controller.overriding_map.as_deref(),
        app.current_buffer().and_then(|buffer| buffer.keymap.as_ref()),
        Some(&app.global_map),
    ];
    for keymap in layers.into_iter().flatten() {
        match keymap.lookup(keys) {
            Lookup::Undefined => continue,
            found => return found,
        }
    }
    match classify_raw_bytes(keys) {
        RawBytes::Grapheme(_) => Lookup::Leaf(Binding::command("self-insert-command")),
        RawBytes::Incomplete => Lookup::Partial,
        RawBytes::NotRaw | RawBytes::Invalid => Lookup::Undefined,
    }
}

/// Run `binding` with the hooks around it. Post-command hooks run even when
/// the command fails.
pub fn run_command(app: &mut EditorApp, binding: Binding) -> Result<()> {
    tracing::debug!(
        command = %binding,
        keys = %key_sequence_string(&app.controller.this_command_keys),
        arg = ?app.controller.current_prefix_arg,
        "dispatch"
    );
    app.controller.this_command = Some(binding.clone());
    run_hooks(app, HookKind::PreCommand);

    let arg = app.controller.current_prefix_arg;
    let result = match &binding {
        Binding::Command(name) => app
            .registry
            .resolve(name)
            .and_then(|command| command.execute(app, arg)),
        Binding::Inline(action) => action(app),
    };

    run_hooks(app, HookKind::PostCommand);
    app.controller.this_command = None;
    app.controller.last_command = Some(binding);
    result
}

/// Play `keys` `times` times, each repetition in its own recursive edit.
///
/// Between repetitions the live source is polled for `keyboard-quit`.
pub fn execute_keyboard_macro(app: &mut EditorApp, keys: Rc<[KeyCode]>, times: usize) -> Result<()> {
    tracing::debug!(keys = %key_sequence_string(&keys), times, "execute keyboard macro");
    for repetition in 0..times {
        if repetition > 0 && received_keyboard_quit(app)? {
            return Err(EditorError::Quit);
        }
        app.controller.macros.push_player(Rc::clone(&keys));
        let result = recursive_edit(app);
        app.controller.macros.pop_player();
        result?;
    }
    Ok(())
}

/// Drain the live source without blocking. True if any drained key is bound
/// to `keyboard-quit` in the global map; the other keys are discarded.
pub fn received_keyboard_quit(app: &mut EditorApp) -> Result<bool> {
    while let Some(key) = app.frontend.read_key(ReadMode::Poll)? {
        if let Lookup::Leaf(binding) = app.global_map.lookup(&[key]) {
            if binding.name() == Some("keyboard-quit") {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn dispatch_key(app: &mut EditorApp, key: KeyCode) -> Result<()> {
    app.echo_area.clear();
    app.controller.last_key = Some(key);
    app.controller.key_sequence.push(key);

    match key_binding(app, &app.controller.key_sequence) {
        Lookup::Leaf(binding) => {
            let controller = &mut app.controller;
            controller.this_command_keys = std::mem::take(&mut controller.key_sequence);
            controller.current_prefix_arg = controller.prefix_arg.take_current();
            run_command(app, binding)
        }
        Lookup::Partial => Ok(()),
        Lookup::Undefined => {
            let keys = key_sequence_string(&app.controller.key_sequence);
            app.controller.key_sequence.clear();
            app.controller.prefix_arg.clear();
            app.clear_transient_map();
            tracing::debug!(%keys, "undefined key sequence");
            app.message(format!("{} is undefined", keys));
            Ok(())
        }
    }
}

/// Show the pending chord once it has sat for `ECHO_DELAY`.
fn echo_input(app: &mut EditorApp) -> Result<()> {
    if app.controller.macros.is_executing() {
        return Ok(());
    }
    if !app.controller.has_pending_input() {
        app.controller.echo_immediately = false;
        return Ok(());
    }
    if !app.controller.echo_immediately && wait_input(app, ECHO_DELAY)? {
        return Ok(());
    }
    app.controller.echo_immediately = true;
    let text = app.controller.pending_input_text();
    app.echo_area.show(text);
    app.redisplay()
}

/// Exit request applying to the current level, if any.
fn check_exit_request(app: &mut EditorApp) -> Option<LoopExit> {
    let level = app.controller.recursive_edit_level;
    match app.controller.exit_request? {
        ExitRequest::RecursiveEdit(exit) => {
            app.controller.exit_request = None;
            if level > 0 {
                return Some(exit);
            }
            app.message("No recursive edit is in progress");
            None
        }
        ExitRequest::TopLevel if level > 0 => Some(LoopExit::Quit),
        ExitRequest::TopLevel => {
            app.controller.exit_request = None;
            app.message("Back to top level");
            None
        }
        ExitRequest::KillEditor => {
            if level == 0 {
                app.controller.exit_request = None;
            }
            Some(LoopExit::Finished)
        }
    }
}

/// Recover from a failed iteration. Returns the exit for this level when the
/// failure ends it.
fn handle_error(app: &mut EditorApp, err: EditorError) -> Result<Option<LoopExit>> {
    let level = app.controller.recursive_edit_level;
    tracing::debug!(error = %err, level, "command failed");
    app.controller.reset_after_error();
    app.clear_transient_map();

    if err.is_quit() {
        if level > 0 {
            app.redisplay()?;
            return Ok(Some(LoopExit::Quit));
        }
        if app.controller.exit_request.is_some() {
            // Unwinding to the top level; the request reports itself.
            app.redisplay()?;
            return Ok(None);
        }
    }

    app.message(err.to_string());
    app.redisplay()?;
    if app.echo_area.is_active() {
        wait_input(app, ERROR_PAUSE)?;
        app.echo_area.clear();
        app.redisplay()?;
    }
    Ok(None)
}
