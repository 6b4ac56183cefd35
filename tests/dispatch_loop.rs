use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pretty_assertions::assert_eq;

use chordline::config::Config;
use chordline::core::app::EditorApp;
use chordline::core::controller::{ECHO_DELAY, ERROR_PAUSE, LoopExit};
use chordline::core::dispatcher::{command_loop, key_binding, recursive_edit};
use chordline::core::error::EditorError;
use chordline::core::frontend::Script;
use chordline::core::hooks::HookKind;
use chordline::core::key::{KeyCode, kbd};
use chordline::core::keymap::{Binding, Keymap, Lookup};
use chordline::core::prefix_arg::PrefixArg;

fn editor(desc: &str) -> (EditorApp, Script) {
    let script = Script::from_desc(desc).unwrap();
    let mut config = Config::default();
    chordline::user_config::configure(&mut config);
    let app = EditorApp::initialize_with_config(&config, &[], Box::new(script.frontend())).unwrap();
    (app, script)
}

fn text(app: &EditorApp) -> String {
    app.current_buffer().unwrap().text()
}

/// Bind `C-c c` to a command that records the prefix argument it receives.
fn capture_prefix(app: &mut EditorApp) -> Rc<RefCell<Vec<Option<PrefixArg>>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    app.registry.define_fn("capture-prefix", move |_, arg| {
        sink.borrow_mut().push(arg);
        Ok(())
    });
    app.global_map.bind_command("C-c c", "capture-prefix").unwrap();
    seen
}

#[test]
fn test_chord_invokes_once_and_clears_sequence() {
    let script = Script::from_keys([KeyCode(0x18), KeyCode(0x03)]);
    let mut app = EditorApp::new(Box::new(script.frontend()));
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    app.global_map
        .bind(
            &[KeyCode(0x18), KeyCode(0x03)],
            Binding::inline(move |_| {
                counter.set(counter.get() + 1);
                Ok(())
            }),
        )
        .unwrap();

    assert_eq!(command_loop(&mut app).unwrap(), LoopExit::Finished);
    assert_eq!(calls.get(), 1);
    assert!(app.controller.key_sequence.is_empty());
    assert_eq!(app.controller.this_command_keys, vec![KeyCode(0x18), KeyCode(0x03)]);
}

#[test]
fn test_prefix_argument_is_single_use() {
    let (mut app, _) = editor("C-u 3 a b");
    command_loop(&mut app).unwrap();
    assert_eq!(text(&app), "aaab");
    assert!(!app.controller.prefix_arg.is_pending());
    assert_eq!(app.controller.current_prefix_arg, None);
}

#[test]
fn test_prefix_argument_forms() {
    let (mut app, _) = editor("C-u 1 2 C-c c C-u C-u C-c c M-- C-c c M-5 2 C-c c C-u - 7 C-c c C-c c");
    let seen = capture_prefix(&mut app);
    command_loop(&mut app).unwrap();
    assert_eq!(
        *seen.borrow(),
        vec![
            Some(PrefixArg::Value(12)),
            Some(PrefixArg::Universal(16)),
            Some(PrefixArg::Negative),
            Some(PrefixArg::Value(52)),
            Some(PrefixArg::Value(-7)),
            None,
        ]
    );
}

#[test]
fn test_transient_map_is_gone_after_next_command() {
    let (mut app, _) = editor("C-u a");
    command_loop(&mut app).unwrap();
    assert_eq!(text(&app), "aaaa");
    assert!(app.controller.overriding_map.is_none());
    assert!(app.hooks.is_empty(HookKind::PreCommand));
}

#[test]
fn test_undefined_sequence_drops_transient_map() {
    let (mut app, _) = editor("C-u C-x C-z 5");
    command_loop(&mut app).unwrap();
    // The digit after the undefined chord is an ordinary key again.
    assert_eq!(text(&app), "5");
    assert!(app.controller.overriding_map.is_none());
    assert!(app.controller.transient_map.is_none());
    assert!(app.hooks.is_empty(HookKind::PreCommand));
}

#[test]
fn test_failed_command_drops_transient_map() {
    let (mut app, script) = editor("C-c f 5");
    app.registry.define_fn("arm-and-fail", |app, _| {
        let map = Rc::clone(&app.universal_argument_map);
        app.set_transient_map(map);
        Err(EditorError::message("failed after arming"))
    });
    app.global_map.bind_command("C-c f", "arm-and-fail").unwrap();

    command_loop(&mut app).unwrap();
    assert_eq!(text(&app), "5");
    assert!(app.controller.overriding_map.is_none());
    assert!(app.hooks.is_empty(HookKind::PreCommand));
    assert_eq!(script.waits(), vec![ECHO_DELAY, ERROR_PAUSE]);
}

#[test]
fn test_prefix_error_then_digit_inserts() {
    let (mut app, _) = editor("C-u C-b 5");
    command_loop(&mut app).unwrap();
    assert_eq!(text(&app), "5");
    assert!(app.controller.overriding_map.is_none());
}

#[test]
fn test_huge_prefix_arguments_are_contained() {
    let nines = vec!["9"; 20].join(" ");
    let desc = format!("C-u {nines} a C-u - {nines} C-b C-u {nines} DEL C-u {nines} C-x ( x");
    let (mut app, _) = editor(&desc);
    assert_eq!(command_loop(&mut app).unwrap(), LoopExit::Finished);
    // The oversized insert and both motions fail without touching the text.
    assert_eq!(text(&app), "x");
    assert!(!app.controller.prefix_arg.is_pending());
    assert!(app.controller.macros.is_recording());
}

#[test]
fn test_overriding_map_beats_global() {
    let (mut app, _) = editor("a");
    let mut map = Keymap::new();
    map.bind_description("a", Binding::inline(|app| {
        app.current_buffer_mut().unwrap().insert("Z");
        Ok(())
    }))
    .unwrap();
    app.controller.overriding_map = Some(Rc::new(map));
    command_loop(&mut app).unwrap();
    assert_eq!(text(&app), "Z");
}

#[test]
fn test_buffer_local_partial_shadows_global_leaf() {
    let (mut app, _) = editor("a b c");
    let mut local = Keymap::new();
    local
        .bind_description("a b", Binding::inline(|app| {
            app.current_buffer_mut().unwrap().insert("!");
            Ok(())
        }))
        .unwrap();
    app.current_buffer_mut().unwrap().keymap = Some(local);

    assert_eq!(key_binding(&app, &kbd("a").unwrap()), Lookup::Partial);
    command_loop(&mut app).unwrap();
    // "c" is not in the local map and falls through to the global one.
    assert_eq!(text(&app), "!c");
}

#[test]
fn test_utf8_fallback_inserts_character() {
    let (mut app, _) = editor("é 日");
    command_loop(&mut app).unwrap();
    assert_eq!(text(&app), "é日");
}

#[test]
fn test_invalid_bytes_are_undefined() {
    let script = Script::from_keys([KeyCode(0xff), KeyCode::from('a')]);
    let mut config = Config::default();
    chordline::user_config::configure(&mut config);
    let mut app = EditorApp::initialize_with_config(&config, &[], Box::new(script.frontend())).unwrap();

    assert_eq!(key_binding(&app, &[KeyCode(0xc3)]), Lookup::Partial);
    assert_eq!(key_binding(&app, &[KeyCode(0xff)]), Lookup::Undefined);

    command_loop(&mut app).unwrap();
    assert_eq!(text(&app), "a");
    assert!(app.controller.key_sequence.is_empty());
}

#[test]
fn test_undefined_sequence_is_reported() {
    let (mut app, script) = editor("C-x C-z");
    command_loop(&mut app).unwrap();
    assert_eq!(app.echo_area.text(), Some("C-x C-z is undefined"));
    assert_eq!(script.last_echo().as_deref(), Some("C-x C-z is undefined"));
    assert!(app.controller.key_sequence.is_empty());
}

#[test]
fn test_error_leaves_loop_running() {
    let (mut app, script) = editor("C-b x");
    assert_eq!(command_loop(&mut app).unwrap(), LoopExit::Finished);
    assert_eq!(text(&app), "x");
    assert!(app.controller.key_sequence.is_empty());
    assert_eq!(script.waits(), vec![ERROR_PAUSE]);
}

#[test]
fn test_error_pause_is_shown_then_cleared() {
    let (mut app, script) = editor("C-d");
    command_loop(&mut app).unwrap();
    assert_eq!(script.waits(), vec![ERROR_PAUSE]);
    assert!(!app.echo_area.is_active());
    assert_eq!(script.last_echo(), None);
}

#[test]
fn test_echo_waits_then_shows_pending_chord() {
    let (mut app, script) = editor("C-x");
    command_loop(&mut app).unwrap();
    assert_eq!(script.waits(), vec![ECHO_DELAY]);
    assert_eq!(script.last_echo().as_deref(), Some("C-x-"));
}

#[test]
fn test_echo_skipped_when_keys_follow() {
    let (mut app, script) = editor("C-x C-z");
    command_loop(&mut app).unwrap();
    assert_eq!(script.waits(), vec![ECHO_DELAY]);
    assert_ne!(script.last_echo().as_deref(), Some("C-x-"));
}

#[test]
fn test_recursive_edit_restores_depth_on_quit() {
    let (mut app, _) = editor("a C-g b");
    let result = recursive_edit(&mut app);
    assert!(matches!(result, Err(EditorError::Quit)));
    assert_eq!(app.controller.recursive_edit_level, 0);
    assert_eq!(text(&app), "a");
}

#[test]
fn test_quit_redisplays_before_leaving_level() {
    let (mut app, script) = editor("C-g");
    assert!(matches!(recursive_edit(&mut app), Err(EditorError::Quit)));
    assert_eq!(script.redisplay_count(), 1);
}

#[test]
fn test_abort_recursive_edit_returns_to_outer_level() {
    let (mut app, _) = editor("C-x r e a C-] b");
    command_loop(&mut app).unwrap();
    assert_eq!(text(&app), "ab");
    assert_eq!(app.controller.recursive_edit_level, 0);
}

#[test]
fn test_exit_recursive_edit_finishes_level() {
    let (mut app, _) = editor("C-x r e a C-M-c b");
    command_loop(&mut app).unwrap();
    assert_eq!(text(&app), "ab");
    assert_eq!(app.controller.recursive_edit_level, 0);
    assert_eq!(app.controller.exit_request, None);
}

#[test]
fn test_exit_recursive_edit_at_top_level_is_reported() {
    let (mut app, script) = editor("C-M-c a");
    assert_eq!(command_loop(&mut app).unwrap(), LoopExit::Finished);
    assert_eq!(text(&app), "a");
    // C-M-c is ESC C-c, so the ESC prefix is echo-waited first.
    assert_eq!(script.waits(), vec![ECHO_DELAY, ERROR_PAUSE]);
}

#[test]
fn test_top_level_unwinds_every_level() {
    let (mut app, _) = editor("C-x r e C-x r e C-x r t a");
    command_loop(&mut app).unwrap();
    assert_eq!(app.controller.recursive_edit_level, 0);
    assert_eq!(app.controller.exit_request, None);
    assert_eq!(text(&app), "a");
}

#[test]
fn test_kill_editor_from_recursive_edit_ends_loop() {
    let (mut app, script) = editor("C-x r e a C-x C-c b");
    assert_eq!(command_loop(&mut app).unwrap(), LoopExit::Finished);
    assert_eq!(text(&app), "a");
    assert_eq!(script.pending_keys(), 1);
    assert_eq!(app.controller.recursive_edit_level, 0);
}

#[test]
fn test_recursion_limit_is_reported() {
    let (mut app, _) = editor("C-x r e C-x r e C-x r e a");
    app.controller.max_recursive_edit_depth = 2;
    command_loop(&mut app).unwrap();
    assert_eq!(text(&app), "a");
}

#[test]
fn test_rebinding_is_idempotent() {
    let (mut app, _) = editor("");
    let before = app.global_map.len();
    app.global_map.bind_command("C-c r", "forward-char").unwrap();
    app.global_map.bind_command("C-c r", "forward-char").unwrap();
    assert_eq!(app.global_map.len(), before + 1);
    assert_eq!(
        app.global_map.lookup(&kbd("C-c r").unwrap()),
        Lookup::Leaf(Binding::command("forward-char"))
    );
}

#[test]
fn test_failing_hook_is_detached() {
    let (mut app, _) = editor("a b");
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    app.add_hook(HookKind::PostCommand, move |_, _| {
        counter.set(counter.get() + 1);
        Err(EditorError::message("boom"))
    });

    command_loop(&mut app).unwrap();
    assert_eq!(calls.get(), 1);
    assert!(app.hooks.is_empty(HookKind::PostCommand));
    assert_eq!(text(&app), "ab");
}

#[test]
fn test_hooks_see_the_running_command() {
    let (mut app, _) = editor("a C-b");
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    app.add_hook(HookKind::PreCommand, move |app, _| {
        let name = app.controller.this_command.as_ref().map(|b| b.to_string());
        sink.borrow_mut().push(name);
        Ok(())
    });
    command_loop(&mut app).unwrap();
    assert_eq!(
        *seen.borrow(),
        vec![
            Some("self-insert-command".to_string()),
            Some("backward-char".to_string())
        ]
    );
    assert_eq!(app.controller.last_command, Some(Binding::command("backward-char")));
}

#[test]
fn test_describe_key_briefly() {
    let (mut app, _) = editor("C-x ? C-x C-s");
    command_loop(&mut app).unwrap();
    assert_eq!(
        app.echo_area.text(),
        Some("C-x C-s runs the command save-buffer")
    );
    assert_eq!(text(&app), "");
}

#[test]
fn test_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "line\n").unwrap();

    let script = Script::from_desc("C-e C-u 2 ! C-x C-s").unwrap();
    let mut config = Config::default();
    chordline::user_config::configure(&mut config);
    let mut app = EditorApp::initialize_with_config(
        &config,
        std::slice::from_ref(&path),
        Box::new(script.frontend()),
    )
    .unwrap();

    command_loop(&mut app).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "line!!\n");
    assert!(!app.current_buffer().unwrap().modified);
    assert_eq!(
        app.echo_area.text().map(str::to_string),
        Some(format!("Wrote {}", path.display()))
    );
}

#[test]
fn test_source_failure_escapes_loop() {
    let (mut app, script) = editor("a");
    script.fail_when_empty();
    assert!(matches!(command_loop(&mut app), Err(EditorError::Io(_))));
    assert_eq!(text(&app), "a");
}
