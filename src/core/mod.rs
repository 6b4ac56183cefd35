//! The headless command-dispatch engine of chordline: keymaps, the prefix
//! argument, keyboard macros, hooks and the re-entrant command loop, plus the
//! small buffer model the demonstration commands edit.

pub mod app;
pub mod buffer;
pub mod command;
pub mod commands;
pub mod controller;
pub mod dispatcher;
pub mod echo_area;
pub mod error;
pub mod frontend;
pub mod hooks;
pub mod kbd_macro;
pub mod key;
pub mod keymap;
pub mod prefix_arg;
pub mod utf8;
