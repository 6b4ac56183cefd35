// chordline default configuration
// Key descriptions use Emacs notation: "C-x C-s", "M-5", "<up>", "RET".
// A config.toml [keybindings] table is applied on top of these.

use crate::config::Config;

/// User configuration function
pub fn configure(config: &mut Config) {
    // Printable ASCII inserts itself
    for byte in 0x21u8..=0x7e {
        config.bind(&(byte as char).to_string(), "self-insert-command");
    }
    config.bind("SPC", "self-insert-command");
    config.bind("TAB", "self-insert-command");

    // Editing
    config.bind("RET", "newline");
    config.bind("C-j", "newline");
    config.bind("C-d", "delete-char");
    config.bind("<dc>", "delete-char");
    config.bind("DEL", "delete-backward-char");
    config.bind("<backspace>", "delete-backward-char");
    config.bind("C-h", "delete-backward-char");

    // Movement
    config.bind("C-f", "forward-char");
    config.bind("<right>", "forward-char");
    config.bind("C-b", "backward-char");
    config.bind("<left>", "backward-char");
    config.bind("C-a", "beginning-of-line");
    config.bind("<home>", "beginning-of-line");
    config.bind("C-e", "end-of-line");
    config.bind("<end>", "end-of-line");

    // Files and exit
    config.bind("C-x C-s", "save-buffer");
    config.bind("C-x C-c", "save-buffers-kill-editor");

    // Prefix arguments
    config.bind("C-u", "universal-argument");
    for digit in '0'..='9' {
        config.bind(&format!("M-{}", digit), "digit-argument");
    }
    config.bind("M--", "negative-argument");

    // Quitting and recursive edits
    config.bind("C-g", "keyboard-quit");
    config.bind("C-M-c", "exit-recursive-edit");
    config.bind("C-]", "abort-recursive-edit");
    config.bind("C-x r e", "recursive-edit");
    config.bind("C-x r t", "top-level");

    // Keyboard macros
    config.bind("C-x (", "start-kbd-macro");
    config.bind("C-x )", "end-kbd-macro");
    config.bind("C-x e", "call-last-kbd-macro");

    // Help
    config.bind("C-x ?", "describe-key-briefly");

    // Settings
    config.set("max_recursive_edit_depth", 64i64);
    config.set("tab_width", 8i64);
}
