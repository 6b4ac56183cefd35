//! Translation from crossterm events to the raw key codes the keymaps see.
//!
//! A terminal delivers bytes; crossterm decodes them into structured events.
//! The dispatcher wants the bytes back: `C-x` is `0x18`, `M-x` is ESC
//! followed by `x` and a non-ASCII character arrives as its UTF-8 bytes so
//! the self-insert fallback can reassemble it. Keys with no byte encoding
//! become synthetic codes above `0xff`.

use crossterm::event::{Event, KeyCode as TermKey, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::key::{
    KEY_BACKSPACE, KEY_BTAB, KEY_DC, KEY_DEL, KEY_DOWN, KEY_END, KEY_ESC, KEY_HOME, KEY_IC,
    KEY_LEFT, KEY_NPAGE, KEY_NUL, KEY_PPAGE, KEY_RESIZE, KEY_RET, KEY_RIGHT, KEY_TAB, KEY_UP,
    KeyCode,
};

/// Key codes for one terminal event. Events that carry no key (focus
/// changes, mouse, key releases) yield nothing.
pub fn event_to_keys(event: Event) -> Vec<KeyCode> {
    match event {
        Event::Key(key_event) => key_event_to_keys(key_event),
        Event::Resize(_, _) => vec![KEY_RESIZE],
        Event::Paste(text) => text.bytes().map(KeyCode::from).collect(),
        _ => Vec::new(),
    }
}

pub fn key_event_to_keys(key_event: KeyEvent) -> Vec<KeyCode> {
    if key_event.kind == KeyEventKind::Release {
        return Vec::new();
    }

    let modifiers = key_event.modifiers;
    let alt = modifiers.contains(KeyModifiers::ALT);
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    let mut keys = Vec::new();
    if alt {
        keys.push(KEY_ESC);
    }

    match key_event.code {
        TermKey::Char(c) => {
            if ctrl {
                match KeyCode::ctrl(c.to_ascii_lowercase()).or_else(|| KeyCode::ctrl(c)) {
                    Some(code) => keys.push(code),
                    None => push_char(&mut keys, c),
                }
            } else {
                push_char(&mut keys, c);
            }
        }
        TermKey::Enter => keys.push(KEY_RET),
        TermKey::Tab => keys.push(KEY_TAB),
        TermKey::BackTab => keys.push(KEY_BTAB),
        // Terminals send DEL for the backspace key.
        TermKey::Backspace if ctrl => keys.push(KEY_BACKSPACE),
        TermKey::Backspace => keys.push(KEY_DEL),
        TermKey::Esc => keys.push(KEY_ESC),
        TermKey::Left => keys.push(KEY_LEFT),
        TermKey::Right => keys.push(KEY_RIGHT),
        TermKey::Up => keys.push(KEY_UP),
        TermKey::Down => keys.push(KEY_DOWN),
        TermKey::Home => keys.push(KEY_HOME),
        TermKey::End => keys.push(KEY_END),
        TermKey::PageUp => keys.push(KEY_PPAGE),
        TermKey::PageDown => keys.push(KEY_NPAGE),
        TermKey::Delete => keys.push(KEY_DC),
        TermKey::Insert => keys.push(KEY_IC),
        TermKey::F(n) => keys.push(KeyCode::function(n)),
        TermKey::Null => keys.push(KEY_NUL),
        _ => return Vec::new(),
    }
    keys
}

fn push_char(keys: &mut Vec<KeyCode>, c: char) {
    let mut buf = [0u8; 4];
    keys.extend(c.encode_utf8(&mut buf).bytes().map(KeyCode::from));
}
