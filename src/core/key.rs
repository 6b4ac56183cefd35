//! Key codes and key descriptions.
//!
//! A [`KeyCode`] is one unit of input as the dispatch loop sees it. Codes
//! `0x00..=0xFF` are bytes exactly as a raw terminal delivers them, so a
//! non-ASCII character arrives as its UTF-8 byte sequence. Codes from `0x100`
//! up are synthetic keys (arrows, function keys, resize), numbered after the
//! curses `KEY_*` constants.

use std::fmt;
use std::str::FromStr;

use crate::core::error::EditorError;

/// One input unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u32);

pub const KEY_NUL: KeyCode = KeyCode(0x00);
pub const KEY_TAB: KeyCode = KeyCode(0x09);
pub const KEY_RET: KeyCode = KeyCode(0x0d);
pub const KEY_ESC: KeyCode = KeyCode(0x1b);
pub const KEY_SPC: KeyCode = KeyCode(0x20);
pub const KEY_DEL: KeyCode = KeyCode(0x7f);

pub const KEY_DOWN: KeyCode = KeyCode(0x102);
pub const KEY_UP: KeyCode = KeyCode(0x103);
pub const KEY_LEFT: KeyCode = KeyCode(0x104);
pub const KEY_RIGHT: KeyCode = KeyCode(0x105);
pub const KEY_HOME: KeyCode = KeyCode(0x106);
pub const KEY_BACKSPACE: KeyCode = KeyCode(0x107);
/// `KEY_F0 + n` is function key `n`.
pub const KEY_F0: KeyCode = KeyCode(0x108);
pub const KEY_DC: KeyCode = KeyCode(0x14a);
pub const KEY_IC: KeyCode = KeyCode(0x14b);
pub const KEY_NPAGE: KeyCode = KeyCode(0x152);
pub const KEY_PPAGE: KeyCode = KeyCode(0x153);
pub const KEY_BTAB: KeyCode = KeyCode(0x161);
pub const KEY_END: KeyCode = KeyCode(0x168);
pub const KEY_RESIZE: KeyCode = KeyCode(0x19a);

const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("down", KEY_DOWN),
    ("up", KEY_UP),
    ("left", KEY_LEFT),
    ("right", KEY_RIGHT),
    ("home", KEY_HOME),
    ("end", KEY_END),
    ("backspace", KEY_BACKSPACE),
    ("dc", KEY_DC),
    ("ic", KEY_IC),
    ("next", KEY_NPAGE),
    ("prior", KEY_PPAGE),
    ("backtab", KEY_BTAB),
    ("resize", KEY_RESIZE),
];

impl KeyCode {
    /// Function key `F<n>`.
    pub fn function(n: u8) -> Self {
        KeyCode(KEY_F0.0 + n as u32)
    }

    /// The control variant of an ASCII character (`C-a` is `0x01`).
    pub fn ctrl(c: char) -> Option<Self> {
        match c {
            '?' => Some(KEY_DEL),
            ' ' | '@' => Some(KEY_NUL),
            'a'..='z' => Some(KeyCode(c as u32 - 'a' as u32 + 1)),
            'A'..='_' => Some(KeyCode(c as u32 & 0x1f)),
            _ => None,
        }
    }

    /// True for codes that fit in a byte, i.e. anything a raw terminal delivers
    /// directly (as opposed to synthetic keys).
    pub fn is_byte(self) -> bool {
        self.0 <= 0xff
    }

    /// The ASCII character for this code, if it is one.
    pub fn as_ascii(self) -> Option<char> {
        if self.0 < 0x80 {
            char::from_u32(self.0)
        } else {
            None
        }
    }

    fn special_name(self) -> Option<String> {
        if let Some((name, _)) = NAMED_KEYS.iter().find(|(_, code)| *code == self) {
            return Some(format!("<{}>", name));
        }
        if self.0 > KEY_F0.0 && self.0 <= KEY_F0.0 + 24 {
            return Some(format!("<f{}>", self.0 - KEY_F0.0));
        }
        None
    }
}

impl From<u8> for KeyCode {
    fn from(b: u8) -> Self {
        KeyCode(b as u32)
    }
}

impl From<char> for KeyCode {
    /// Only meaningful for ASCII; non-ASCII characters are several key codes.
    fn from(c: char) -> Self {
        KeyCode(c as u32)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            KEY_ESC => write!(f, "ESC"),
            KEY_RET => write!(f, "RET"),
            KEY_TAB => write!(f, "TAB"),
            KEY_SPC => write!(f, "SPC"),
            KEY_DEL => write!(f, "DEL"),
            KeyCode(c @ 0x00..=0x1f) => {
                let base = (c as u8 ^ 0x40) as char;
                write!(f, "C-{}", base.to_ascii_lowercase())
            }
            KeyCode(c @ 0x21..=0x7e) => write!(f, "{}", c as u8 as char),
            KeyCode(c @ 0x80..=0xff) => write!(f, "\\x{:02X}", c),
            other => match other.special_name() {
                Some(name) => write!(f, "{}", name),
                None => write!(f, "<key-{:#x}>", other.0),
            },
        }
    }
}

/// Render a key sequence for messages. `ESC x` is shown as `M-x`.
pub fn key_sequence_string(keys: &[KeyCode]) -> String {
    let mut parts = Vec::with_capacity(keys.len());
    let mut iter = keys.iter().peekable();
    while let Some(&key) = iter.next() {
        if key == KEY_ESC {
            if let Some(&&next) = iter.peek() {
                if next != KEY_ESC {
                    iter.next();
                    parts.push(format!("M-{}", next));
                    continue;
                }
            }
        }
        parts.push(key.to_string());
    }
    parts.join(" ")
}

/// A parsed key description such as `"C-x C-f"` or `"M-<"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySequence(pub Vec<KeyCode>);

impl KeySequence {
    pub fn as_slice(&self) -> &[KeyCode] {
        &self.0
    }
}

impl FromStr for KeySequence {
    type Err = EditorError;

    /// Parse a whitespace-separated description.
    ///
    /// Each token may carry `C-` and `M-` modifiers. `M-` expands to an `ESC`
    /// prefix, since that is what terminals send. Named keys are `RET`, `TAB`,
    /// `SPC`, `ESC`, `DEL` and the bracketed synthetic keys (`<up>`, `<f1>`,
    /// ...). Any other token must be a single character; non-ASCII characters
    /// expand to their UTF-8 bytes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut keys = Vec::new();
        for token in s.split_whitespace() {
            parse_token(token, &mut keys)?;
        }
        if keys.is_empty() {
            return Err(EditorError::InvalidKey(s.to_string()));
        }
        Ok(KeySequence(keys))
    }
}

/// Parse a description into key codes. Shorthand for `desc.parse::<KeySequence>()`.
pub fn kbd(desc: &str) -> Result<Vec<KeyCode>, EditorError> {
    desc.parse::<KeySequence>().map(|seq| seq.0)
}

fn parse_token(token: &str, out: &mut Vec<KeyCode>) -> Result<(), EditorError> {
    let invalid = || EditorError::InvalidKey(token.to_string());

    let mut ctrl = false;
    let mut meta = false;
    let mut rest = token;
    loop {
        if rest.len() > 2 && rest.starts_with("C-") {
            ctrl = true;
            rest = &rest[2..];
        } else if rest.len() > 2 && rest.starts_with("M-") {
            meta = true;
            rest = &rest[2..];
        } else {
            break;
        }
    }

    let base = match rest {
        "RET" => vec![KEY_RET],
        "TAB" => vec![KEY_TAB],
        "SPC" => vec![KEY_SPC],
        "ESC" => vec![KEY_ESC],
        "DEL" => vec![KEY_DEL],
        _ if rest.starts_with('<') && rest.ends_with('>') && rest.len() > 2 => {
            let name = &rest[1..rest.len() - 1];
            vec![parse_named(name).ok_or_else(invalid)?]
        }
        _ => {
            let mut chars = rest.chars();
            let c = chars.next().ok_or_else(invalid)?;
            if chars.next().is_some() {
                return Err(invalid());
            }
            let mut buf = [0u8; 4];
            c.encode_utf8(&mut buf).bytes().map(KeyCode::from).collect()
        }
    };

    let base = if ctrl {
        let c = match base.as_slice() {
            [KEY_SPC] => ' ',
            [single] => single.as_ascii().ok_or_else(invalid)?,
            _ => return Err(invalid()),
        };
        vec![KeyCode::ctrl(c).ok_or_else(invalid)?]
    } else {
        base
    };

    if meta {
        out.push(KEY_ESC);
    }
    out.extend(base);
    Ok(())
}

fn parse_named(name: &str) -> Option<KeyCode> {
    if let Some((_, code)) = NAMED_KEYS.iter().find(|(n, _)| *n == name) {
        return Some(*code);
    }
    let n: u8 = name.strip_prefix('f')?.parse().ok()?;
    (1..=24).contains(&n).then(|| KeyCode::function(n))
}
