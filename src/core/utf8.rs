use unicode_segmentation::UnicodeSegmentation;

use crate::core::key::KeyCode;

/// How a run of raw high bytes (`0x80..=0xFF`) reads as UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawBytes {
    /// Not made only of high bytes; the fallback does not apply.
    NotRaw,
    /// A valid prefix of a multi-byte encoding; wait for more bytes.
    Incomplete,
    /// Exactly one grapheme cluster.
    Grapheme(String),
    /// Bytes that can never become valid UTF-8, or decode to more than one
    /// grapheme.
    Invalid,
}

/// Classify an otherwise undefined key sequence made of raw terminal bytes.
///
/// Terminals in raw mode deliver a non-ASCII character as its UTF-8 byte
/// sequence. No keymap binds those bytes, so the dispatch loop asks this
/// function whether the pending keys form one character it can self-insert.
pub fn classify_raw_bytes(keys: &[KeyCode]) -> RawBytes {
    if keys.is_empty() || !keys.iter().all(|k| (0x80..=0xff).contains(&k.0)) {
        return RawBytes::NotRaw;
    }
    let bytes: Vec<u8> = keys.iter().map(|k| k.0 as u8).collect();
    match std::str::from_utf8(&bytes) {
        Ok(text) if grapheme_count(text) == 1 => RawBytes::Grapheme(text.to_string()),
        Ok(_) => RawBytes::Invalid,
        Err(err) if err.error_len().is_none() && err.valid_up_to() == 0 => RawBytes::Incomplete,
        Err(_) => RawBytes::Invalid,
    }
}

/// Text typed by a key sequence, if every key is a byte and the bytes are
/// valid UTF-8. Synthetic keys have no text.
pub fn keys_to_text(keys: &[KeyCode]) -> Option<String> {
    if !keys.iter().all(|k| k.is_byte()) {
        return None;
    }
    let bytes: Vec<u8> = keys.iter().map(|k| k.0 as u8).collect();
    String::from_utf8(bytes).ok()
}

/// Helper to count grapheme clusters in a string
pub fn grapheme_count(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Get the display width of a single character (for monospace terminal display)
/// Returns 0 for control characters, 1 for ASCII, 2 for wide CJK characters, etc.
pub fn char_width(c: char) -> usize {
    unicode_width::UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Visual width of `text`, expanding tabs to `tab_width` stops.
pub fn visual_width(text: &str, tab_width: usize) -> usize {
    let mut visual_x = 0;
    for grapheme in text.graphemes(true) {
        if grapheme == "\t" {
            visual_x = (visual_x / tab_width + 1) * tab_width;
        } else {
            visual_x += grapheme.chars().map(char_width).sum::<usize>();
        }
    }
    visual_x
}
