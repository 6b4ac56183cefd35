//! Keyboard macro recording and playback state.
//!
//! Recording captures raw key codes from the live key source. Playback is a
//! stack of cursors over fixed sequences; while any player is active, keys
//! come from the innermost one and nothing is recorded.

use std::rc::Rc;

use crate::core::error::{EditorError, Result};
use crate::core::key::KeyCode;

/// Cursor over a macro being replayed.
#[derive(Debug, Clone)]
pub struct MacroPlayer {
    keys: Rc<[KeyCode]>,
    pos: usize,
}

impl MacroPlayer {
    pub fn new(keys: Rc<[KeyCode]>) -> Self {
        Self { keys, pos: 0 }
    }

    /// Next key, or `None` once the macro is exhausted.
    pub fn next_key(&mut self) -> Option<KeyCode> {
        let key = self.keys.get(self.pos).copied();
        if key.is_some() {
            self.pos += 1;
        }
        key
    }

    pub fn has_remaining(&self) -> bool {
        self.pos < self.keys.len()
    }
}

#[derive(Debug, Default)]
pub struct KeyboardMacros {
    recording: Option<Vec<KeyCode>>,
    last: Option<Rc<[KeyCode]>>,
    players: Vec<MacroPlayer>,
}

impl KeyboardMacros {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_recording(&mut self) -> Result<()> {
        if self.recording.is_some() {
            return Err(EditorError::AlreadyRecording);
        }
        self.recording = Some(Vec::new());
        Ok(())
    }

    /// Finish recording. `consumed` is the number of trailing keys that
    /// invoked the stop command; they are not part of the macro.
    pub fn stop_recording(&mut self, consumed: usize) -> Result<Rc<[KeyCode]>> {
        let mut keys = self.recording.take().ok_or(EditorError::NotRecording)?;
        keys.truncate(keys.len().saturating_sub(consumed));
        if keys.is_empty() {
            return Err(EditorError::EmptyMacro);
        }
        let keys: Rc<[KeyCode]> = keys.into();
        self.last = Some(Rc::clone(&keys));
        Ok(keys)
    }

    /// Drop an in-progress recording without saving it.
    pub fn cancel_recording(&mut self) {
        self.recording = None;
    }

    /// Append a live key to the recording, if one is in progress.
    pub fn record(&mut self, key: KeyCode) {
        if let Some(keys) = self.recording.as_mut() {
            keys.push(key);
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    pub fn recorded(&self) -> Option<&[KeyCode]> {
        self.recording.as_deref()
    }

    pub fn last_macro(&self) -> Option<Rc<[KeyCode]>> {
        self.last.clone()
    }

    pub fn push_player(&mut self, keys: Rc<[KeyCode]>) {
        self.players.push(MacroPlayer::new(keys));
    }

    pub fn pop_player(&mut self) {
        self.players.pop();
    }

    pub fn is_executing(&self) -> bool {
        !self.players.is_empty()
    }

    pub fn playback_depth(&self) -> usize {
        self.players.len()
    }

    /// Next key from the innermost player. `None` if that player is
    /// exhausted or nothing is playing.
    pub fn next_played_key(&mut self) -> Option<KeyCode> {
        self.players.last_mut().and_then(MacroPlayer::next_key)
    }

    /// Whether the innermost player still has keys.
    pub fn has_pending_played_key(&self) -> bool {
        self.players.last().is_some_and(MacroPlayer::has_remaining)
    }
}
