//! The engine's view of the outside world: a key source plus a redisplay
//! target.
//!
//! [`ScriptedFrontend`] replays a fixed key queue without ever sleeping. Tests
//! and headless `--keys` runs use it; it keeps a shared [`Script`] handle so
//! the caller can inspect what the loop did after handing the frontend over.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crate::core::buffer::Buffer;
use crate::core::error::Result;
use crate::core::key::{KeyCode, kbd};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Wait until a key arrives. `None` means the source is exhausted.
    Blocking,
    /// Return a key only if one is already pending.
    Poll,
}

/// Snapshot handed to the frontend once per loop iteration.
pub struct Frame<'a> {
    pub buffer: &'a Buffer,
    pub echo: Option<&'a str>,
    pub recursive_edit_level: usize,
    pub recording_macro: bool,
}

pub trait Frontend {
    fn read_key(&mut self, mode: ReadMode) -> Result<Option<KeyCode>>;

    /// Wait up to `timeout` for input. Returns whether a key is pending.
    fn wait_input(&mut self, timeout: Duration) -> Result<bool>;

    fn redisplay(&mut self, frame: &Frame<'_>) -> Result<()>;
}

#[derive(Debug, Default)]
struct ScriptState {
    keys: VecDeque<KeyCode>,
    redisplays: usize,
    waits: Vec<Duration>,
    last_echo: Option<String>,
    last_text: String,
    fail_when_empty: bool,
}

/// Shared handle on a scripted key queue.
#[derive(Debug, Clone, Default)]
pub struct Script {
    state: Rc<RefCell<ScriptState>>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys(keys: impl IntoIterator<Item = KeyCode>) -> Self {
        let script = Self::new();
        script.push_keys(keys);
        script
    }

    /// Script typed as a key description, e.g. `"C-x ( a b C-x )"`. A blank
    /// description gives a script with no keys.
    pub fn from_desc(desc: &str) -> Result<Self> {
        if desc.trim().is_empty() {
            return Ok(Self::new());
        }
        Ok(Self::from_keys(kbd(desc)?))
    }

    pub fn push_keys(&self, keys: impl IntoIterator<Item = KeyCode>) {
        self.state.borrow_mut().keys.extend(keys);
    }

    /// Make reads fail with an I/O error once the queue runs dry, instead of
    /// reporting end of input.
    pub fn fail_when_empty(&self) {
        self.state.borrow_mut().fail_when_empty = true;
    }

    pub fn pending_keys(&self) -> usize {
        self.state.borrow().keys.len()
    }

    pub fn redisplay_count(&self) -> usize {
        self.state.borrow().redisplays
    }

    /// Every timeout passed to `wait_input`, in order.
    pub fn waits(&self) -> Vec<Duration> {
        self.state.borrow().waits.clone()
    }

    /// Echo text at the most recent redisplay.
    pub fn last_echo(&self) -> Option<String> {
        self.state.borrow().last_echo.clone()
    }

    /// Buffer text at the most recent redisplay.
    pub fn last_text(&self) -> String {
        self.state.borrow().last_text.clone()
    }

    pub fn frontend(&self) -> ScriptedFrontend {
        ScriptedFrontend {
            state: Rc::clone(&self.state),
        }
    }
}

pub struct ScriptedFrontend {
    state: Rc<RefCell<ScriptState>>,
}

impl Frontend for ScriptedFrontend {
    fn read_key(&mut self, mode: ReadMode) -> Result<Option<KeyCode>> {
        let mut state = self.state.borrow_mut();
        match state.keys.pop_front() {
            Some(key) => Ok(Some(key)),
            None if mode == ReadMode::Blocking && state.fail_when_empty => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "scripted key source closed",
            )
            .into()),
            None => Ok(None),
        }
    }

    fn wait_input(&mut self, timeout: Duration) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        state.waits.push(timeout);
        Ok(!state.keys.is_empty())
    }

    fn redisplay(&mut self, frame: &Frame<'_>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.redisplays += 1;
        state.last_echo = frame.echo.map(str::to_string);
        state.last_text = frame.buffer.text();
        Ok(())
    }
}
