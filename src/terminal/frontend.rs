use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};

use crate::core::error::Result;
use crate::core::frontend::{Frame, Frontend, ReadMode};
use crate::core::key::KeyCode;
use crate::terminal::display::Display;
use crate::terminal::events::event_to_keys;

/// Live terminal frontend. Expects raw mode to be active.
pub struct TerminalFrontend {
    /// Codes decoded from an event but not yet handed out
    pending: VecDeque<KeyCode>,
    display: Display,
    stdout: Stdout,
}

impl TerminalFrontend {
    pub fn new(tab_width: usize) -> io::Result<Self> {
        Ok(Self {
            pending: VecDeque::new(),
            display: Display::new_terminal(tab_width)?,
            stdout: io::stdout(),
        })
    }

    fn take_event(&mut self) -> io::Result<()> {
        let ev = event::read()?;
        if let Event::Resize(cols, rows) = ev {
            self.display.update_size(cols, rows);
        }
        self.pending.extend(event_to_keys(ev));
        Ok(())
    }
}

impl Frontend for TerminalFrontend {
    fn read_key(&mut self, mode: ReadMode) -> Result<Option<KeyCode>> {
        match mode {
            ReadMode::Blocking => {
                while self.pending.is_empty() {
                    self.take_event()?;
                }
            }
            ReadMode::Poll => {
                while self.pending.is_empty() && event::poll(Duration::ZERO)? {
                    self.take_event()?;
                }
            }
        }
        Ok(self.pending.pop_front())
    }

    fn wait_input(&mut self, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        while self.pending.is_empty() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                return Ok(false);
            }
            self.take_event()?;
        }
        Ok(true)
    }

    fn redisplay(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.display.render(frame, &mut self.stdout)?;
        Ok(())
    }
}
