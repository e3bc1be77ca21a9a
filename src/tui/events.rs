use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use std::collections::VecDeque;
use std::time::Duration;

/// Where terminal events come from; swapped out in tests
pub trait EventSource {
    /// Whether an event is ready within `timeout`
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    fn read(&mut self) -> Result<Event>;
}

/// Events from the real terminal
pub struct KeyboardEventSource;

impl EventSource for KeyboardEventSource {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        Ok(crossterm::event::poll(timeout)?)
    }

    fn read(&mut self) -> Result<Event> {
        Ok(crossterm::event::read()?)
    }
}

/// Scripted events for driving the host loop in tests.
///
/// An idle step makes one `poll` report nothing, which gives the host a
/// frame to run background tasks. Once the script is exhausted every read
/// returns `q`.
#[derive(Default)]
pub struct SimulatedEventSource {
    script: VecDeque<Option<Event>>,
}

impl SimulatedEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, code: KeyCode, modifiers: KeyModifiers) -> Self {
        self.script
            .push_back(Some(Self::key_event(code, modifiers)));
        self
    }

    pub fn char(self, c: char) -> Self {
        self.key(KeyCode::Char(c), KeyModifiers::NONE)
    }

    pub fn ctrl(self, code: KeyCode) -> Self {
        self.key(code, KeyModifiers::CONTROL)
    }

    /// Report no input for `frames` polls
    pub fn idle(mut self, frames: usize) -> Self {
        self.script.extend(std::iter::repeat_n(None, frames));
        self
    }

    pub fn key_event(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        })
    }
}

impl EventSource for SimulatedEventSource {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        match self.script.front() {
            Some(None) => {
                self.script.pop_front();
                Ok(false)
            }
            _ => Ok(true),
        }
    }

    fn read(&mut self) -> Result<Event> {
        match self.script.pop_front() {
            Some(Some(event)) => Ok(event),
            _ => Ok(Self::key_event(KeyCode::Char('q'), KeyModifiers::NONE)),
        }
    }
}
