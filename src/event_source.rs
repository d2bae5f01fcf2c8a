//! Where the shell's input comes from: the terminal, or a scripted list of
//! steps in tests.

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;
pub use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

pub trait EventSource {
    /// Whether an event can be read without blocking
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    /// Next event; blocks until one arrives
    fn read(&mut self) -> Result<Event>;
}

/// Keyboard, resize and bracketed-paste events from crossterm.
pub struct KeyboardEventSource;

impl EventSource for KeyboardEventSource {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        Ok(crossterm::event::poll(timeout)?)
    }

    fn read(&mut self) -> Result<Event> {
        Ok(crossterm::event::read()?)
    }
}

/// One step of a scripted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Input(Event),
    /// The user pauses: nothing is pending, so the shell redraws.
    Idle,
}

/// Replays a script. `poll` reports an `Idle` step as "nothing pending",
/// which is what makes the event loop draw a frame mid-script.
pub struct SimulatedEventSource {
    pub(crate) steps: VecDeque<ScriptStep>,
}

impl SimulatedEventSource {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    pub fn from_events(events: Vec<Event>) -> Self {
        Self::new(events.into_iter().map(ScriptStep::Input))
    }

    pub fn key_event(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    pub fn char_key(c: char) -> Event {
        Self::key_event(KeyCode::Char(c), KeyModifiers::empty())
    }

    pub fn ctrl_char_key(c: char) -> Event {
        Self::key_event(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Bracketed paste, which is how terminals deliver a dropped file
    pub fn paste(text: &str) -> Event {
        Event::Paste(text.to_string())
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl EventSource for SimulatedEventSource {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        match self.steps.front() {
            Some(ScriptStep::Input(_)) => Ok(true),
            Some(ScriptStep::Idle) => {
                self.steps.pop_front();
                Ok(false)
            }
            None => Ok(false),
        }
    }

    fn read(&mut self) -> Result<Event> {
        while let Some(step) = self.steps.pop_front() {
            if let ScriptStep::Input(event) = step {
                return Ok(event);
            }
        }
        // A finished script quits rather than blocking forever
        Ok(Self::char_key('q'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_step_reports_nothing_pending_once() {
        let mut source = SimulatedEventSource::new([
            ScriptStep::Input(SimulatedEventSource::char_key('j')),
            ScriptStep::Idle,
            ScriptStep::Input(SimulatedEventSource::paste("/tmp/a.pdf")),
        ]);

        assert!(source.poll(Duration::ZERO).unwrap());
        assert_eq!(source.read().unwrap(), SimulatedEventSource::char_key('j'));

        assert!(!source.poll(Duration::ZERO).unwrap());
        assert!(source.poll(Duration::ZERO).unwrap());
        assert_eq!(source.read().unwrap(), Event::Paste("/tmp/a.pdf".to_string()));
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn test_read_skips_idle_steps() {
        let mut source = SimulatedEventSource::new([
            ScriptStep::Idle,
            ScriptStep::Input(SimulatedEventSource::ctrl_char_key('b')),
        ]);

        match source.read().unwrap() {
            Event::Key(key) => {
                assert_eq!(key.code, KeyCode::Char('b'));
                assert!(key.modifiers.contains(KeyModifiers::CONTROL));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_finished_script_quits() {
        let mut source = SimulatedEventSource::from_events(Vec::new());
        assert!(!source.poll(Duration::ZERO).unwrap());
        assert_eq!(source.read().unwrap(), SimulatedEventSource::char_key('q'));
    }
}
