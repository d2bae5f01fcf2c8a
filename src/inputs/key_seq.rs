use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};

/// Short multi-key sequences such as `gg`, forgotten after a timeout.
#[derive(Debug)]
pub struct KeySeq {
    keys: Vec<KeyCode>,
    last_key_time: Instant,
    timeout: Duration,
}

impl Default for KeySeq {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySeq {
    const MAX_LEN: usize = 2;

    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(1))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            keys: Vec::new(),
            last_key_time: Instant::now(),
            timeout,
        }
    }

    /// Record a key press; only the most recent keys are kept
    pub fn push(&mut self, key: KeyEvent) {
        if self.is_expired() {
            self.keys.clear();
        }
        if self.keys.len() == Self::MAX_LEN {
            self.keys.remove(0);
        }
        self.keys.push(key.code);
        self.last_key_time = Instant::now();
    }

    /// Check if the sequence matches a pattern exactly
    pub fn matches(&self, pattern: &[KeyCode]) -> bool {
        !self.is_expired() && self.keys.as_slice() == pattern
    }

    pub fn len(&self) -> usize {
        if self.is_expired() { 0 } else { self.keys.len() }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_expired(&self) -> bool {
        self.keys.is_empty() || self.last_key_time.elapsed() > self.timeout
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn matches_exact_sequence() {
        let mut seq = KeySeq::new();
        seq.push(key('g'));
        assert!(!seq.matches(&[KeyCode::Char('g'), KeyCode::Char('g')]));
        seq.push(key('g'));
        assert!(seq.matches(&[KeyCode::Char('g'), KeyCode::Char('g')]));
        assert!(!seq.matches(&[KeyCode::Char('g')]));
    }

    #[test]
    fn keeps_only_recent_keys() {
        let mut seq = KeySeq::new();
        seq.push(key('j'));
        seq.push(key('g'));
        seq.push(key('g'));
        assert_eq!(seq.len(), 2);
        assert!(seq.matches(&[KeyCode::Char('g'), KeyCode::Char('g')]));
    }

    #[test]
    fn clear_works() {
        let mut seq = KeySeq::new();
        seq.push(key('g'));
        assert_eq!(seq.len(), 1);
        seq.clear();
        assert!(seq.is_empty());
    }

    #[test]
    fn timeout_clears_sequence() {
        let mut seq = KeySeq::with_timeout(Duration::from_millis(10));
        seq.push(key('g'));
        std::thread::sleep(Duration::from_millis(20));
        assert!(seq.is_expired());
        assert_eq!(seq.len(), 0);

        seq.push(key('g'));
        assert!(seq.matches(&[KeyCode::Char('g')]));
    }
}
