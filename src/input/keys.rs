use crate::error::Result;
use crate::sys;
use std::collections::VecDeque;

/// Trait for non-blocking single-key input.
///
/// Mode loops poll this once per frame; `Ok(None)` means no key was pressed.
pub trait KeySource: Send {
    fn poll_key(&mut self) -> Result<Option<char>>;
}

/// Key source reading the controlling terminal.
///
/// Raw mode is entered per poll and restored immediately, so the terminal is
/// back in canonical mode whenever the menu prompt reads a line.
#[derive(Debug, Default)]
pub struct TerminalKeySource;

impl TerminalKeySource {
    pub fn new() -> Self {
        Self
    }
}

impl KeySource for TerminalKeySource {
    fn poll_key(&mut self) -> Result<Option<char>> {
        let _guard = sys::enter_raw_mode()?;
        Ok(sys::read_key_nonblocking())
    }
}

/// Mock key source for testing.
///
/// Serves a script of poll results; once exhausted it repeats the last
/// scripted entry, so a trailing `Some('q')` always ends a mode loop.
#[derive(Debug, Clone, Default)]
pub struct MockKeySource {
    script: VecDeque<Option<char>>,
    last: Option<char>,
    polls: usize,
}

impl MockKeySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next poll returns no key.
    pub fn with_no_key(mut self) -> Self {
        self.script.push_back(None);
        self
    }

    /// The next poll returns this key.
    pub fn with_key(mut self, key: char) -> Self {
        self.script.push_back(Some(key));
        self
    }

    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl KeySource for MockKeySource {
    fn poll_key(&mut self) -> Result<Option<char>> {
        self.polls += 1;
        match self.script.pop_front() {
            Some(entry) => {
                self.last = entry;
                Ok(entry)
            }
            None => Ok(self.last),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_is_served_then_last_entry_repeats() {
        let mut keys = MockKeySource::new().with_no_key().with_key('n').with_key('q');

        assert_eq!(keys.poll_key().unwrap(), None);
        assert_eq!(keys.poll_key().unwrap(), Some('n'));
        assert_eq!(keys.poll_key().unwrap(), Some('q'));
        assert_eq!(keys.poll_key().unwrap(), Some('q'));
        assert_eq!(keys.polls(), 4);
    }

    #[test]
    fn empty_script_reads_no_keys() {
        let mut keys = MockKeySource::new();
        assert_eq!(keys.poll_key().unwrap(), None);
        assert_eq!(keys.poll_key().unwrap(), None);
    }
}
