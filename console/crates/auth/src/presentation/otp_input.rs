//! OTP input view-model
//!
//! Fixed number of single-digit slots with a cursor. Only ASCII digits are
//! accepted; paste keeps the digits of the clipboard text and truncates to
//! the slot count.

use crate::application::config::AuthConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpInput {
    slots: Vec<Option<char>>,
    cursor: usize,
}

impl OtpInput {
    /// Input sized to the code length the reset flow verifies against
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.otp_length)
    }

    /// Create an input with `length` slots (at least one)
    pub fn new(length: usize) -> Self {
        Self {
            slots: vec![None; length.max(1)],
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn slots(&self) -> &[Option<char>] {
        &self.slots
    }

    /// Focused slot
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn focus(&mut self, index: usize) {
        self.cursor = index.min(self.last());
    }

    /// Type a character into the focused slot
    ///
    /// Returns `false` and leaves the input untouched for non-digits.
    pub fn enter(&mut self, ch: char) -> bool {
        if !ch.is_ascii_digit() {
            return false;
        }
        self.slots[self.cursor] = Some(ch);
        if self.cursor < self.last() {
            self.cursor += 1;
        }
        true
    }

    /// Erase the focused slot, or step back when it is already empty
    pub fn backspace(&mut self) {
        if self.slots[self.cursor].is_some() {
            self.slots[self.cursor] = None;
        } else if self.cursor > 0 {
            self.cursor -= 1;
            self.slots[self.cursor] = None;
        }
    }

    /// Fill slots from pasted text
    ///
    /// Returns the number of digits taken. Text without digits is ignored.
    pub fn paste(&mut self, text: &str) -> usize {
        let digits: Vec<char> = text
            .chars()
            .filter(char::is_ascii_digit)
            .take(self.len())
            .collect();
        if digits.is_empty() {
            return 0;
        }
        for (slot, digit) in self.slots.iter_mut().zip(&digits) {
            *slot = Some(*digit);
        }
        self.cursor = digits.len().min(self.last());
        digits.len()
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.cursor = 0;
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// The entered code once every slot is filled
    pub fn code(&self) -> Option<String> {
        self.slots.iter().copied().collect()
    }

    fn last(&self) -> usize {
        self.slots.len() - 1
    }
}
