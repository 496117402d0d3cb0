//! One-time password entry
//!
//! The code is typed into one box per digit. Filling a box moves focus to the
//! next one, clearing a box moves focus back, and pasting a full code fills
//! every box at once.

use serde::{Deserialize, Serialize};

/// Default number of digits in a verification code
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Per-digit OTP input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpCode {
    digits: Vec<Option<char>>,
    focus: usize,
}

impl Default for OtpCode {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl OtpCode {
    /// Empty code with `length` boxes (at least one)
    pub fn new(length: usize) -> Self {
        Self {
            digits: vec![None; length.max(1)],
            focus: 0,
        }
    }

    /// Number of boxes
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Whether no box is filled
    pub fn is_empty(&self) -> bool {
        self.digits.iter().all(Option::is_none)
    }

    /// Index of the focused box
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Move focus to `index` (clamped)
    pub fn set_focus(&mut self, index: usize) {
        self.focus = index.min(self.digits.len() - 1);
    }

    /// Digit in box `index`, if filled
    pub fn digit(&self, index: usize) -> Option<char> {
        self.digits.get(index).copied().flatten()
    }

    /// Update box `index` with the text typed into it
    ///
    /// Non-digits are dropped first. A single digit fills the box and focus
    /// advances; an empty value clears the box and focus retreats. A value
    /// with as many digits as the code replaces the whole code, and any other
    /// run of digits fills the boxes from `index` onwards.
    pub fn input(&mut self, index: usize, value: &str) {
        if index >= self.digits.len() {
            return;
        }

        let typed: Vec<char> = value.chars().filter(char::is_ascii_digit).collect();
        match typed.len() {
            0 if value.is_empty() => self.clear(index),
            0 => {}
            1 => {
                self.digits[index] = Some(typed[0]);
                self.set_focus(index + 1);
            }
            _ if typed.len() == self.digits.len() => self.paste(value),
            _ => {
                for (offset, c) in typed.into_iter().enumerate() {
                    let Some(slot) = self.digits.get_mut(index + offset) else {
                        break;
                    };
                    *slot = Some(c);
                    self.focus = (index + offset + 1).min(self.digits.len() - 1);
                }
            }
        }
    }

    /// Clear box `index` and move focus to the previous box
    pub fn clear(&mut self, index: usize) {
        if let Some(slot) = self.digits.get_mut(index) {
            *slot = None;
            self.focus = index.saturating_sub(1);
        }
    }

    /// Replace the whole code with the digits of `value`
    pub fn paste(&mut self, value: &str) {
        let len = self.digits.len();
        let mut typed = value.chars().filter(char::is_ascii_digit);
        for slot in self.digits.iter_mut() {
            *slot = typed.next();
        }
        self.focus = self
            .digits
            .iter()
            .position(Option::is_none)
            .unwrap_or(len - 1);
    }

    /// Empty every box
    pub fn reset(&mut self) {
        self.digits.iter_mut().for_each(|slot| *slot = None);
        self.focus = 0;
    }

    /// Whether every box is filled
    pub fn is_complete(&self) -> bool {
        self.digits.iter().all(Option::is_some)
    }

    /// Digits typed so far, in order, skipping empty boxes
    pub fn code(&self) -> String {
        self.digits.iter().flatten().collect()
    }

    /// The full code, only when complete
    pub fn complete_code(&self) -> Option<String> {
        self.is_complete().then(|| self.code())
    }
}
