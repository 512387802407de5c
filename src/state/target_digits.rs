//! Digit buffer for entering a countdown duration

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::utils::format::{digits_to_display, digits_to_seconds, MAX_DIGITS};

/// Digits of an `HHMMSS` duration, entered right to left
///
/// Holds at most six digits and never starts with a zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct TargetDigits {
    digits: Vec<u8>,
}

impl TargetDigits {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a digit, returning false if it was rejected
    ///
    /// Rejects non-digits, a seventh digit and a zero as the first digit.
    pub fn push(&mut self, digit: u8) -> bool {
        if digit > 9 || self.digits.len() >= MAX_DIGITS {
            return false;
        }
        if digit == 0 && self.digits.is_empty() {
            return false;
        }

        self.digits.push(digit);
        true
    }

    /// Remove the last entered digit
    pub fn pop(&mut self) -> Option<u8> {
        self.digits.pop()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.digits
    }

    /// Total number of seconds the digits stand for
    pub fn to_seconds(&self) -> u64 {
        digits_to_seconds(&self.digits)
    }

    /// `"HHh MMm SSs"` rendering of the buffer
    pub fn display(&self) -> String {
        digits_to_display(&self.digits)
    }
}

/// Error returned when a digit string cannot be entered
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDigitsError {
    #[error("'{0}' is not a digit")]
    NotADigit(char),
    #[error("at most {} digits can be entered", MAX_DIGITS)]
    TooLong,
}

impl FromStr for TargetDigits {
    type Err = ParseDigitsError;

    /// Enter every character of `s` as if typed on the keypad
    ///
    /// Leading zeros are skipped the same way the keypad skips them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut target = TargetDigits::new();
        for c in s.trim().chars() {
            let digit = c.to_digit(10).ok_or(ParseDigitsError::NotADigit(c))? as u8;
            if !target.push(digit) && !(digit == 0 && target.is_empty()) {
                return Err(ParseDigitsError::TooLong);
            }
        }
        Ok(target)
    }
}

impl TryFrom<Vec<u8>> for TargetDigits {
    type Error = ParseDigitsError;

    fn try_from(digits: Vec<u8>) -> Result<Self, Self::Error> {
        let mut target = TargetDigits::new();
        for digit in digits {
            if digit > 9 {
                return Err(ParseDigitsError::NotADigit(char::from(digit)));
            }
            if !target.push(digit) && !(digit == 0 && target.is_empty()) {
                return Err(ParseDigitsError::TooLong);
            }
        }
        Ok(target)
    }
}

impl From<TargetDigits> for Vec<u8> {
    fn from(target: TargetDigits) -> Self {
        target.digits
    }
}

impl fmt::Display for TargetDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}
