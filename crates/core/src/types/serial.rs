//! Authorized-user slot numbers
//!
//! The relay keeps its own table of authorized callers. Commands address an
//! entry by a 3-digit slot ("001" to "200").

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest slot in the relay's user table
pub const MIN_SLOT: u16 = 1;

/// Highest slot in the relay's user table
pub const MAX_SLOT: u16 = 200;

const SERIAL_DIGITS: usize = 3;

/// Validated slot index, rendered as three zero-padded digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerialNumber(u8);

impl SerialNumber {
    /// Parse strict slot text: exactly three ASCII digits, 001 to 200
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        if text.len() != SERIAL_DIGITS || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidSerialFormat(text.to_string()));
        }
        let value: u16 = text
            .parse()
            .map_err(|_| ValidationError::InvalidSerialFormat(text.to_string()))?;
        Self::from_index(value)
    }

    /// Build from a numeric slot index
    pub fn from_index(index: u16) -> Result<Self, ValidationError> {
        if !(MIN_SLOT..=MAX_SLOT).contains(&index) {
            return Err(ValidationError::SerialOutOfRange(index));
        }
        Ok(Self(index as u8))
    }

    /// Numeric slot index
    pub fn index(self) -> u16 {
        u16::from(self.0)
    }

    /// Clean up free-form keypad input the way the serial field does:
    /// drop non-digits, keep the first three, left-pad with zeros.
    ///
    /// The result still has to go through [`SerialNumber::parse`].
    pub fn normalize_input(raw: &str) -> String {
        let digits: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit())
            .take(SERIAL_DIGITS)
            .collect();
        format!("{:0>width$}", digits, width = SERIAL_DIGITS)
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl FromStr for SerialNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SerialNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SerialNumber> for String {
    fn from(serial: SerialNumber) -> Self {
        serial.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_accepted() {
        assert_eq!(SerialNumber::parse("001").unwrap().index(), 1);
        assert_eq!(SerialNumber::parse("200").unwrap().index(), 200);
        assert_eq!(SerialNumber::parse("099").unwrap().to_string(), "099");
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(
            SerialNumber::parse("000"),
            Err(ValidationError::SerialOutOfRange(0))
        );
        assert_eq!(
            SerialNumber::parse("201"),
            Err(ValidationError::SerialOutOfRange(201))
        );
        assert_eq!(
            SerialNumber::parse("999"),
            Err(ValidationError::SerialOutOfRange(999))
        );
    }

    #[test]
    fn test_bad_format_rejected() {
        for bad in ["12", "12a", "", "0001", "1 2", "-01", "+12"] {
            assert!(
                matches!(SerialNumber::parse(bad), Err(ValidationError::InvalidSerialFormat(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(SerialNumber::from_index(1).unwrap().to_string(), "001");
        assert_eq!(SerialNumber::from_index(42).unwrap().to_string(), "042");
        assert_eq!(SerialNumber::from_index(200).unwrap().to_string(), "200");
    }

    #[test]
    fn test_from_index_range() {
        assert!(SerialNumber::from_index(0).is_err());
        assert!(SerialNumber::from_index(201).is_err());
    }

    #[test]
    fn test_normalize_input() {
        assert_eq!(SerialNumber::normalize_input("1"), "001");
        assert_eq!(SerialNumber::normalize_input("12"), "012");
        assert_eq!(SerialNumber::normalize_input("1a2"), "012");
        assert_eq!(SerialNumber::normalize_input("12345"), "123");
        assert_eq!(SerialNumber::normalize_input(""), "000");
    }
}
