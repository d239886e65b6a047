//! Relay access password

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Factory password of the relay unit
pub const DEFAULT_PASSWORD: &str = "1234";

/// Number of digits in a relay password
pub const PASSWORD_LEN: usize = 4;

/// 4-digit relay password, prefixed to every command
///
/// Always holds exactly four ASCII digits.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Password(String);

impl Password {
    /// Validate and wrap a password
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidPassword)
        }
    }

    /// Password digits as text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid(value: &str) -> bool {
    value.len() == PASSWORD_LEN && value.bytes().all(|b| b.is_ascii_digit())
}

impl Default for Password {
    fn default() -> Self {
        Self(DEFAULT_PASSWORD.to_string())
    }
}

impl FromStr for Password {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Password {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.0
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Keep the digits out of logs.
impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(****)")
    }
}
