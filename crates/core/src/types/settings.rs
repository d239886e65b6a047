//! Relay unit settings

use super::Password;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// User-configured relay unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelaySettings {
    /// Phone number of the relay's SIM card (SMS/call destination)
    pub unit_number: String,

    /// Optional display label
    pub unit_name: String,

    /// Password currently configured on the relay
    pub password: Password,

    /// Number registered as admin on the relay
    pub admin_number: String,

    /// Stored password was not 4 digits. `password` holds the default until
    /// a new one is saved.
    #[serde(skip)]
    pub password_invalid: bool,
}

impl RelaySettings {
    /// Create settings for a unit with the factory password
    pub fn new(unit_number: impl Into<String>) -> Self {
        Self {
            unit_number: unit_number.into(),
            ..Default::default()
        }
    }

    /// Set display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.unit_name = name.into();
        self
    }

    /// Set password
    pub fn with_password(mut self, password: Password) -> Self {
        self.password = password;
        self.password_invalid = false;
        self
    }

    /// Password to prefix commands with
    ///
    /// # Errors
    /// `InvalidPassword` while the stored password is unusable.
    pub fn checked_password(&self) -> Result<&Password, ValidationError> {
        if self.password_invalid {
            Err(ValidationError::InvalidPassword)
        } else {
            Ok(&self.password)
        }
    }

    /// Whether a destination number is configured
    pub fn has_unit_number(&self) -> bool {
        !self.unit_number.trim().is_empty()
    }

    /// Unit name, falling back to the unit number
    pub fn display_name(&self) -> &str {
        if self.unit_name.trim().is_empty() {
            &self.unit_number
        } else {
            &self.unit_name
        }
    }
}
