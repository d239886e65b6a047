//! Relay operations

use super::{Password, SerialNumber};
use crate::error::ValidationError;
use crate::protocol::encoder::FIELD_END;
use crate::protocol::CommandEncoder;
use serde::{Deserialize, Serialize};

/// One relay operation with validated parameters
///
/// Built once per user action, encoded, handed to a dispatcher, then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelayCommand {
    /// Bare password
    Activate,
    MomentaryActivate,
    Toggle,
    CheckStatus,
    RegisterAdmin { admin_number: String },
    ChangePassword { new_password: Password },
    AddUser { serial: SerialNumber, phone_number: String },
    DeleteUser { serial: SerialNumber },
    DeleteAllUsers,
}

impl RelayCommand {
    /// Register `admin_number` as the relay's admin
    pub fn register_admin(admin_number: &str) -> Result<Self, ValidationError> {
        Ok(Self::RegisterAdmin {
            admin_number: phone_field(admin_number, ValidationError::MissingAdminNumber)?,
        })
    }

    /// Change the relay password to `new_password`
    pub fn change_password(new_password: &str) -> Result<Self, ValidationError> {
        Ok(Self::ChangePassword {
            new_password: Password::new(new_password)?,
        })
    }

    /// Store `phone_number` in slot `serial`
    pub fn add_user(serial: &str, phone_number: &str) -> Result<Self, ValidationError> {
        let serial = SerialNumber::parse(serial)?;
        Ok(Self::AddUser {
            serial,
            phone_number: phone_field(phone_number, ValidationError::MissingPhoneNumber)?,
        })
    }

    /// Clear slot `serial`
    pub fn delete_user(serial: &str) -> Result<Self, ValidationError> {
        Ok(Self::DeleteUser {
            serial: SerialNumber::parse(serial)?,
        })
    }

    /// SMS text for this command
    pub fn encode(&self, password: &Password) -> String {
        CommandEncoder::encode(self, password)
    }

    /// Stable operation name
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::MomentaryActivate => "momentary_activate",
            Self::Toggle => "toggle",
            Self::CheckStatus => "check_status",
            Self::RegisterAdmin { .. } => "register_admin",
            Self::ChangePassword { .. } => "change_password",
            Self::AddUser { .. } => "add_user",
            Self::DeleteUser { .. } => "delete_user",
            Self::DeleteAllUsers => "delete_all_users",
        }
    }

    /// Irreversible on the relay; front ends confirm before sending
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::DeleteAllUsers)
    }
}

/// Trimmed phone number for a `#`-terminated field
fn phone_field(raw: &str, missing: ValidationError) -> Result<String, ValidationError> {
    let phone = raw.trim();
    if phone.is_empty() {
        return Err(missing);
    }
    if phone.contains(FIELD_END) {
        return Err(ValidationError::InvalidPhoneNumber(phone.to_string()));
    }
    Ok(phone.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_user_trims_phone() {
        let cmd = RelayCommand::add_user("003", "  0412345678 ").unwrap();
        assert_eq!(
            cmd,
            RelayCommand::AddUser {
                serial: SerialNumber::from_index(3).unwrap(),
                phone_number: "0412345678".to_string(),
            }
        );
    }

    #[test]
    fn test_serial_checked_before_phone() {
        assert!(matches!(
            RelayCommand::add_user("abc", ""),
            Err(ValidationError::InvalidSerialFormat(_))
        ));
    }

    #[test]
    fn test_phone_with_field_separator_rejected() {
        assert_eq!(
            RelayCommand::add_user("001", "04#5"),
            Err(ValidationError::InvalidPhoneNumber("04#5".to_string()))
        );
        assert_eq!(
            RelayCommand::register_admin(" 0400#1 "),
            Err(ValidationError::InvalidPhoneNumber("0400#1".to_string()))
        );
        assert_eq!(
            RelayCommand::register_admin("   "),
            Err(ValidationError::MissingAdminNumber)
        );
    }

    #[test]
    fn test_encode_uses_given_password() {
        let pwd = Password::new("1111").unwrap();
        assert_eq!(RelayCommand::Toggle.encode(&pwd), "1111DD");
        assert_eq!(RelayCommand::delete_user("150").unwrap().encode(&pwd), "1111A150##");
    }

    #[test]
    fn test_kind_and_destructive() {
        assert_eq!(RelayCommand::DeleteAllUsers.kind(), "delete_all_users");
        assert!(RelayCommand::DeleteAllUsers.is_destructive());
        assert!(!RelayCommand::delete_user("001").unwrap().is_destructive());
    }

    #[test]
    fn test_serialization() {
        let cmd = RelayCommand::add_user("042", "0400000000").unwrap();
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"kind":"add_user","serial":"042","phone_number":"0400000000"}"#);
        let back: RelayCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }
}
