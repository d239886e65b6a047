//! SMS command encoder for the GSM relay text protocol
//!
//! Every command is `{password}{opcode}{fields}`. Fields are terminated by
//! `#`; an empty field between two `#` means "delete" rather than "set"
//! (`A005#0412345678#` stores a number in slot 005, `A005##` clears it).

use crate::error::ValidationError;
use crate::types::{Password, RelayCommand};

/// Momentary activation for the relay's preset latch time
pub const OP_MOMENTARY: &str = "CC";
/// Toggle relay state
pub const OP_TOGGLE: &str = "DD";
/// Status query
pub const OP_STATUS: &str = "EE";
/// Register admin number (slot 00)
pub const OP_REGISTER_ADMIN: &str = "TEL00";
/// Change password
pub const OP_CHANGE_PASSWORD: &str = "P";
/// Set or clear an authorized-user slot
pub const OP_USER: &str = "A";
/// Clear the whole user table
pub const OP_DELETE_ALL_USERS: &str = "AR";
/// Field terminator
pub const FIELD_END: char = '#';

const MASK: &str = "****";

/// Command encoder
///
/// Pure functions: the same inputs always produce the same text.
pub struct CommandEncoder;

impl CommandEncoder {
    /// Encode a validated command with the stored password
    pub fn encode(cmd: &RelayCommand, password: &Password) -> String {
        Self::render(cmd, password.as_str(), false)
    }

    /// Encode with the password and any new password replaced by `****`
    pub fn redacted(cmd: &RelayCommand) -> String {
        Self::render(cmd, MASK, true)
    }

    /// Bare password, no opcode
    pub fn activate(password: &Password) -> String {
        Self::encode(&RelayCommand::Activate, password)
    }

    /// `{password}CC`
    pub fn momentary_activate(password: &Password) -> String {
        Self::encode(&RelayCommand::MomentaryActivate, password)
    }

    /// `{password}DD`
    pub fn toggle_relay(password: &Password) -> String {
        Self::encode(&RelayCommand::Toggle, password)
    }

    /// `{password}EE`
    pub fn check_status(password: &Password) -> String {
        Self::encode(&RelayCommand::CheckStatus, password)
    }

    /// `{password}TEL00{admin}#`
    pub fn register_admin(password: &Password, admin_number: &str) -> Result<String, ValidationError> {
        let cmd = RelayCommand::register_admin(admin_number)?;
        Ok(Self::encode(&cmd, password))
    }

    /// `{old}P{new}`
    pub fn change_password(old: &Password, new_password: &str) -> Result<String, ValidationError> {
        let cmd = RelayCommand::change_password(new_password)?;
        Ok(Self::encode(&cmd, old))
    }

    /// `{password}A{serial}#{phone}#`
    pub fn add_authorized_user(
        password: &Password,
        serial: &str,
        phone_number: &str,
    ) -> Result<String, ValidationError> {
        let cmd = RelayCommand::add_user(serial, phone_number)?;
        Ok(Self::encode(&cmd, password))
    }

    /// `{password}A{serial}##`
    pub fn delete_authorized_user(password: &Password, serial: &str) -> Result<String, ValidationError> {
        let cmd = RelayCommand::delete_user(serial)?;
        Ok(Self::encode(&cmd, password))
    }

    /// `{password}AR#`
    pub fn delete_all_users(password: &Password) -> String {
        Self::encode(&RelayCommand::DeleteAllUsers, password)
    }

    fn render(cmd: &RelayCommand, prefix: &str, mask_payload: bool) -> String {
        match cmd {
            RelayCommand::Activate => prefix.to_string(),
            RelayCommand::MomentaryActivate => format!("{prefix}{OP_MOMENTARY}"),
            RelayCommand::Toggle => format!("{prefix}{OP_TOGGLE}"),
            RelayCommand::CheckStatus => format!("{prefix}{OP_STATUS}"),
            RelayCommand::RegisterAdmin { admin_number } => {
                format!("{prefix}{OP_REGISTER_ADMIN}{admin_number}{FIELD_END}")
            }
            RelayCommand::ChangePassword { new_password } => {
                let payload = if mask_payload { MASK } else { new_password.as_str() };
                format!("{prefix}{OP_CHANGE_PASSWORD}{payload}")
            }
            RelayCommand::AddUser { serial, phone_number } => {
                format!("{prefix}{OP_USER}{serial}{FIELD_END}{phone_number}{FIELD_END}")
            }
            RelayCommand::DeleteUser { serial } => {
                format!("{prefix}{OP_USER}{serial}{FIELD_END}{FIELD_END}")
            }
            RelayCommand::DeleteAllUsers => format!("{prefix}{OP_DELETE_ALL_USERS}{FIELD_END}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MAX_SLOT, MIN_SLOT};

    fn pwd(s: &str) -> Password {
        Password::new(s).unwrap()
    }

    #[test]
    fn test_simple_opcodes() {
        for p in ["1234", "0000", "9876"] {
            let password = pwd(p);
            assert_eq!(CommandEncoder::momentary_activate(&password), format!("{p}CC"));
            assert_eq!(CommandEncoder::toggle_relay(&password), format!("{p}DD"));
            assert_eq!(CommandEncoder::check_status(&password), format!("{p}EE"));
            assert_eq!(CommandEncoder::delete_all_users(&password), format!("{p}AR#"));
            assert_eq!(CommandEncoder::activate(&password), p);
        }
    }

    #[test]
    fn test_register_admin() {
        let text = CommandEncoder::register_admin(&pwd("1234"), "0469843459").unwrap();
        assert_eq!(text, "1234TEL000469843459#");
    }

    #[test]
    fn test_register_admin_requires_number() {
        assert_eq!(
            CommandEncoder::register_admin(&pwd("1234"), ""),
            Err(ValidationError::MissingAdminNumber)
        );
        assert_eq!(
            CommandEncoder::register_admin(&pwd("1234"), "   "),
            Err(ValidationError::MissingAdminNumber)
        );
    }

    #[test]
    fn test_change_password() {
        assert_eq!(
            CommandEncoder::change_password(&pwd("1234"), "5678").unwrap(),
            "1234P5678"
        );
        for bad in ["", "567", "56789", "56a8"] {
            assert_eq!(
                CommandEncoder::change_password(&pwd("1234"), bad),
                Err(ValidationError::InvalidPassword)
            );
        }
    }

    #[test]
    fn test_add_authorized_user() {
        let p = pwd("1234");
        assert_eq!(
            CommandEncoder::add_authorized_user(&p, "001", "0469843459").unwrap(),
            "1234A001#0469843459#"
        );
        assert_eq!(
            CommandEncoder::add_authorized_user(&p, "200", "+61400111222").unwrap(),
            "1234A200#+61400111222#"
        );
    }

    #[test]
    fn test_add_authorized_user_all_slots() {
        let p = pwd("4321");
        for index in MIN_SLOT..=MAX_SLOT {
            let serial = format!("{index:03}");
            let text = CommandEncoder::add_authorized_user(&p, &serial, "555").unwrap();
            assert_eq!(text, format!("4321A{serial}#555#"));
        }
    }

    #[test]
    fn test_add_authorized_user_rejects_bad_input() {
        let p = pwd("1234");
        for bad in ["000", "201", "12", "12a"] {
            assert!(CommandEncoder::add_authorized_user(&p, bad, "0469843459").is_err(), "{bad}");
        }
        assert_eq!(
            CommandEncoder::add_authorized_user(&p, "005", ""),
            Err(ValidationError::MissingPhoneNumber)
        );
    }

    #[test]
    fn test_delete_authorized_user() {
        let p = pwd("1234");
        assert_eq!(CommandEncoder::delete_authorized_user(&p, "001").unwrap(), "1234A001##");
        assert_eq!(CommandEncoder::delete_authorized_user(&p, "200").unwrap(), "1234A200##");
        for bad in ["000", "201", "12", "12a"] {
            assert!(CommandEncoder::delete_authorized_user(&p, bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_encoding_is_pure() {
        let p = pwd("2468");
        let first = CommandEncoder::add_authorized_user(&p, "017", "0400000000").unwrap();
        let second = CommandEncoder::add_authorized_user(&p, "017", "0400000000").unwrap();
        assert_eq!(first, second);
        assert_eq!(p.as_str(), "2468");
    }

    #[test]
    fn test_redacted_hides_passwords() {
        let cmd = RelayCommand::change_password("5678").unwrap();
        assert_eq!(CommandEncoder::redacted(&cmd), "****P****");

        let cmd = RelayCommand::add_user("010", "0411222333").unwrap();
        assert_eq!(CommandEncoder::redacted(&cmd), "****A010#0411222333#");
    }
}
