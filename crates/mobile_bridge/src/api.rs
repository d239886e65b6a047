//! Flutter Rust Bridge API
//!
//! FFI-safe functions for Dart integration. Every relay action returns an
//! [`ActionPlan`] that the Dart side executes with `url_launcher` and the
//! clipboard service.

use flutter_rust_bridge::frb;
use gsmrelay_core::{CommandEncoder, Password, Platform, RelayCommand, SerialNumber};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::bridge::{ActionPlan, MobileSession, SettingsView};

/// Global session (thread-safe, no unsafe needed)
static SESSION: OnceCell<Arc<Mutex<MobileSession>>> = OnceCell::new();

fn session() -> Result<&'static Arc<Mutex<MobileSession>>, String> {
    SESSION
        .get()
        .ok_or_else(|| "Not initialized. Call init_app first.".to_string())
}

/// Open settings storage
///
/// # Arguments
/// * `data_dir` - App documents directory (from `path_provider`)
/// * `platform` - `"android"`, `"ios"` or anything else
///
/// Calling again (e.g. after a hot restart) reloads settings from disk, or
/// reopens the session if `data_dir` or `platform` changed.
#[frb]
pub async fn init_app(data_dir: String, platform: String) -> Result<(), String> {
    let platform: Platform = platform.parse().unwrap_or_default();
    if let Some(existing) = SESSION.get() {
        debug!("Session already initialized");
        return existing.lock().await.reopen(&data_dir, platform).await;
    }

    let session = MobileSession::open(&data_dir, platform).await?;
    info!("Relay session ready ({})", platform);
    // A concurrent init may have won the race; either session is equivalent.
    let _ = SESSION.set(Arc::new(Mutex::new(session)));
    Ok(())
}

// ===== Settings =====

/// Current unit settings
#[frb]
pub async fn load_settings() -> Result<SettingsView, String> {
    Ok(session()?.lock().await.settings())
}

/// Save unit number, name and password
///
/// # Errors
/// Blank unit number or a password that is not 4 digits.
#[frb]
pub async fn save_unit_settings(
    unit_number: String,
    unit_name: String,
    password: String,
) -> Result<(), String> {
    session()?
        .lock()
        .await
        .save_unit_settings(unit_number, unit_name, password)
        .await
}

// ===== Relay actions =====

/// Trigger the relay with a voice call
#[frb]
pub async fn activate_by_call() -> Result<ActionPlan, String> {
    session()?.lock().await.activate_by_call().await
}

/// Bare password SMS
#[frb]
pub async fn activate_by_sms() -> Result<ActionPlan, String> {
    session()?.lock().await.activate().await
}

/// Activate for the preset latch time
#[frb]
pub async fn momentary_activate() -> Result<ActionPlan, String> {
    session()?.lock().await.momentary_activate().await
}

/// Toggle relay on/off
#[frb]
pub async fn toggle_relay() -> Result<ActionPlan, String> {
    session()?.lock().await.toggle().await
}

/// Query relay status
#[frb]
pub async fn check_status() -> Result<ActionPlan, String> {
    session()?.lock().await.check_status().await
}

/// Setup step 1: register the admin number
#[frb]
pub async fn register_admin(admin_number: String) -> Result<ActionPlan, String> {
    session()?.lock().await.register_admin(&admin_number).await
}

/// Setup step 2: change the relay password
#[frb]
pub async fn change_password(new_password: String) -> Result<ActionPlan, String> {
    session()?.lock().await.change_password(&new_password).await
}

/// Store a phone number in a user slot
#[frb]
pub async fn add_authorized_user(serial: String, phone_number: String) -> Result<ActionPlan, String> {
    session()?
        .lock()
        .await
        .add_authorized_user(&serial, &phone_number)
        .await
}

/// Clear a user slot
#[frb]
pub async fn delete_authorized_user(serial: String) -> Result<ActionPlan, String> {
    session()?.lock().await.delete_authorized_user(&serial).await
}

/// Clear every user slot. Confirm with the user first.
#[frb]
pub async fn delete_all_users() -> Result<ActionPlan, String> {
    session()?.lock().await.delete_all_users().await
}

// ===== Input helpers =====

/// Keypad input → 3-digit serial text
#[frb(sync)]
pub fn normalize_serial_input(raw: String) -> String {
    SerialNumber::normalize_input(&raw)
}

/// Error text for a serial field, `None` when valid
#[frb(sync)]
pub fn check_serial(serial: String) -> Option<String> {
    SerialNumber::parse(&serial).err().map(|e| e.to_string())
}

/// Error text for a password field, `None` when valid
#[frb(sync)]
pub fn check_password(password: String) -> Option<String> {
    Password::new(password).err().map(|e| e.to_string())
}

/// Command text shown as an example under the user form
#[frb(sync)]
pub fn preview_add_user(password: String, serial: String, phone_number: String) -> Result<String, String> {
    let password = Password::new(password).map_err(|e| e.to_string())?;
    CommandEncoder::add_authorized_user(&password, &serial, &phone_number).map_err(|e| e.to_string())
}

/// Whether the action needs a confirmation dialog
#[frb(sync)]
pub fn needs_confirmation(kind: String) -> bool {
    kind == RelayCommand::DeleteAllUsers.kind()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_helpers() {
        assert_eq!(normalize_serial_input("7".into()), "007");
        assert_eq!(check_serial("007".into()), None);
        assert!(check_serial("201".into()).is_some());
        assert_eq!(check_password("1234".into()), None);
        assert_eq!(check_password("12".into()).as_deref(), Some("Password must be 4 digits"));
    }

    #[test]
    fn test_preview_add_user() {
        assert_eq!(
            preview_add_user("1234".into(), "001".into(), "0469843459".into()).unwrap(),
            "1234A001#0469843459#"
        );
        assert!(preview_add_user("1234".into(), "000".into(), "0469843459".into()).is_err());
    }

    #[test]
    fn test_needs_confirmation() {
        assert!(needs_confirmation("delete_all_users".into()));
        assert!(!needs_confirmation("toggle".into()));
    }
}
