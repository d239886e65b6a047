//! Settings persistence
//!
//! Settings are plain string key/value pairs. A missing key means "use the
//! default": password `1234`, everything else empty.
//!
//! [`SettingsProvider`] is the only place that reads the store; callers get
//! a [`RelaySettings`] value and pass it around explicitly.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::{CoreError, Result};
use crate::types::{Password, RelaySettings};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Relay phone number key
pub const KEY_UNIT_NUMBER: &str = "unitNumber";
/// Relay display name key
pub const KEY_UNIT_NAME: &str = "unitName";
/// Relay password key
pub const KEY_PASSWORD: &str = "password";
/// Admin phone number key
pub const KEY_ADMIN_NUMBER: &str = "adminNumber";

/// String key/value store for settings
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a value, `None` if never written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Typed access to relay settings on top of a [`SettingsStore`]
pub struct SettingsProvider<S> {
    store: S,
}

impl<S: SettingsStore> SettingsProvider<S> {
    /// Wrap a store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read all settings, filling defaults for missing keys
    ///
    /// A stored password that is not 4 digits loads as the default with
    /// [`RelaySettings::password_invalid`] set, so settings screens can still
    /// open and repair it.
    pub async fn load(&self) -> Result<RelaySettings> {
        let unit_number = self.get_or_empty(KEY_UNIT_NUMBER).await?;
        let unit_name = self.get_or_empty(KEY_UNIT_NAME).await?;
        let admin_number = self.get_or_empty(KEY_ADMIN_NUMBER).await?;
        let (password, password_invalid) = match self.store.get(KEY_PASSWORD).await? {
            Some(stored) if !stored.is_empty() => match Password::new(stored) {
                Ok(password) => (password, false),
                Err(_) => {
                    warn!("Stored password is not 4 digits; re-enter it in settings");
                    (Password::default(), true)
                }
            },
            _ => (Password::default(), false),
        };

        debug!("Loaded settings for unit {:?}", unit_number);
        Ok(RelaySettings {
            unit_number,
            unit_name,
            password,
            admin_number,
            password_invalid,
        })
    }

    /// Save unit number, name and password together
    ///
    /// # Errors
    /// `MissingUnitNumber` if the unit number is blank, `InvalidPassword` if
    /// the loaded password was unusable and no new one was set.
    pub async fn save_unit(&self, settings: &RelaySettings) -> Result<()> {
        if !settings.has_unit_number() {
            return Err(CoreError::MissingUnitNumber);
        }
        settings.checked_password()?;
        self.store
            .set(KEY_UNIT_NUMBER, settings.unit_number.trim())
            .await?;
        self.store.set(KEY_UNIT_NAME, &settings.unit_name).await?;
        self.store
            .set(KEY_PASSWORD, settings.password.as_str())
            .await?;
        info!("Unit settings saved");
        Ok(())
    }

    /// Persist the password now configured on the relay
    pub async fn save_password(&self, password: &Password) -> Result<()> {
        self.store.set(KEY_PASSWORD, password.as_str()).await
    }

    /// Persist the registered admin number
    pub async fn save_admin_number(&self, admin_number: &str) -> Result<()> {
        self.store.set(KEY_ADMIN_NUMBER, admin_number).await
    }

    async fn get_or_empty(&self, key: &str) -> Result<String> {
        Ok(self.store.get(key).await?.unwrap_or_default())
    }
}
