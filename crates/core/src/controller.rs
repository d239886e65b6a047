//! Relay controller: settings → validate → encode → dispatch
//!
//! Settings are loaded once when the controller is built and kept in memory.
//! Call [`RelayController::reload`] after another component edits the store.

use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::error::{Capability, CoreError, Result};
use crate::protocol::CommandEncoder;
use crate::settings::{SettingsProvider, SettingsStore};
use crate::types::{RelayCommand, RelaySettings};
use tracing::{debug, info};

/// A command that reached the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Relay phone number
    pub destination: String,
    /// Exact SMS text, `None` for voice calls
    pub body: Option<String>,
    /// `Sent` or `UserCancelled`
    pub outcome: DispatchOutcome,
}

/// Drives one relay unit
pub struct RelayController<S, D> {
    provider: SettingsProvider<S>,
    dispatcher: D,
    settings: RelaySettings,
}

impl<S: SettingsStore, D: Dispatcher> RelayController<S, D> {
    /// Load settings from `store` and build a controller
    pub async fn new(store: S, dispatcher: D) -> Result<Self> {
        let provider = SettingsProvider::new(store);
        let settings = provider.load().await?;
        Ok(Self {
            provider,
            dispatcher,
            settings,
        })
    }

    /// Settings in use
    pub fn settings(&self) -> &RelaySettings {
        &self.settings
    }

    /// Settings provider (for settings screens)
    pub fn provider(&self) -> &SettingsProvider<S> {
        &self.provider
    }

    /// Dispatcher in use
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Re-read settings from the store
    pub async fn reload(&mut self) -> Result<()> {
        self.settings = self.provider.load().await?;
        Ok(())
    }

    /// Save unit settings and start using them
    pub async fn update_settings(&mut self, settings: RelaySettings) -> Result<()> {
        self.provider.save_unit(&settings).await?;
        self.reload().await
    }

    /// Trigger the relay with a voice call
    pub async fn activate_by_call(&self) -> Result<Delivery> {
        let destination = self.destination()?;
        info!("Calling relay unit");
        let outcome = self.dispatcher.place_call(destination).await;
        finish(destination, None, outcome, Capability::Call)
    }

    /// Bare password SMS
    pub async fn activate(&self) -> Result<Delivery> {
        self.send(&RelayCommand::Activate).await
    }

    /// `CC`: activate for the preset latch time
    pub async fn momentary_activate(&self) -> Result<Delivery> {
        self.send(&RelayCommand::MomentaryActivate).await
    }

    /// `DD`: toggle on/off
    pub async fn toggle(&self) -> Result<Delivery> {
        self.send(&RelayCommand::Toggle).await
    }

    /// `EE`: status query
    pub async fn check_status(&self) -> Result<Delivery> {
        self.send(&RelayCommand::CheckStatus).await
    }

    /// Register the admin number, then remember it
    pub async fn register_admin(&mut self, admin_number: &str) -> Result<Delivery> {
        self.destination()?;
        let cmd = RelayCommand::register_admin(admin_number)?;
        let delivery = self.send(&cmd).await?;
        if let RelayCommand::RegisterAdmin { admin_number } = cmd {
            self.provider.save_admin_number(&admin_number).await?;
            self.settings.admin_number = admin_number;
        }
        Ok(delivery)
    }

    /// Send `{old}P{new}`; once handed off, the new password is persisted
    /// and used for every later command.
    pub async fn change_password(&mut self, new_password: &str) -> Result<Delivery> {
        self.destination()?;
        let cmd = RelayCommand::change_password(new_password)?;
        let delivery = self.send(&cmd).await?;
        if let (DispatchOutcome::Sent, RelayCommand::ChangePassword { new_password }) =
            (&delivery.outcome, cmd)
        {
            self.provider.save_password(&new_password).await?;
            self.settings.password = new_password;
            info!("Relay password updated");
        }
        Ok(delivery)
    }

    /// Store `phone_number` in user slot `serial`
    pub async fn add_authorized_user(&self, serial: &str, phone_number: &str) -> Result<Delivery> {
        self.destination()?;
        let cmd = RelayCommand::add_user(serial, phone_number)?;
        self.send(&cmd).await
    }

    /// Clear user slot `serial`
    pub async fn delete_authorized_user(&self, serial: &str) -> Result<Delivery> {
        self.destination()?;
        let cmd = RelayCommand::delete_user(serial)?;
        self.send(&cmd).await
    }

    /// Clear the whole user table
    pub async fn delete_all_users(&self) -> Result<Delivery> {
        self.send(&RelayCommand::DeleteAllUsers).await
    }

    /// Encode `cmd` with the stored password and dispatch it
    ///
    /// Refused with `InvalidPassword` while the stored password is unusable.
    pub async fn send(&self, cmd: &RelayCommand) -> Result<Delivery> {
        let destination = self.destination()?;
        let body = cmd.encode(self.settings.checked_password()?);
        debug!("Encoded {}: {}", cmd.kind(), CommandEncoder::redacted(cmd));

        let outcome = self.dispatcher.send_sms(destination, &body).await;
        info!("{} -> {}", cmd.kind(), outcome);
        finish(destination, Some(body), outcome, Capability::Sms)
    }

    fn destination(&self) -> Result<&str> {
        if self.settings.has_unit_number() {
            Ok(self.settings.unit_number.trim())
        } else {
            Err(CoreError::MissingUnitNumber)
        }
    }
}

fn finish(
    destination: &str,
    body: Option<String>,
    outcome: DispatchOutcome,
    capability: Capability,
) -> Result<Delivery> {
    match outcome {
        DispatchOutcome::Sent | DispatchOutcome::UserCancelled => Ok(Delivery {
            destination: destination.to_string(),
            body,
            outcome,
        }),
        DispatchOutcome::Unsupported => Err(CoreError::CapabilityUnavailable { capability }),
        DispatchOutcome::PlatformError(msg) => Err(CoreError::Platform(msg)),
    }
}
