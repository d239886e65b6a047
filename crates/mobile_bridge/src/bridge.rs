//! Mobile session state
//!
//! Rust cannot open URLs or touch the clipboard from inside the Flutter
//! isolate, so the dispatcher here only records the [`IntentPlan`] for each
//! command. The Dart side executes the plan (canLaunchUrl, clipboard, launchUrl).

use async_trait::async_trait;
use gsmrelay_core::settings::FileStore;
use gsmrelay_core::{
    Delivery, DispatchOutcome, Dispatcher, IntentPlan, Password, Platform, RelayController,
    RelaySettings,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Dispatcher that plans intents instead of launching them
///
/// Always reports `Sent`: whether the device can actually open the URL is
/// only known on the Dart side.
pub struct PlanRecorder {
    platform: Platform,
    last: Mutex<Option<IntentPlan>>,
}

impl PlanRecorder {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            last: Mutex::new(None),
        }
    }

    /// Take the plan recorded by the latest dispatch
    pub async fn take(&self) -> Option<IntentPlan> {
        self.last.lock().await.take()
    }

    async fn record(&self, plan: IntentPlan) -> DispatchOutcome {
        debug!("Planned intent for {}", self.platform);
        *self.last.lock().await = Some(plan);
        DispatchOutcome::Sent
    }
}

#[async_trait]
impl Dispatcher for PlanRecorder {
    async fn send_sms(&self, destination: &str, body: &str) -> DispatchOutcome {
        self.record(IntentPlan::sms(self.platform, destination, body))
            .await
    }

    async fn place_call(&self, destination: &str) -> DispatchOutcome {
        self.record(IntentPlan::call(destination)).await
    }
}

/// Intent for the Dart side to execute
///
/// Rust never checks the device, so the caller must check `canLaunchUrl(url)`
/// and report "SMS not available" / "Phone calls not available" itself when
/// it fails. Errors returned from Rust are input and settings errors only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPlan {
    /// `sms:` or `tel:` URL
    pub url: String,
    /// Copy this to the clipboard before launching
    pub clipboard: Option<String>,
    /// Show this to the user
    pub notice: Option<String>,
    /// Command text, `None` for calls
    pub body: Option<String>,
}

/// Settings as shown on the settings screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsView {
    pub unit_number: String,
    pub unit_name: String,
    pub password: String,
    pub admin_number: String,
    /// Stored password was unusable; ask the user to re-enter it
    pub password_invalid: bool,
}

impl From<&RelaySettings> for SettingsView {
    fn from(settings: &RelaySettings) -> Self {
        Self {
            unit_number: settings.unit_number.clone(),
            unit_name: settings.unit_name.clone(),
            password: settings.password.to_string(),
            admin_number: settings.admin_number.clone(),
            password_invalid: settings.password_invalid,
        }
    }
}

/// Relay controller plus the recorder it dispatches through
pub struct MobileSession {
    controller: RelayController<FileStore, Arc<PlanRecorder>>,
    recorder: Arc<PlanRecorder>,
    data_dir: PathBuf,
    platform: Platform,
}

impl MobileSession {
    /// Open the settings file in `data_dir` and load it
    pub async fn open(data_dir: impl AsRef<Path>, platform: Platform) -> Result<Self, String> {
        let data_dir = data_dir.as_ref().to_path_buf();
        let recorder = Arc::new(PlanRecorder::new(platform));
        let store = FileStore::in_dir(&data_dir);
        let controller = RelayController::new(store, recorder.clone())
            .await
            .map_err(|e| e.to_string())?;
        Ok(Self {
            controller,
            recorder,
            data_dir,
            platform,
        })
    }

    /// Reload settings, or start over when `data_dir` or `platform` changed
    pub async fn reopen(&mut self, data_dir: impl AsRef<Path>, platform: Platform) -> Result<(), String> {
        if self.data_dir.as_path() == data_dir.as_ref() && self.platform == platform {
            return self.reload().await;
        }
        debug!("Session arguments changed, reopening");
        *self = Self::open(data_dir, platform).await?;
        Ok(())
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn settings(&self) -> SettingsView {
        SettingsView::from(self.controller.settings())
    }

    pub async fn save_unit_settings(
        &mut self,
        unit_number: String,
        unit_name: String,
        password: String,
    ) -> Result<(), String> {
        let password = Password::new(password).map_err(|e| e.to_string())?;
        let settings = RelaySettings {
            unit_number,
            unit_name,
            password,
            admin_number: self.controller.settings().admin_number.clone(),
            password_invalid: false,
        };
        self.controller
            .update_settings(settings)
            .await
            .map_err(|e| e.to_string())
    }

    pub async fn reload(&mut self) -> Result<(), String> {
        self.controller.reload().await.map_err(|e| e.to_string())
    }

    pub async fn activate_by_call(&self) -> Result<ActionPlan, String> {
        let delivery = self.controller.activate_by_call().await;
        self.finish(delivery).await
    }

    pub async fn activate(&self) -> Result<ActionPlan, String> {
        let delivery = self.controller.activate().await;
        self.finish(delivery).await
    }

    pub async fn momentary_activate(&self) -> Result<ActionPlan, String> {
        let delivery = self.controller.momentary_activate().await;
        self.finish(delivery).await
    }

    pub async fn toggle(&self) -> Result<ActionPlan, String> {
        let delivery = self.controller.toggle().await;
        self.finish(delivery).await
    }

    pub async fn check_status(&self) -> Result<ActionPlan, String> {
        let delivery = self.controller.check_status().await;
        self.finish(delivery).await
    }

    pub async fn register_admin(&mut self, admin_number: &str) -> Result<ActionPlan, String> {
        let delivery = self.controller.register_admin(admin_number).await;
        self.finish(delivery).await
    }

    pub async fn change_password(&mut self, new_password: &str) -> Result<ActionPlan, String> {
        let delivery = self.controller.change_password(new_password).await;
        self.finish(delivery).await
    }

    pub async fn add_authorized_user(&self, serial: &str, phone: &str) -> Result<ActionPlan, String> {
        let delivery = self.controller.add_authorized_user(serial, phone).await;
        self.finish(delivery).await
    }

    pub async fn delete_authorized_user(&self, serial: &str) -> Result<ActionPlan, String> {
        let delivery = self.controller.delete_authorized_user(serial).await;
        self.finish(delivery).await
    }

    pub async fn delete_all_users(&self) -> Result<ActionPlan, String> {
        let delivery = self.controller.delete_all_users().await;
        self.finish(delivery).await
    }

    async fn finish(&self, delivery: gsmrelay_core::Result<Delivery>) -> Result<ActionPlan, String> {
        let delivery = delivery.map_err(|e| e.to_string())?;
        let plan = self
            .recorder
            .take()
            .await
            .ok_or_else(|| "No intent was planned".to_string())?;
        Ok(ActionPlan {
            url: plan.url,
            clipboard: plan.clipboard,
            notice: plan.notice,
            body: delivery.body,
        })
    }
}
