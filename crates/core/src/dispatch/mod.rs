//! Dispatch boundary: hand a command to the platform's SMS or call facility
//!
//! Dispatchers only see a destination and a body. Platform quirks (such as
//! iOS refusing a prefilled SMS body) are handled by the implementations in
//! this module and never reach the encoder.

mod composer;
mod intent;
mod mock;

pub use composer::{ComposeResult, ComposerDispatcher, SmsComposer};
pub use intent::{
    encode_component, Clipboard, IntentDispatcher, IntentPlan, Platform, UrlLauncher,
    CLIPBOARD_NOTICE,
};
pub use mock::{MockDispatcher, SentItem};

use async_trait::async_trait;
use std::fmt;

/// Result of a single hand-off to the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Handed to the OS (sent, or compose screen opened)
    Sent,
    /// User backed out of the compose sheet
    UserCancelled,
    /// Device cannot send SMS / place calls
    Unsupported,
    /// The OS call itself failed
    PlatformError(String),
}

impl DispatchOutcome {
    /// Whether the command left the app
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent => write!(f, "sent"),
            Self::UserCancelled => write!(f, "cancelled"),
            Self::Unsupported => write!(f, "unsupported"),
            Self::PlatformError(msg) => write!(f, "failed: {msg}"),
        }
    }
}

/// Platform SMS / voice call capability
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Send `body` as an SMS to `destination`
    async fn send_sms(&self, destination: &str, body: &str) -> DispatchOutcome;

    /// Place a voice call to `destination` (no payload)
    async fn place_call(&self, destination: &str) -> DispatchOutcome;
}

#[async_trait]
impl<D: Dispatcher + ?Sized> Dispatcher for std::sync::Arc<D> {
    async fn send_sms(&self, destination: &str, body: &str) -> DispatchOutcome {
        (**self).send_sms(destination, body).await
    }

    async fn place_call(&self, destination: &str) -> DispatchOutcome {
        (**self).place_call(destination).await
    }
}
