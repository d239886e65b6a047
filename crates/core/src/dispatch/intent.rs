//! `sms:` / `tel:` URL intents
//!
//! Android (and anything else) accepts `sms:<number>?body=<text>`. iOS opens
//! a blank compose screen for `sms:<number>`, so the body goes to the
//! clipboard first and the user pastes it.

use super::{DispatchOutcome, Dispatcher};
use crate::error::Result;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;
use std::str::FromStr;
use tracing::{error, info, warn};

/// Characters `encodeURIComponent` leaves alone
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Shown when the body was copied instead of prefilled
pub const CLIPBOARD_NOTICE: &str = "Command copied to clipboard. Please paste it in the SMS app.";

/// Target platform for intent URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    Android,
    Ios,
    #[default]
    Other,
}

impl Platform {
    /// Platform this binary was built for
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "ios") {
            Self::Ios
        } else {
            Self::Other
        }
    }

    /// Whether `sms:` URLs may carry a prefilled body
    pub fn supports_prefilled_body(self) -> bool {
        !matches!(self, Self::Ios)
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "android" => Self::Android,
            "ios" => Self::Ios,
            _ => Self::Other,
        })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Android => write!(f, "android"),
            Self::Ios => write!(f, "ios"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// What the platform layer has to do for one dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentPlan {
    /// URL to open
    pub url: String,
    /// Text to put on the clipboard before opening
    pub clipboard: Option<String>,
    /// Message for the user
    pub notice: Option<String>,
}

impl IntentPlan {
    /// SMS compose intent
    pub fn sms(platform: Platform, destination: &str, body: &str) -> Self {
        if platform.supports_prefilled_body() {
            Self {
                url: format!("sms:{}?body={}", destination, encode_component(body)),
                clipboard: None,
                notice: None,
            }
        } else {
            Self {
                url: format!("sms:{}", destination),
                clipboard: Some(body.to_string()),
                notice: Some(CLIPBOARD_NOTICE.to_string()),
            }
        }
    }

    /// Voice call intent
    pub fn call(destination: &str) -> Self {
        Self {
            url: format!("tel:{}", destination),
            clipboard: None,
            notice: None,
        }
    }
}

/// Percent-encode like JavaScript `encodeURIComponent`
pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Opens URLs through the OS
#[async_trait]
pub trait UrlLauncher: Send + Sync {
    /// Whether some installed app handles `url`
    async fn can_open(&self, url: &str) -> bool;

    /// Open `url`
    async fn open(&self, url: &str) -> Result<()>;
}

/// System clipboard
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn set_text(&self, text: &str) -> Result<()>;
}

/// [`Dispatcher`] that opens `sms:` / `tel:` URLs
pub struct IntentDispatcher<L, C> {
    platform: Platform,
    launcher: L,
    clipboard: C,
}

impl<L: UrlLauncher, C: Clipboard> IntentDispatcher<L, C> {
    pub fn new(platform: Platform, launcher: L, clipboard: C) -> Self {
        Self {
            platform,
            launcher,
            clipboard,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    async fn execute(&self, plan: IntentPlan) -> DispatchOutcome {
        if !self.launcher.can_open(&plan.url).await {
            warn!("No handler for {}", scheme(&plan.url));
            return DispatchOutcome::Unsupported;
        }

        if let Some(text) = &plan.clipboard {
            if let Err(e) = self.clipboard.set_text(text).await {
                error!("Clipboard error: {}", e);
                return DispatchOutcome::PlatformError(format!(
                    "Could not copy command to clipboard: {e}"
                ));
            }
            if let Some(notice) = &plan.notice {
                info!("{}", notice);
            }
        }

        match self.launcher.open(&plan.url).await {
            Ok(()) => DispatchOutcome::Sent,
            Err(e) => {
                error!("Failed to open {} intent: {}", scheme(&plan.url), e);
                DispatchOutcome::PlatformError(e.to_string())
            }
        }
    }
}

fn scheme(url: &str) -> &str {
    url.split(':').next().unwrap_or(url)
}

#[async_trait]
impl<L: UrlLauncher, C: Clipboard> Dispatcher for IntentDispatcher<L, C> {
    async fn send_sms(&self, destination: &str, body: &str) -> DispatchOutcome {
        self.execute(IntentPlan::sms(self.platform, destination, body))
            .await
    }

    async fn place_call(&self, destination: &str) -> DispatchOutcome {
        self.execute(IntentPlan::call(destination)).await
    }
}
