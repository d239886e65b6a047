//! Desktop implementations of the platform capabilities
//!
//! Desktops rarely send SMS themselves; `sms:` / `tel:` URLs go to whatever
//! handler is registered (phone-link apps, softphones).

use async_trait::async_trait;
use gsmrelay_core::dispatch::{Clipboard, UrlLauncher};
use gsmrelay_core::{CoreError, Result};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Opens URLs with the system handler
pub struct SystemLauncher;

#[async_trait]
impl UrlLauncher for SystemLauncher {
    async fn can_open(&self, url: &str) -> bool {
        // No portable way to query handlers; only our own schemes are accepted.
        url.starts_with("sms:") || url.starts_with("tel:")
    }

    async fn open(&self, url: &str) -> Result<()> {
        let url = url.to_string();
        tokio::task::spawn_blocking(move || open::that(url))
            .await
            .map_err(|e| CoreError::Platform(e.to_string()))?
            .map_err(|e| CoreError::Platform(format!("Failed to open handler: {e}")))
    }
}

/// Prints URLs instead of opening them (`--dry-run`)
#[derive(Clone, Default)]
pub struct PrintLauncher {
    opened: Arc<Mutex<Vec<String>>>,
}

impl PrintLauncher {
    /// URLs printed so far
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl UrlLauncher for PrintLauncher {
    async fn can_open(&self, _url: &str) -> bool {
        true
    }

    async fn open(&self, url: &str) -> Result<()> {
        println!("Would open: {url}");
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(url.to_string());
        }
        Ok(())
    }
}

/// Shows the text for manual copying
///
/// Terminals have no portable clipboard, so the "copy" is the user selecting
/// the printed line.
pub struct TerminalClipboard;

#[async_trait]
impl Clipboard for TerminalClipboard {
    async fn set_text(&self, text: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "Copy this command into the SMS app:")?;
        writeln!(out, "    {text}")?;
        out.flush()?;
        Ok(())
    }
}
