//! Mock dispatcher for testing

use super::{DispatchOutcome, Dispatcher};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One recorded SMS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentItem {
    pub destination: String,
    pub body: String,
}

/// Records every dispatch and answers with a fixed outcome
///
/// Cloning shares the recorded history.
#[derive(Clone)]
pub struct MockDispatcher {
    outcome: DispatchOutcome,
    sent: Arc<Mutex<Vec<SentItem>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockDispatcher {
    /// Create mock that reports every dispatch as sent
    pub fn new() -> Self {
        Self::with_outcome(DispatchOutcome::Sent)
    }

    /// Create mock that always reports `outcome`
    pub fn with_outcome(outcome: DispatchOutcome) -> Self {
        Self {
            outcome,
            sent: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Recorded SMS, oldest first
    pub async fn sent(&self) -> Vec<SentItem> {
        self.sent.lock().await.clone()
    }

    /// Body of the most recent SMS
    pub async fn last_body(&self) -> Option<String> {
        self.sent.lock().await.last().map(|item| item.body.clone())
    }

    /// Recorded call destinations, oldest first
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

impl Default for MockDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dispatcher for MockDispatcher {
    async fn send_sms(&self, destination: &str, body: &str) -> DispatchOutcome {
        self.sent.lock().await.push(SentItem {
            destination: destination.to_string(),
            body: body.to_string(),
        });
        self.outcome.clone()
    }

    async fn place_call(&self, destination: &str) -> DispatchOutcome {
        self.calls.lock().await.push(destination.to_string());
        self.outcome.clone()
    }
}
