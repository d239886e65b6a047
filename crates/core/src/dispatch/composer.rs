//! Native SMS compose sheet with URL-intent fallback

use super::{DispatchOutcome, Dispatcher};
use crate::error::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

/// What the compose sheet reported back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeResult {
    Sent,
    Cancelled,
    /// Platform does not report the result (Android)
    Unknown,
}

/// In-app SMS compose sheet
#[async_trait]
pub trait SmsComposer: Send + Sync {
    async fn is_available(&self) -> bool;

    async fn compose(&self, recipients: &[&str], body: &str) -> Result<ComposeResult>;
}

/// Tries the compose sheet first, falls back to `inner` when the sheet is
/// unavailable or fails. Calls always go to `inner`.
pub struct ComposerDispatcher<S, D> {
    composer: S,
    inner: D,
}

impl<S: SmsComposer, D: Dispatcher> ComposerDispatcher<S, D> {
    pub fn new(composer: S, inner: D) -> Self {
        Self { composer, inner }
    }
}

#[async_trait]
impl<S: SmsComposer, D: Dispatcher> Dispatcher for ComposerDispatcher<S, D> {
    async fn send_sms(&self, destination: &str, body: &str) -> DispatchOutcome {
        if !self.composer.is_available().await {
            debug!("SMS composer unavailable, using URL intent");
            return self.inner.send_sms(destination, body).await;
        }

        match self.composer.compose(&[destination], body).await {
            Ok(ComposeResult::Sent) | Ok(ComposeResult::Unknown) => DispatchOutcome::Sent,
            Ok(ComposeResult::Cancelled) => DispatchOutcome::UserCancelled,
            Err(e) => {
                warn!("SMS composer failed ({}), using URL intent", e);
                self.inner.send_sms(destination, body).await
            }
        }
    }

    async fn place_call(&self, destination: &str) -> DispatchOutcome {
        self.inner.place_call(destination).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::MockDispatcher;
    use crate::error::CoreError;

    struct FakeComposer {
        available: bool,
        result: std::result::Result<ComposeResult, String>,
    }

    #[async_trait]
    impl SmsComposer for FakeComposer {
        async fn is_available(&self) -> bool {
            self.available
        }

        async fn compose(&self, recipients: &[&str], _body: &str) -> Result<ComposeResult> {
            assert_eq!(recipients.len(), 1);
            self.result.clone().map_err(CoreError::Platform)
        }
    }

    #[tokio::test]
    async fn test_composer_sent_skips_fallback() {
        let fallback = MockDispatcher::new();
        let composer = FakeComposer { available: true, result: Ok(ComposeResult::Sent) };
        let dispatcher = ComposerDispatcher::new(composer, fallback.clone());

        assert_eq!(dispatcher.send_sms("123", "1234CC").await, DispatchOutcome::Sent);
        assert!(fallback.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_composer_cancelled() {
        let composer = FakeComposer { available: true, result: Ok(ComposeResult::Cancelled) };
        let dispatcher = ComposerDispatcher::new(composer, MockDispatcher::new());
        assert_eq!(
            dispatcher.send_sms("123", "1234CC").await,
            DispatchOutcome::UserCancelled
        );
    }

    #[tokio::test]
    async fn test_unavailable_composer_falls_back() {
        let fallback = MockDispatcher::new();
        let composer = FakeComposer { available: false, result: Ok(ComposeResult::Sent) };
        let dispatcher = ComposerDispatcher::new(composer, fallback.clone());

        assert_eq!(dispatcher.send_sms("123", "1234EE").await, DispatchOutcome::Sent);
        assert_eq!(fallback.last_body().await.as_deref(), Some("1234EE"));
    }

    #[tokio::test]
    async fn test_composer_error_falls_back() {
        let fallback = MockDispatcher::new();
        let composer = FakeComposer { available: true, result: Err("boom".into()) };
        let dispatcher = ComposerDispatcher::new(composer, fallback.clone());

        assert_eq!(dispatcher.send_sms("123", "1234DD").await, DispatchOutcome::Sent);
        assert_eq!(fallback.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_calls_bypass_composer() {
        let fallback = MockDispatcher::new();
        let composer = FakeComposer { available: true, result: Ok(ComposeResult::Sent) };
        let dispatcher = ComposerDispatcher::new(composer, fallback.clone());

        dispatcher.place_call("0400").await;
        assert_eq!(fallback.calls().await, vec!["0400".to_string()]);
    }
}
