use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;

use crate::metrics::DeliveryMetrics;
use crate::portal::DisplayIdentity;

use super::{ChatPayload, ChatTransport, DispatchReport};

/// Statistics for the chat dispatcher
#[derive(Debug, Default)]
pub struct DispatcherStats {
    /// Messages handed to the dispatcher
    pub total_messages: AtomicU64,
    /// Successful webhook POSTs
    pub total_delivered: AtomicU64,
    /// Failed webhook POSTs
    pub total_failed: AtomicU64,
}

impl DispatcherStats {
    pub fn snapshot(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            total_messages: self.total_messages.load(Ordering::Relaxed),
            total_delivered: self.total_delivered.load(Ordering::Relaxed),
            total_failed: self.total_failed.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of dispatcher statistics
#[derive(Debug, Clone, Serialize)]
pub struct DispatcherStatsSnapshot {
    pub total_messages: u64,
    pub total_delivered: u64,
    pub total_failed: u64,
}

/// Fans a rendered message out to every destination webhook.
///
/// Destinations are independent: all POSTs run concurrently, in no
/// particular order, and a failing destination never affects its siblings.
pub struct ChatDispatcher {
    transport: Arc<dyn ChatTransport>,
    stats: DispatcherStats,
}

impl ChatDispatcher {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            stats: DispatcherStats::default(),
        }
    }

    /// Get dispatcher statistics
    pub fn stats(&self) -> DispatcherStatsSnapshot {
        self.stats.snapshot()
    }

    /// Post `text` to every destination. Failures are logged and counted,
    /// never returned.
    #[tracing::instrument(
        name = "dispatcher.dispatch",
        skip(self, text, destinations, display),
        fields(destinations = destinations.len())
    )]
    pub async fn dispatch(
        &self,
        text: &str,
        destinations: &[String],
        display: &DisplayIdentity,
    ) -> DispatchReport {
        self.stats.total_messages.fetch_add(1, Ordering::Relaxed);

        if destinations.is_empty() {
            tracing::debug!("No destinations configured, nothing to post");
            return DispatchReport::default();
        }

        let payload = ChatPayload::new(text, display);
        let payload = &payload;

        let mut futures: FuturesUnordered<_> = destinations
            .iter()
            .map(|url| async move { (url, self.transport.post(url, payload).await) })
            .collect();

        let mut report = DispatchReport {
            attempted: destinations.len(),
            ..Default::default()
        };

        while let Some((url, result)) = futures.next().await {
            match result {
                Ok(()) => {
                    report.delivered += 1;
                    tracing::debug!(destination = %redact_url(url), "Posted to chat webhook");
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        destination = %redact_url(url),
                        error = %e,
                        "Posting to chat webhook failed"
                    );
                }
            }
        }

        self.stats
            .total_delivered
            .fetch_add(report.delivered as u64, Ordering::Relaxed);
        self.stats
            .total_failed
            .fetch_add(report.failed as u64, Ordering::Relaxed);
        DeliveryMetrics::record_delivered(report.delivered as u64);
        DeliveryMetrics::record_failed(report.failed as u64);

        report
    }
}

/// Webhook URLs embed their credentials in the path; only log scheme and host.
pub fn redact_url(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => format!("{}://{}/…", parsed.scheme(), host),
            None => "<invalid url>".to_string(),
        },
        Err(_) => "<invalid url>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::notification::DeliveryError;

    /// Records every POST; URLs containing "fail" answer with HTTP 500.
    #[derive(Default)]
    struct RecordingTransport {
        posts: Mutex<Vec<(String, ChatPayload)>>,
    }

    #[async_trait]
    impl ChatTransport for RecordingTransport {
        async fn post(&self, url: &str, payload: &ChatPayload) -> Result<(), DeliveryError> {
            self.posts
                .lock()
                .unwrap()
                .push((url.to_string(), payload.clone()));
            if url.contains("fail") {
                return Err(DeliveryError::HttpStatus {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    fn display() -> DisplayIdentity {
        DisplayIdentity {
            username: Some("bot".to_string()),
            icon_url: None,
        }
    }

    #[tokio::test]
    async fn test_empty_destinations_is_noop() {
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = ChatDispatcher::new(transport.clone());

        let report = dispatcher.dispatch("hello", &[], &display()).await;

        assert_eq!(report, DispatchReport::default());
        assert!(transport.posts.lock().unwrap().is_empty());
        assert_eq!(dispatcher.stats().total_messages, 1);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_siblings() {
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = ChatDispatcher::new(transport.clone());
        let destinations = vec![
            "http://hook1/a".to_string(),
            "http://fail/b".to_string(),
            "http://hook3/c".to_string(),
        ];

        let report = dispatcher.dispatch("hello", &destinations, &display()).await;

        assert_eq!(report.attempted, 3);
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failed, 1);

        let posts = transport.posts.lock().unwrap();
        assert_eq!(posts.len(), 3);
        assert!(posts.iter().all(|(_, payload)| payload.text == "hello"));
        assert!(posts
            .iter()
            .all(|(_, payload)| payload.username.as_deref() == Some("bot")));

        let stats = dispatcher.stats();
        assert_eq!(stats.total_delivered, 2);
        assert_eq!(stats.total_failed, 1);
    }

    #[test]
    fn test_redact_url() {
        assert_eq!(
            redact_url("https://hooks.slack.com/services/T000/B000/SECRET"),
            "https://hooks.slack.com/…"
        );
        assert_eq!(redact_url("not a url"), "<invalid url>");
    }
}
