use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::ChatPayload;

/// Error type for a single webhook delivery
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

/// Posts a payload to one chat webhook URL.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn post(&self, url: &str, payload: &ChatPayload) -> Result<(), DeliveryError>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    client: reqwest::Client,
}

impl HttpChatTransport {
    pub fn new(timeout: Duration) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn post(&self, url: &str, payload: &ChatPayload) -> Result<(), DeliveryError> {
        let response = self.client.post(url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(DeliveryError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
