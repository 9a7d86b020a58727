use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::PortalConfig;

use super::{
    GlobalSettings, ListenerRegistration, PortalApi, PortalError, PortalResult, TemplateSet,
    UserProfile,
};

/// Header identifying the caller to the portal API
const USER_ID_HEADER: &str = "x-userid";

/// HTTP client for the portal API.
#[derive(Debug, Clone)]
pub struct HttpPortalClient {
    client: reqwest::Client,
    api_url: String,
}

impl HttpPortalClient {
    pub fn new(config: &PortalConfig) -> PortalResult<Self> {
        let user_id = HeaderValue::from_str(&config.user_id_header)
            .map_err(|e| PortalError::InvalidConfig(format!("user_id_header: {}", e)))?;
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, user_id);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self::with_client(client, &config.api_url))
    }

    /// Reuse an existing client; the caller is responsible for its headers.
    pub fn with_client(client: reqwest::Client, api_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> PortalResult<T> {
        tracing::debug!(path = %path, "GET portal resource");
        let response = self.client.get(self.url(path)).send().await?;
        let response = Self::expect_status(response, "GET", path, StatusCode::OK)?;
        Self::decode(response, path).await
    }

    async fn send_action(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        expected: StatusCode,
    ) -> PortalResult<()> {
        let method_name = method.to_string();
        tracing::debug!(method = %method_name, path = %path, "Portal action");

        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        Self::expect_status(response, &method_name, path, expected)?;
        Ok(())
    }

    fn expect_status(
        response: reqwest::Response,
        method: &str,
        path: &str,
        expected: StatusCode,
    ) -> PortalResult<reqwest::Response> {
        let status = response.status();
        if status != expected {
            let err = PortalError::UnexpectedStatus {
                method: method.to_string(),
                path: path.to_string(),
                status: status.as_u16(),
                expected: expected.as_u16(),
            };
            tracing::debug!(error = %err, "Unexpected portal status");
            return Err(err);
        }
        Ok(response)
    }

    /// Decode a JSON body; an empty body decodes as JSON `null`.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response, path: &str) -> PortalResult<T> {
        let body = response.text().await?;
        let value = if body.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body).map_err(|source| PortalError::Decode {
                path: path.to_string(),
                source,
            })?
        };

        serde_json::from_value(value).map_err(|source| PortalError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

#[async_trait]
impl PortalApi for HttpPortalClient {
    async fn register_listener(&self, registration: &ListenerRegistration) -> PortalResult<()> {
        let body = serde_json::json!({
            "id": registration.id,
            "url": registration.url,
        });
        self.send_action(
            Method::PUT,
            &format!("webhooks/listeners/{}", registration.id),
            Some(&body),
            StatusCode::OK,
        )
        .await
    }

    async fn unregister_listener(&self, listener_id: &str) -> PortalResult<()> {
        self.send_action(
            Method::DELETE,
            &format!("webhooks/listeners/{}", listener_id),
            None,
            StatusCode::NO_CONTENT,
        )
        .await
    }

    async fn get_globals(&self) -> PortalResult<GlobalSettings> {
        self.get_json("globals").await
    }

    async fn get_templates(&self) -> PortalResult<TemplateSet> {
        self.get_json("templates/chatbot").await
    }

    async fn get_user(&self, user_id: &str) -> PortalResult<UserProfile> {
        self.get_json(&format!("users/{}", user_id)).await
    }

    async fn acknowledge_event(&self, listener_id: &str, event_id: &str) -> PortalResult<()> {
        self.send_action(
            Method::DELETE,
            &format!("webhooks/events/{}/{}", listener_id, event_id),
            None,
            StatusCode::NO_CONTENT,
        )
        .await
    }
}
