//! Portal API collaborator.
//!
//! The relay talks to the portal API for four things: registering itself in
//! the webhook listener registry, reading global settings and chat templates
//! at startup, resolving the acting user of an event, and acknowledging
//! processed events. [`PortalApi`] is the seam; [`HttpPortalClient`] is the
//! production implementation over `reqwest`.

mod client;
mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use client::HttpPortalClient;
pub use types::{
    ChatbotSettings, DisplayIdentity, GlobalSettings, ListenerRegistration, NetworkSettings,
    TemplateSet, UserProfile,
};

/// Errors from the portal API layer.
#[derive(Debug, Error)]
pub enum PortalError {
    /// The HTTP request itself failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The portal answered with a status other than the expected one.
    #[error("{method} {path} returned status {status}, expected {expected}")]
    UnexpectedStatus {
        method: String,
        path: String,
        status: u16,
        expected: u16,
    },

    /// The response body was not the expected JSON document.
    #[error("Invalid response body from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for portal operations
pub type PortalResult<T> = Result<T, PortalError>;

#[async_trait]
pub trait PortalApi: Send + Sync {
    /// `PUT webhooks/listeners/{id}` -> 200
    async fn register_listener(&self, registration: &ListenerRegistration) -> PortalResult<()>;

    /// `DELETE webhooks/listeners/{id}` -> 204
    async fn unregister_listener(&self, listener_id: &str) -> PortalResult<()>;

    /// `GET globals` -> 200
    async fn get_globals(&self) -> PortalResult<GlobalSettings>;

    /// `GET templates/chatbot` -> 200
    async fn get_templates(&self) -> PortalResult<TemplateSet>;

    /// `GET users/{id}` -> 200
    async fn get_user(&self, user_id: &str) -> PortalResult<UserProfile>;

    /// `DELETE webhooks/events/{listener}/{event}` -> 204
    async fn acknowledge_event(&self, listener_id: &str, event_id: &str) -> PortalResult<()>;
}
