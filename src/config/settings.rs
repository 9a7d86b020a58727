use std::collections::HashMap;
use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::catalog::CatalogEntry;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    pub portal: PortalConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub otel: OtelConfig,
    /// Replaces the built-in message catalogue when present
    #[serde(default)]
    pub catalog: Option<HashMap<String, CatalogEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// Base URL of the portal API, e.g. `http://portal-api:3001/`
    pub api_url: String,
    /// URL the portal should post webhook batches to (defaults to this server)
    #[serde(default)]
    pub my_url: Option<String>,
    /// Identifier this relay registers under in the listener registry
    #[serde(default = "default_listener_id")]
    pub listener_id: String,
    /// Value sent in the `X-UserId` header on every portal call
    #[serde(default = "default_user_id_header")]
    pub user_id_header: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Timeout for a single webhook POST
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    pub key: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3004
}

fn default_listener_id() -> String {
    "chatbot".to_string()
}

fn default_user_id_header() -> String {
    "1".to_string()
}

fn default_request_timeout() -> u64 {
    10 // 10 seconds
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "chatbot-relay".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("portal.listener_id", default_listener_id())?
            .set_default("portal.user_id_header", default_user_id_header())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // CHATBOT__PORTAL__API_URL, CHATBOT__SERVER__PORT, CHATBOT__API__KEY, ...
            .add_source(
                Environment::with_prefix("CHATBOT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// URL registered with the portal's listener registry.
    pub fn listener_url(&self) -> String {
        match &self.portal.my_url {
            Some(url) => url.clone(),
            None => format!("http://{}:{}/", self.server.host, self.server.port),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl PortalConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            my_url: None,
            listener_id: default_listener_id(),
            user_id_header: default_user_id_header(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with(portal: PortalConfig) -> Settings {
        Settings {
            server: ServerConfig::default(),
            portal,
            chat: ChatConfig::default(),
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
            otel: OtelConfig::default(),
            catalog: None,
        }
    }

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 3004);

        let portal = PortalConfig::new("http://portal-api:3001/");
        assert_eq!(portal.listener_id, "chatbot");
        assert_eq!(portal.user_id_header, "1");
        assert_eq!(portal.request_timeout_secs, 10);

        assert_eq!(ChatConfig::default().request_timeout_secs, 10);
        assert_eq!(LoggingConfig::default().format, LogFormat::Text);
    }

    #[test]
    fn test_listener_url_defaults_to_server_address() {
        let settings = settings_with(PortalConfig::new("http://portal-api:3001/"));
        assert_eq!(settings.listener_url(), "http://0.0.0.0:3004/");
        assert_eq!(settings.server_addr(), "0.0.0.0:3004");
    }

    #[test]
    fn test_listener_url_prefers_configured_url() {
        let mut portal = PortalConfig::new("http://portal-api:3001/");
        portal.my_url = Some("http://chatbot:3004/".to_string());
        let settings = settings_with(portal);
        assert_eq!(settings.listener_url(), "http://chatbot:3004/");
    }

    #[test]
    fn test_deserialize_from_json_source() {
        let raw = r#"{
            "portal": { "api_url": "http://portal-api:3001/" },
            "logging": { "format": "json" },
            "catalog": { "userSignedUp": { "entity": "user", "action": "add" } }
        }"#;
        let settings: Settings = Config::builder()
            .add_source(File::from_str(raw, config::FileFormat::Json))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.portal.listener_id, "chatbot");
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert!(!settings.otel.enabled);
        let catalog = settings.catalog.unwrap();
        assert_eq!(catalog["userSignedUp"].entity, "user");
    }
}
