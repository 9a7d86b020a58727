use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use chatbot_relay::catalog::MessageCatalog;
use chatbot_relay::config::Settings;
use chatbot_relay::notification::{ChatDispatcher, HttpChatTransport};
use chatbot_relay::portal::{HttpPortalClient, ListenerRegistration};
use chatbot_relay::relay::ChatbotRelay;
use chatbot_relay::server::{run, AppState};
use chatbot_relay::shutdown::shutdown_signal;
use chatbot_relay::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;

    // Keep the guard alive until the process exits
    let _telemetry = init_telemetry(&settings.logging, &settings.otel)?;
    tracing::info!(portal = %settings.portal.api_url, "Configuration loaded");

    // Portal and chat clients
    let portal = Arc::new(HttpPortalClient::new(&settings.portal)?);
    let transport = Arc::new(HttpChatTransport::new(Duration::from_secs(
        settings.chat.request_timeout_secs,
    ))?);
    let dispatcher = Arc::new(ChatDispatcher::new(transport));
    let catalog = MessageCatalog::from_settings(settings.catalog.as_ref());

    let listener_registration = ListenerRegistration {
        id: settings.portal.listener_id.clone(),
        url: settings.listener_url(),
    };
    let relay = Arc::new(ChatbotRelay::new(
        portal,
        dispatcher,
        catalog,
        listener_registration,
    ));

    // Bound before registering so the listener URL is live once the portal knows it
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let state = AppState::new(settings, relay);
    run(listener, state, shutdown_signal()).await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
