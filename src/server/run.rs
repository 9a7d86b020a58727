use std::future::Future;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::relay::{ChatbotRelay, RelayError};

use super::{create_app, AppState};

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Chatbot relay failed to initialize: {0}")]
    Init(#[source] RelayError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Register with the portal, serve until `shutdown` resolves, then
/// de-register.
///
/// `listener` must already be bound: the portal may post batches as soon as
/// registration succeeds.
pub async fn run<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let relay = state.relay.clone();

    if let Err(e) = relay.init().await {
        // Registration may have gone through before another startup call failed
        deregister(&relay).await;
        return Err(ServeError::Init(e));
    }

    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Server listening on {}", addr);
    }

    let served = axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown)
        .await;

    deregister(&relay).await;
    served?;
    Ok(())
}

async fn deregister(relay: &ChatbotRelay) {
    // deinit logs its own failure
    let _ = relay.deinit().await;
}
