//! Process shutdown signal handling.
//!
//! The server stops accepting requests when either Ctrl+C or SIGTERM
//! arrives; the relay is then de-registered by the caller.

use tokio::signal;

/// Which signal ended the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    CtrlC,
    Terminate,
}

impl ShutdownSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownSignal::CtrlC => "ctrl_c",
            ShutdownSignal::Terminate => "terminate",
        }
    }
}

/// Resolves once a shutdown signal is received.
pub async fn wait_for_signal() -> ShutdownSignal {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        _ = ctrl_c => ShutdownSignal::CtrlC,
        _ = terminate => ShutdownSignal::Terminate,
    };

    tracing::info!(signal = received.as_str(), "Shutdown signal received, draining requests");
    received
}

/// Adapter for `axum::serve(..).with_graceful_shutdown`.
pub async fn shutdown_signal() {
    wait_for_signal().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_names() {
        assert_eq!(ShutdownSignal::CtrlC.as_str(), "ctrl_c");
        assert_eq!(ShutdownSignal::Terminate.as_str(), "terminate");
    }
}
