//! Chat message payloads, webhook transport, and fan-out dispatching.

mod dispatcher;
mod transport;
mod types;

pub use dispatcher::{redact_url, ChatDispatcher, DispatcherStats, DispatcherStatsSnapshot};
pub use transport::{ChatTransport, DeliveryError, HttpChatTransport};
pub use types::{ChatPayload, DispatchReport};
