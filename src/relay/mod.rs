//! Event relay: lifecycle, interest filtering, view models, and dispatch.
//!
//! Lifecycle:
//!
//! ```text
//! Uninitialized -> Registering -> Ready -> Unregistered
//!                       |
//!                       +-------> Failed
//! ```
//!
//! `init` reaches `Ready` only when listener registration, the global
//! settings fetch and the template fetch all succeed. The settings snapshot
//! is read-only while events are handled; `reload` replaces it atomically.

mod error;
mod interest;
mod service;
mod view_model;

use std::fmt;

use serde::Serialize;

pub use error::{RelayError, RelayResult};
pub use interest::InterestTable;
pub use service::{
    BatchSummary, ChatbotRelay, HandleOutcome, RelaySnapshot, RelayStats, RelayStatsSnapshot,
    SkipReason,
};
pub use view_model::{build_view_model, ViewModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayState {
    Uninitialized,
    Registering,
    Ready,
    Failed,
    Unregistered,
}

impl RelayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayState::Uninitialized => "uninitialized",
            RelayState::Registering => "registering",
            RelayState::Ready => "ready",
            RelayState::Failed => "failed",
            RelayState::Unregistered => "unregistered",
        }
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
