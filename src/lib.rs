// Shared infrastructure
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// Domain
pub mod catalog;
pub mod event;
pub mod notification;
pub mod portal;
pub mod relay;
pub mod template;

// Application layer
pub mod api;
pub mod server;

// Supporting modules
pub mod shutdown;
