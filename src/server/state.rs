use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::relay::ChatbotRelay;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub relay: Arc<ChatbotRelay>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(settings: Settings, relay: Arc<ChatbotRelay>) -> Self {
        Self {
            settings: Arc::new(settings),
            relay,
            start_time: Instant::now(),
        }
    }
}
