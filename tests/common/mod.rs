//! Shared fakes for the integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use chatbot_relay::catalog::MessageCatalog;
use chatbot_relay::event::{EventData, EventDescriptor, WebhookEvent};
use chatbot_relay::notification::{ChatDispatcher, ChatPayload, ChatTransport, DeliveryError};
use chatbot_relay::portal::{
    GlobalSettings, ListenerRegistration, PortalApi, PortalError, PortalResult, TemplateSet,
    UserProfile,
};
use chatbot_relay::relay::ChatbotRelay;

pub const LISTENER_ID: &str = "chatbot";

/// In-memory portal that records every call it receives.
#[derive(Default)]
pub struct FakePortal {
    globals: Mutex<GlobalSettings>,
    templates: Mutex<TemplateSet>,
    users: Mutex<HashMap<String, UserProfile>>,
    failing: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<String>>,
}

impl FakePortal {
    pub fn new(globals: GlobalSettings, templates: TemplateSet) -> Self {
        Self {
            globals: Mutex::new(globals),
            templates: Mutex::new(templates),
            ..Default::default()
        }
    }

    pub fn with_user(self, user_id: &str, name: &str) -> Self {
        self.users.lock().unwrap().insert(
            user_id.to_string(),
            UserProfile {
                name: Some(name.to_string()),
                email: Some(format!("{}@example.com", user_id)),
                ..Default::default()
            },
        );
        self
    }

    /// Make every call of `operation` fail with a 500.
    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn set_globals(&self, globals: GlobalSettings) {
        *self.globals.lock().unwrap() = globals;
    }

    pub fn set_templates(&self, templates: TemplateSet) {
        *self.templates.lock().unwrap() = templates;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split(' ').next() == Some(operation))
            .count()
    }

    fn record(&self, operation: &'static str, detail: &str) -> PortalResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}", operation, detail).trim_end().to_string());
        if self.failing.lock().unwrap().contains(operation) {
            return Err(PortalError::UnexpectedStatus {
                method: "GET".to_string(),
                path: operation.to_string(),
                status: 500,
                expected: 200,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PortalApi for FakePortal {
    async fn register_listener(&self, registration: &ListenerRegistration) -> PortalResult<()> {
        self.record("register_listener", &registration.id)
    }

    async fn unregister_listener(&self, listener_id: &str) -> PortalResult<()> {
        self.record("unregister_listener", listener_id)
    }

    async fn get_globals(&self) -> PortalResult<GlobalSettings> {
        self.record("get_globals", "")?;
        Ok(self.globals.lock().unwrap().clone())
    }

    async fn get_templates(&self) -> PortalResult<TemplateSet> {
        self.record("get_templates", "")?;
        Ok(self.templates.lock().unwrap().clone())
    }

    async fn get_user(&self, user_id: &str) -> PortalResult<UserProfile> {
        self.record("get_user", user_id)?;
        self.users
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .ok_or_else(|| PortalError::UnexpectedStatus {
                method: "GET".to_string(),
                path: format!("users/{}", user_id),
                status: 404,
                expected: 200,
            })
    }

    async fn acknowledge_event(&self, listener_id: &str, event_id: &str) -> PortalResult<()> {
        self.record("acknowledge_event", &format!("{}/{}", listener_id, event_id))
    }
}

/// Chat transport that records posts; URLs containing `fail` answer 500.
#[derive(Default)]
pub struct RecordingTransport {
    posts: Mutex<Vec<(String, ChatPayload)>>,
}

impl RecordingTransport {
    pub fn posts(&self) -> Vec<(String, ChatPayload)> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn post(&self, url: &str, payload: &ChatPayload) -> Result<(), DeliveryError> {
        self.posts
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        if url.contains("fail") {
            return Err(DeliveryError::HttpStatus {
                status: 500,
                body: "internal error".to_string(),
            });
        }
        Ok(())
    }
}

/// Global settings with the chatbot on and the given messages enabled.
pub fn globals(enabled: &[&str], hook_urls: &[&str]) -> GlobalSettings {
    let events: HashMap<&str, bool> = enabled.iter().map(|name| (*name, true)).collect();
    serde_json::from_value(json!({
        "network": { "schema": "https", "portalHost": "portal.example.com" },
        "chatbot": {
            "useChatbot": true,
            "events": events,
            "hookUrls": hook_urls,
            "username": "Portal Bot",
            "icon_url": "https://portal.example.com/bot.png"
        }
    }))
    .unwrap()
}

pub fn templates(entries: &[(&str, &str)]) -> TemplateSet {
    entries
        .iter()
        .map(|(name, source)| (name.to_string(), source.to_string()))
        .collect()
}

pub fn event(entity: &str, action: &str, user_id: Option<&str>) -> EventDescriptor {
    let descriptor = EventDescriptor::new(entity, action);
    match user_id {
        Some(id) => descriptor.with_data(EventData {
            user_id: Some(id.to_string()),
            ..Default::default()
        }),
        None => descriptor,
    }
}

pub fn webhook_event(id: &str, descriptor: EventDescriptor) -> WebhookEvent {
    WebhookEvent {
        id: id.to_string(),
        event: descriptor,
    }
}

pub struct Harness {
    pub portal: Arc<FakePortal>,
    pub transport: Arc<RecordingTransport>,
    pub relay: Arc<ChatbotRelay>,
}

pub fn harness(portal: FakePortal) -> Harness {
    let portal = Arc::new(portal);
    let transport = Arc::new(RecordingTransport::default());
    let dispatcher = Arc::new(ChatDispatcher::new(transport.clone()));
    let relay = Arc::new(ChatbotRelay::new(
        portal.clone(),
        dispatcher,
        MessageCatalog::default(),
        ListenerRegistration {
            id: LISTENER_ID.to_string(),
            url: "http://relay.local:3004/".to_string(),
        },
    ));

    Harness {
        portal,
        transport,
        relay,
    }
}
