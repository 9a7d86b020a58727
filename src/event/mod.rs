//! Portal lifecycle events as delivered by the webhook listener registry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of an event kind, rendered as `entity.action`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub entity: String,
    pub action: String,
}

impl EventKey {
    pub fn new(entity: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            action: action.into(),
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity, self.action)
    }
}

/// Payload of an event. Only `user_id` is needed to notify about it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventData {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub api_id: Option<String>,
    #[serde(default)]
    pub application_id: Option<String>,
}

/// A single lifecycle event (`subscription.add`, `user.validated`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDescriptor {
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub data: Option<EventData>,
}

impl EventDescriptor {
    pub fn new(entity: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            action: action.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: EventData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn key(&self) -> EventKey {
        EventKey::new(self.entity.as_str(), self.action.as_str())
    }

    /// The acting user, if the event carries one.
    pub fn user_id(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.user_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Event as queued by the portal for a listener; `id` is used to acknowledge it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(flatten)]
    pub event: EventDescriptor,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_display() {
        let event = EventDescriptor::new("subscription", "approved");
        assert_eq!(event.key().to_string(), "subscription.approved");
    }

    #[test]
    fn test_deserialize_camel_case_data() {
        let event: EventDescriptor = serde_json::from_value(json!({
            "entity": "application",
            "action": "add",
            "data": { "userId": "u1", "applicationId": "app-1" }
        }))
        .unwrap();

        assert_eq!(event.user_id(), Some("u1"));
        let data = event.data.unwrap();
        assert_eq!(data.application_id.as_deref(), Some("app-1"));
        assert!(data.api_id.is_none());
    }

    #[test]
    fn test_missing_or_empty_user_id() {
        let no_data = EventDescriptor::new("user", "add");
        assert_eq!(no_data.user_id(), None);

        let empty = EventDescriptor::new("user", "add").with_data(EventData {
            user_id: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(empty.user_id(), None);
    }

    #[test]
    fn test_missing_entity_deserializes_to_empty() {
        let event: EventDescriptor = serde_json::from_value(json!({ "action": "add" })).unwrap();
        assert_eq!(event.entity, "");
        assert!(event.data.is_none());
    }

    #[test]
    fn test_webhook_event_flattens_descriptor() {
        let hook: WebhookEvent = serde_json::from_value(json!({
            "id": "evt-7",
            "entity": "user",
            "action": "validated",
            "data": { "userId": "u9" }
        }))
        .unwrap();

        assert_eq!(hook.id, "evt-7");
        assert_eq!(hook.event.key().to_string(), "user.validated");
    }
}
