use serde::{Deserialize, Serialize};

use crate::portal::DisplayIdentity;

/// JSON body posted to a chat webhook (Slack/Mattermost incoming hook format)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    pub text: String,
}

impl ChatPayload {
    pub fn new(text: impl Into<String>, display: &DisplayIdentity) -> Self {
        Self {
            username: display.username.clone(),
            icon_url: display.icon_url.clone(),
            text: text.into(),
        }
    }
}

/// Outcome of fanning one message out to its destinations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    /// Number of destinations a POST was attempted to
    pub attempted: usize,
    /// Destinations that answered with a 2xx status
    pub delivered: usize,
    /// Destinations that failed (transport error or non-2xx)
    pub failed: usize,
}

impl DispatchReport {
    pub fn all_delivered(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_serialization() {
        let display = DisplayIdentity {
            username: Some("Portal Bot".to_string()),
            icon_url: Some("https://example.com/bot.png".to_string()),
        };
        let payload = ChatPayload::new("Hi Bob, approved!", &display);

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "username": "Portal Bot",
                "icon_url": "https://example.com/bot.png",
                "text": "Hi Bob, approved!"
            })
        );
    }

    #[test]
    fn test_payload_omits_unset_display_fields() {
        let payload = ChatPayload::new("hello", &DisplayIdentity::default());
        assert_eq!(serde_json::to_value(&payload).unwrap(), json!({ "text": "hello" }));
    }

    #[test]
    fn test_report_all_delivered() {
        let ok = DispatchReport {
            attempted: 2,
            delivered: 2,
            failed: 0,
        };
        assert!(ok.all_delivered());

        let partial = DispatchReport {
            attempted: 2,
            delivered: 1,
            failed: 1,
        };
        assert!(!partial.all_delivered());
        assert!(DispatchReport::default().all_delivered());
    }
}
