//! Portal API payloads

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Global settings snapshot as served by `GET globals`.
///
/// Only the sections the relay reads are modelled; everything else in the
/// blob is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default)]
    pub network: NetworkSettings,
    #[serde(default)]
    pub chatbot: Option<ChatbotSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSettings {
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default)]
    pub portal_host: String,
}

fn default_schema() -> String {
    "https".to_string()
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotSettings {
    /// Feature toggle; when off no event is interesting
    #[serde(default, deserialize_with = "null_as_default")]
    pub use_chatbot: bool,
    /// Message name -> enabled
    #[serde(default)]
    pub events: Option<HashMap<String, bool>>,
    /// Destination webhook URLs
    #[serde(default, deserialize_with = "null_as_default")]
    pub hook_urls: Vec<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "icon_url")]
    pub icon_url: Option<String>,
}

impl GlobalSettings {
    /// `schema://portalHost`, the base of every link in a message.
    pub fn portal_url(&self) -> String {
        format!("{}://{}", self.network.schema, self.network.portal_host)
    }

    pub fn hook_urls(&self) -> &[String] {
        self.chatbot
            .as_ref()
            .map(|c| c.hook_urls.as_slice())
            .unwrap_or(&[])
    }

    pub fn display(&self) -> DisplayIdentity {
        let chatbot = self.chatbot.as_ref();
        DisplayIdentity {
            username: chatbot.and_then(|c| c.username.clone()),
            icon_url: chatbot.and_then(|c| c.icon_url.clone()),
        }
    }
}

/// Name and avatar the chat system shows for posted messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayIdentity {
    pub username: Option<String>,
    pub icon_url: Option<String>,
}

/// Message name -> template source, as served by `GET templates/chatbot`.
pub type TemplateSet = HashMap<String, String>;

/// User profile as served by `GET users/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Body of `PUT webhooks/listeners/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerRegistration {
    pub id: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_toggle_and_hook_urls_are_defaults() {
        let globals: GlobalSettings = serde_json::from_value(json!({
            "network": { "schema": "https", "portalHost": "portal.example.com" },
            "chatbot": {
                "useChatbot": null,
                "hookUrls": null,
                "events": { "userSignedUp": true }
            }
        }))
        .unwrap();

        let chatbot = globals.chatbot.as_ref().unwrap();
        assert!(!chatbot.use_chatbot);
        assert!(chatbot.hook_urls.is_empty());
        assert!(globals.hook_urls().is_empty());
    }

    #[test]
    fn test_deserialize_globals() {
        let globals: GlobalSettings = serde_json::from_value(json!({
            "title": "ignored",
            "network": { "schema": "https", "portalHost": "portal.example.com", "apiHost": "api.example.com" },
            "chatbot": {
                "useChatbot": true,
                "hookUrls": ["https://hooks.example.com/a", "https://hooks.example.com/b"],
                "username": "Portal Bot",
                "icon_url": "https://example.com/bot.png",
                "events": { "userSignedUp": true, "applicationAdded": false }
            }
        }))
        .unwrap();

        assert_eq!(globals.portal_url(), "https://portal.example.com");
        assert_eq!(globals.hook_urls().len(), 2);

        let chatbot = globals.chatbot.as_ref().unwrap();
        assert!(chatbot.use_chatbot);
        assert_eq!(chatbot.events.as_ref().unwrap()["userSignedUp"], true);

        let display = globals.display();
        assert_eq!(display.username.as_deref(), Some("Portal Bot"));
        assert_eq!(display.icon_url.as_deref(), Some("https://example.com/bot.png"));
    }

    #[test]
    fn test_globals_without_chatbot_section() {
        let globals: GlobalSettings = serde_json::from_value(json!({
            "network": { "portalHost": "localhost:3000" }
        }))
        .unwrap();

        assert_eq!(globals.portal_url(), "https://localhost:3000");
        assert!(globals.hook_urls().is_empty());
        assert_eq!(globals.display(), DisplayIdentity::default());
    }

    #[test]
    fn test_user_profile_partial() {
        let profile: UserProfile =
            serde_json::from_value(json!({ "name": "Bob", "groups": ["admins"] })).unwrap();
        assert_eq!(profile.name.as_deref(), Some("Bob"));
        assert!(profile.email.is_none());
    }
}
