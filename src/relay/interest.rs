use std::collections::HashMap;

use crate::catalog::MessageCatalog;
use crate::event::{EventDescriptor, EventKey};
use crate::portal::{GlobalSettings, TemplateSet};
use crate::template::MessageTemplate;

use super::{RelayError, RelayResult};

/// Event kinds the relay acts upon, each with its compiled message template.
///
/// Built once per settings snapshot and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestTable {
    entries: HashMap<EventKey, MessageTemplate>,
}

impl InterestTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Intersect the enabled messages of the global settings with the
    /// template set.
    ///
    /// Yields an empty table when the chatbot toggle is off or no events are
    /// configured. Fails when an enabled message has no (or an empty)
    /// template, or when a template does not parse.
    pub fn build(
        globals: &GlobalSettings,
        templates: &TemplateSet,
        catalog: &MessageCatalog,
    ) -> RelayResult<Self> {
        let Some(chatbot) = globals.chatbot.as_ref() else {
            tracing::info!("No chatbot section in global settings, no events will be relayed");
            return Ok(Self::empty());
        };
        if !chatbot.use_chatbot {
            tracing::info!("Chatbot is disabled in global settings, no events will be relayed");
            return Ok(Self::empty());
        }
        let Some(events) = chatbot.events.as_ref() else {
            tracing::info!("No chatbot events configured, no events will be relayed");
            return Ok(Self::empty());
        };

        let mut entries = HashMap::new();
        for (name, entry) in catalog.iter() {
            if !events.get(name).copied().unwrap_or(false) {
                continue;
            }

            let source = templates
                .get(name)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| RelayError::MissingTemplate(name.to_string()))?;

            let key = entry.key();
            tracing::debug!(message = %name, event = %key, "Relaying event");
            entries.insert(key, compile(name, source)?);
        }

        for name in events.keys().filter(|name| catalog.get(name).is_none()) {
            tracing::debug!(message = %name, "Enabled message is not in the catalogue, ignoring");
        }

        Ok(Self { entries })
    }

    pub fn get(&self, key: &EventKey) -> Option<&MessageTemplate> {
        self.entries.get(key)
    }

    pub fn contains(&self, event: &EventDescriptor) -> bool {
        self.entries.contains_key(&event.key())
    }

    pub fn keys(&self) -> impl Iterator<Item = &EventKey> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn compile(name: &str, source: &str) -> RelayResult<MessageTemplate> {
    if source.is_empty() {
        return Err(RelayError::MissingTemplate(name.to_string()));
    }
    MessageTemplate::compile(source).map_err(|source| RelayError::InvalidTemplate {
        name: name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::ChatbotSettings;

    fn globals(use_chatbot: bool, enabled: &[(&str, bool)]) -> GlobalSettings {
        GlobalSettings {
            chatbot: Some(ChatbotSettings {
                use_chatbot,
                events: Some(
                    enabled
                        .iter()
                        .map(|(name, on)| (name.to_string(), *on))
                        .collect(),
                ),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn templates(entries: &[(&str, &str)]) -> TemplateSet {
        entries
            .iter()
            .map(|(name, source)| (name.to_string(), source.to_string()))
            .collect()
    }

    #[test]
    fn test_build_intersects_enabled_events_and_templates() {
        let table = InterestTable::build(
            &globals(
                true,
                &[("userSignedUp", true), ("applicationAdded", false)],
            ),
            &templates(&[
                ("userSignedUp", "{{name}} signed up"),
                ("applicationAdded", "{{name}} added an app"),
            ]),
            &MessageCatalog::default(),
        )
        .unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.contains(&EventDescriptor::new("user", "add")));
        assert!(!table.contains(&EventDescriptor::new("application", "add")));
        assert_eq!(
            table.get(&EventKey::new("user", "add")).unwrap().source(),
            "{{name}} signed up"
        );
    }

    #[test]
    fn test_build_fails_on_missing_template() {
        let err = InterestTable::build(
            &globals(true, &[("subscriptionAdded", true)]),
            &templates(&[]),
            &MessageCatalog::default(),
        )
        .unwrap_err();

        assert!(matches!(err, RelayError::MissingTemplate(ref name) if name == "subscriptionAdded"));
        assert_eq!(
            err.to_string(),
            "The chatbot message template is missing for event \"subscriptionAdded\""
        );
    }

    #[test]
    fn test_build_fails_on_empty_template() {
        let err = InterestTable::build(
            &globals(true, &[("subscriptionAdded", true)]),
            &templates(&[("subscriptionAdded", "")]),
            &MessageCatalog::default(),
        )
        .unwrap_err();

        assert!(matches!(err, RelayError::MissingTemplate(_)));
    }

    #[test]
    fn test_build_fails_on_invalid_template() {
        let err = InterestTable::build(
            &globals(true, &[("userSignedUp", true)]),
            &templates(&[("userSignedUp", "Hi {{name")]),
            &MessageCatalog::default(),
        )
        .unwrap_err();

        assert!(matches!(err, RelayError::InvalidTemplate { ref name, .. } if name == "userSignedUp"));
    }

    #[test]
    fn test_toggle_off_yields_empty_table() {
        let table = InterestTable::build(
            &globals(false, &[("userSignedUp", true)]),
            // A missing template is not an error when the toggle is off
            &templates(&[]),
            &MessageCatalog::default(),
        )
        .unwrap();

        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_sections_yield_empty_table() {
        let table = InterestTable::build(
            &GlobalSettings::default(),
            &templates(&[]),
            &MessageCatalog::default(),
        )
        .unwrap();
        assert!(table.is_empty());

        let no_events = GlobalSettings {
            chatbot: Some(ChatbotSettings {
                use_chatbot: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        let table =
            InterestTable::build(&no_events, &templates(&[]), &MessageCatalog::default()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_unknown_enabled_message_is_ignored() {
        let table = InterestTable::build(
            &globals(true, &[("somethingNew", true)]),
            &templates(&[]),
            &MessageCatalog::default(),
        )
        .unwrap();
        assert!(table.is_empty());
    }
}
