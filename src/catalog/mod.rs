//! Message catalogue.
//!
//! The portal's global settings enable chat messages by *message name*
//! (`userSignedUp`, `subscriptionAdded`, ...) and the template set is keyed
//! by the same names. The catalogue maps each name to the `entity.action`
//! pair of the event that triggers it.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::event::EventKey;

/// Event kind a message name is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub entity: String,
    pub action: String,
}

impl CatalogEntry {
    pub fn key(&self) -> EventKey {
        EventKey::new(self.entity.as_str(), self.action.as_str())
    }
}

const BUILT_IN: &[(&str, &str, &str)] = &[
    ("userSignedUp", "user", "add"),
    ("userValidatedEmail", "user", "validated"),
    ("userDeleted", "user", "delete"),
    ("applicationAdded", "application", "add"),
    ("applicationDeleted", "application", "delete"),
    ("subscriptionAdded", "subscription", "add"),
    ("subscriptionApproved", "subscription", "approved"),
    ("subscriptionDeleted", "subscription", "delete"),
    ("approvalRequired", "approval", "add"),
];

/// Ordered mapping from message name to event kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        let entries = BUILT_IN
            .iter()
            .map(|(name, entity, action)| {
                (
                    name.to_string(),
                    CatalogEntry {
                        entity: entity.to_string(),
                        action: action.to_string(),
                    },
                )
            })
            .collect();
        Self { entries }
    }
}

impl From<HashMap<String, CatalogEntry>> for MessageCatalog {
    fn from(entries: HashMap<String, CatalogEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

impl MessageCatalog {
    /// Use the configured catalogue, or the built-in one when none is configured.
    pub fn from_settings(configured: Option<&HashMap<String, CatalogEntry>>) -> Self {
        match configured {
            Some(entries) => Self::from(entries.clone()),
            None => Self::default(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
