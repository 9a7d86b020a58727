//! Template types and error definitions

use thiserror::Error;

use super::parser;
use super::substitution;

/// Template-specific error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Unclosed tag starting at byte {0}")]
    UnclosedTag(usize),

    #[error("Empty tag at byte {0}")]
    EmptyTag(usize),

    #[error("Section '{0}' is never closed")]
    UnclosedSection(String),

    #[error("Unexpected closing tag '{found}' (open section: {expected:?})")]
    UnbalancedSection {
        found: String,
        expected: Option<String>,
    },
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// A parsed template node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text, copied verbatim
    Text(String),
    /// Field substitution; `escape` is false for `{{{ }}}` and `{{& }}`
    Variable { name: String, escape: bool },
    /// Conditional block; `inverted` for `{{^ }}`
    Section {
        name: String,
        inverted: bool,
        children: Vec<Node>,
    },
}

/// A compiled message template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    source: String,
    nodes: Vec<Node>,
}

impl MessageTemplate {
    /// Parse a template, rejecting unclosed tags and unbalanced sections.
    pub fn compile(source: &str) -> TemplateResult<Self> {
        let nodes = parser::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            nodes,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render against a JSON object of fields. Non-object contexts render
    /// every field as empty.
    pub fn render(&self, fields: &serde_json::Value) -> String {
        substitution::render_nodes(&self.nodes, fields)
    }
}
