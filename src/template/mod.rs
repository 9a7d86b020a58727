//! Chat message templates.
//!
//! Templates use a mustache subset:
//! - `{{name}}` substitutes a field, escaping `&`, `<` and `>` only; unlike
//!   mustache.js, `"`, `'`, `/`, `` ` `` and `=` pass through unchanged so
//!   links stay intact
//! - `{{{name}}}` and `{{& name}}` substitute the raw value
//! - `{{#name}}...{{/name}}` renders its body only when the field is present
//!   and truthy (once per element for non-empty lists)
//! - `{{^name}}...{{/name}}` renders its body only when the field is absent
//!   or falsy
//! - `{{! comment }}` is dropped
//!
//! Missing fields render as empty strings; rendering never fails. Section
//! and comment tags standing alone on a line remove that whole line.
//!
//! # Example
//!
//! ```ignore
//! let template = MessageTemplate::compile("Hi {{name}}, approved!")?;
//! let text = template.render(&json!({ "name": "Bob" }));
//! assert_eq!(text, "Hi Bob, approved!");
//! ```

mod parser;
mod substitution;
mod types;

pub use substitution::escape_markup;
pub use types::{MessageTemplate, Node, TemplateError, TemplateResult};
