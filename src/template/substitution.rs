//! Field substitution for compiled templates

use serde_json::Value;

use super::types::Node;

pub(super) fn render_nodes(nodes: &[Node], fields: &Value) -> String {
    let mut out = String::new();
    let mut scopes = vec![fields];
    render_into(&mut out, nodes, &mut scopes);
    out
}

fn render_into<'a>(out: &mut String, nodes: &'a [Node], scopes: &mut Vec<&'a Value>) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Variable { name, escape } => {
                let value = lookup(scopes, name);
                let text = to_text(value);
                if *escape {
                    out.push_str(&escape_markup(&text));
                } else {
                    out.push_str(&text);
                }
            }
            Node::Section {
                name,
                inverted,
                children,
            } => {
                let value = lookup(scopes, name);
                if *inverted {
                    if !is_truthy(value) {
                        render_into(out, children, scopes);
                    }
                    continue;
                }

                match value {
                    Some(Value::Array(items)) => {
                        for item in items {
                            scopes.push(item);
                            render_into(out, children, scopes);
                            scopes.pop();
                        }
                    }
                    Some(v @ Value::Object(_)) => {
                        scopes.push(v);
                        render_into(out, children, scopes);
                        scopes.pop();
                    }
                    other if is_truthy(other) => render_into(out, children, scopes),
                    _ => {}
                }
            }
        }
    }
}

/// Resolve a (possibly dotted) name against the scope stack, innermost first.
fn lookup<'a>(scopes: &[&'a Value], name: &str) -> Option<&'a Value> {
    if name == "." {
        return scopes.last().copied();
    }

    let mut parts = name.split('.');
    let head = parts.next()?;

    let mut current = scopes
        .iter()
        .rev()
        .find_map(|scope| scope.as_object().and_then(|map| map.get(head)))?;

    for part in parts {
        current = current.as_object()?.get(part)?;
    }

    Some(current)
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(_)) => true,
    }
}

fn to_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        // For arrays and objects, use JSON representation
        Some(other) => other.to_string(),
    }
}

/// Escape the characters chat webhooks treat as markup control characters.
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
