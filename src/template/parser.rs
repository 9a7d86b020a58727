//! Tokenizer and tree builder for message templates

use super::types::{Node, TemplateError, TemplateResult};

#[derive(Debug)]
enum Tag<'a> {
    Variable { name: &'a str, escape: bool },
    Open { name: &'a str, inverted: bool },
    Close(&'a str),
    Comment,
}

impl Tag<'_> {
    fn may_stand_alone(&self) -> bool {
        !matches!(self, Tag::Variable { .. })
    }
}

#[derive(Debug)]
enum Token<'a> {
    Text(&'a str),
    Tag(Tag<'a>),
}

/// Parse template source into a node tree.
pub(super) fn parse(source: &str) -> TemplateResult<Vec<Node>> {
    build(tokenize(source)?)
}

fn tokenize(source: &str) -> TemplateResult<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(offset) = source[pos..].find("{{") {
        let open = pos + offset;
        let (tag, end) = read_tag(source, open)?;

        let mut text_end = open;
        let mut next = end;

        if tag.may_stand_alone() {
            if let Some((line_start, line_end)) = standalone_line(source, pos, open, end) {
                text_end = line_start;
                next = line_end;
            }
        }

        if text_end > pos {
            tokens.push(Token::Text(&source[pos..text_end]));
        }
        if !matches!(tag, Tag::Comment) {
            tokens.push(Token::Tag(tag));
        }
        pos = next;
    }

    if pos < source.len() {
        tokens.push(Token::Text(&source[pos..]));
    }

    Ok(tokens)
}

/// Read the tag opening at `open`; returns the tag and the byte after it.
fn read_tag(source: &str, open: usize) -> TemplateResult<(Tag<'_>, usize)> {
    if source[open..].starts_with("{{{") {
        let inner_start = open + 3;
        let close = source[inner_start..]
            .find("}}}")
            .ok_or(TemplateError::UnclosedTag(open))?;
        let name = non_empty(source[inner_start..inner_start + close].trim(), open)?;
        return Ok((Tag::Variable { name, escape: false }, inner_start + close + 3));
    }

    let inner_start = open + 2;
    let close = source[inner_start..]
        .find("}}")
        .ok_or(TemplateError::UnclosedTag(open))?;
    let inner = source[inner_start..inner_start + close].trim();
    let end = inner_start + close + 2;

    let tag = match inner.chars().next() {
        Some('!') => Tag::Comment,
        Some('#') => Tag::Open {
            name: non_empty(inner[1..].trim(), open)?,
            inverted: false,
        },
        Some('^') => Tag::Open {
            name: non_empty(inner[1..].trim(), open)?,
            inverted: true,
        },
        Some('/') => Tag::Close(non_empty(inner[1..].trim(), open)?),
        Some('&') => Tag::Variable {
            name: non_empty(inner[1..].trim(), open)?,
            escape: false,
        },
        Some(_) => Tag::Variable {
            name: inner,
            escape: true,
        },
        None => return Err(TemplateError::EmptyTag(open)),
    };

    Ok((tag, end))
}

fn non_empty(name: &str, at: usize) -> TemplateResult<&str> {
    if name.is_empty() {
        Err(TemplateError::EmptyTag(at))
    } else {
        Ok(name)
    }
}

/// If the tag spanning `open..end` is the only content on its line, return
/// the line's start and the byte after its line break.
fn standalone_line(source: &str, pending: usize, open: usize, end: usize) -> Option<(usize, usize)> {
    let line_start = source[..open].rfind('\n').map(|i| i + 1).unwrap_or(0);
    // Another tag earlier on the same line
    if line_start < pending {
        return None;
    }
    if !is_blank(&source[line_start..open]) {
        return None;
    }

    let line_end = source[end..]
        .find('\n')
        .map(|i| end + i + 1)
        .unwrap_or(source.len());
    let trailing = source[end..line_end].trim_end_matches(['\n', '\r']);
    if !is_blank(trailing) {
        return None;
    }

    Some((line_start, line_end))
}

fn is_blank(s: &str) -> bool {
    s.chars().all(|c| c == ' ' || c == '\t')
}

fn build(tokens: Vec<Token<'_>>) -> TemplateResult<Vec<Node>> {
    // Each frame: (section name, inverted, collected children)
    let mut stack: Vec<(String, bool, Vec<Node>)> = Vec::new();
    let mut root = Vec::new();

    for token in tokens {
        let node = match token {
            Token::Text(text) => Node::Text(text.to_string()),
            Token::Tag(Tag::Variable { name, escape }) => Node::Variable {
                name: name.to_string(),
                escape,
            },
            Token::Tag(Tag::Open { name, inverted }) => {
                stack.push((name.to_string(), inverted, Vec::new()));
                continue;
            }
            Token::Tag(Tag::Close(name)) => match stack.pop() {
                Some((open_name, inverted, children)) if open_name == name => Node::Section {
                    name: open_name,
                    inverted,
                    children,
                },
                other => {
                    return Err(TemplateError::UnbalancedSection {
                        found: name.to_string(),
                        expected: other.map(|(open_name, _, _)| open_name),
                    })
                }
            },
            Token::Tag(Tag::Comment) => continue,
        };

        match stack.last_mut() {
            Some((_, _, children)) => children.push(node),
            None => root.push(node),
        }
    }

    if let Some((name, _, _)) = stack.pop() {
        return Err(TemplateError::UnclosedSection(name));
    }

    Ok(root)
}
