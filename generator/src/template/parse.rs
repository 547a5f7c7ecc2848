// Licensed under the Apache-2.0 license

//! Template text scanner.
//!
//! Splits raw template text into the item list of a [`Template`]: literal
//! runs, `{key:directive}` substitutions, and error items for constructs
//! the scanner cannot make sense of. Scanning never fails; broken
//! constructs surface later as visible markers in the rendered output.

use super::{Cmp, Directive, Item, Template};

/// Braces are ASCII, so byte positions are always character boundaries and
/// the text can be sliced at them directly.
pub(super) fn scan(text: &str) -> Vec<Item> {
    let bytes = text.as_bytes();
    let mut items = Vec::new();
    let mut literal = String::new();
    let mut pos = 0;
    while pos < bytes.len() {
        match bytes[pos] {
            b'{' if bytes.get(pos + 1) == Some(&b'{') => {
                literal.push('{');
                pos += 2;
            }
            b'}' if bytes.get(pos + 1) == Some(&b'}') => {
                literal.push('}');
                pos += 2;
            }
            b'{' => match find_close(bytes, pos + 1) {
                Some(end) => {
                    flush(&mut items, &mut literal);
                    items.push(parse_subst(&text[pos + 1..end]));
                    pos = end + 1;
                }
                None => {
                    flush(&mut items, &mut literal);
                    items.push(Item::Error(format!("unclosed `{{` at offset {pos}")));
                    pos = bytes.len();
                }
            },
            _ => {
                let start = pos;
                while pos < bytes.len() && bytes[pos] != b'{' && bytes[pos] != b'}' {
                    pos += 1;
                }
                // a lone `}` is plain text
                if pos < bytes.len() && bytes[pos] == b'}' && bytes.get(pos + 1) != Some(&b'}') {
                    pos += 1;
                }
                literal.push_str(&text[start..pos]);
            }
        }
    }
    flush(&mut items, &mut literal);
    items
}

fn flush(items: &mut Vec<Item>, literal: &mut String) {
    if !literal.is_empty() {
        items.push(Item::Literal(std::mem::take(literal)));
    }
}

/// Position of the `}` closing a substitution opened just before `start`.
/// Braces inside the substitution nest; escape pairs are balanced and need
/// no special treatment here.
fn find_close(bytes: &[u8], mut pos: usize) -> Option<usize> {
    let mut depth = 0usize;
    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' if depth == 0 => return Some(pos),
            b'}' => depth -= 1,
            _ => {}
        }
        pos += 1;
    }
    None
}

fn parse_subst(inner: &str) -> Item {
    let (key, spec) = match inner.split_once(':') {
        Some((key, spec)) => (key, Some(spec)),
        None => (inner, None),
    };
    if key.is_empty() {
        return Item::Error(format!("substitution `{{{inner}}}` has an empty key"));
    }
    Item::Subst {
        key: key.to_string(),
        directive: spec.map(parse_directive),
    }
}

fn parse_directive(spec: &str) -> Directive {
    match spec {
        "upper" => return Directive::Upper,
        "lower" => return Directive::Lower,
        "hex" => return Directive::Hex { pad: None },
        _ => {}
    }
    if let Some(pad) = spec.strip_prefix("hex:") {
        return match pad.parse::<usize>() {
            Ok(pad) => Directive::Hex { pad: Some(pad) },
            Err(_) => Directive::Unknown(spec.to_string()),
        };
    }
    if let Some(prefix) = spec.strip_prefix("removeprefix:") {
        return Directive::RemovePrefix(prefix.to_string());
    }
    if let Some(body) = spec.strip_prefix("repeat:") {
        return Directive::Repeat(Template::parse(body));
    }
    if let Some(rest) = spec.strip_prefix("if:") {
        let mut parts = rest.splitn(4, ':');
        let parsed = (parts.next(), parts.next(), parts.next(), parts.next());
        let (Some(cmp), Some(field), Some(value), Some(body)) = parsed else {
            return Directive::Unknown(spec.to_string());
        };
        let Some(cmp) = Cmp::parse(cmp) else {
            return Directive::Unknown(spec.to_string());
        };
        return Directive::If {
            cmp,
            field: field.to_string(),
            value: value.to_string(),
            body: Template::parse(body),
        };
    }
    Directive::Unknown(spec.to_string())
}
