// Licensed under the Apache-2.0 license

//! Recursive template substitution.
//!
//! Template text is literal output interleaved with `{key:directive}`
//! substitutions. A template is parsed once into an item list and can then
//! be rendered any number of times against different context records.
//!
//! The directive set is deliberately small:
//!
//! | directive                         | effect                                      |
//! |-----------------------------------|---------------------------------------------|
//! | `{key}`                           | substitute the scalar value of `key`        |
//! | `{key:upper}` / `{key:lower}`     | case-fold the value                         |
//! | `{key:hex}` / `{key:hex:8}`       | integer value in hex, optionally zero-padded|
//! | `{key:removeprefix:p}`            | strip a leading `p` if present              |
//! | `{key:repeat:body}`               | render `body` once per element of the       |
//! |                                   | sequence `key`, element as the new context  |
//! | `{key:if:cmp:field:value:body}`   | render `body` iff `field cmp value` holds   |
//!
//! `{{` and `}}` escape literal braces; a lone `}` is literal text. Dotted
//! keys (`a.b`) traverse nested records.
//!
//! A broken construct never aborts the render: unknown keys and directives
//! degrade to a `<<template-error: ...>>` marker in the output so the
//! damage is visible in the artifact while sibling files keep generating.
//! The only render-level failure is runaway recursion, capped at
//! [`DEFAULT_RECURSION_LIMIT`] nesting levels.
//!
//! ## Usage
//!
//! ```rust
//! use regspace_generator::template::Template;
//! use regspace_generator::value::Record;
//!
//! let mut ctx = Record::new();
//! ctx.set("name", "ctrl");
//! ctx.set("absaddr", 0x40i64);
//!
//! let template = Template::parse("signal {name:upper} at {absaddr:hex:4};");
//! assert_eq!(template.render(&ctx).unwrap(), "signal CTRL at 0040;");
//! ```

mod parse;

use crate::error::{Error, Result};
use crate::util::to_hex;
use crate::value::{Record, Value};
use log::warn;

#[cfg(test)]
#[path = "tests.rs"]
mod tests;

/// Directive nesting allowed before a render is declared runaway.
pub const DEFAULT_RECURSION_LIMIT: usize = 64;

/// A parsed template, reusable across renders.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    name: Option<String>,
    items: Vec<Item>,
}

#[derive(Clone, Debug, PartialEq)]
enum Item {
    Literal(String),
    Subst {
        key: String,
        directive: Option<Directive>,
    },
    /// Text the scanner could not parse; renders as a marker.
    Error(String),
}

#[derive(Clone, Debug, PartialEq)]
enum Directive {
    Upper,
    Lower,
    Hex { pad: Option<usize> },
    RemovePrefix(String),
    Repeat(Template),
    If {
        cmp: Cmp,
        field: String,
        value: String,
        body: Template,
    },
    /// Preserved spec text of a directive nobody recognizes.
    Unknown(String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Cmp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Cmp {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "gt" => Some(Self::Gt),
            "lt" => Some(Self::Lt),
            "ge" => Some(Self::Ge),
            "le" => Some(Self::Le),
            _ => None,
        }
    }

    fn ordered(self) -> bool {
        !matches!(self, Self::Eq | Self::Ne)
    }

    fn compare<T: Ord>(self, left: &T, right: &T) -> bool {
        match self {
            Self::Eq => left == right,
            Self::Ne => left != right,
            Self::Gt => left > right,
            Self::Lt => left < right,
            Self::Ge => left >= right,
            Self::Le => left <= right,
        }
    }
}

fn marker(detail: &str) -> String {
    format!("<<template-error: {detail}>>")
}

impl Template {
    /// Parse template text. Never fails; malformed constructs become error
    /// items that render as visible markers.
    pub fn parse(text: &str) -> Self {
        Self {
            name: None,
            items: parse::scan(text),
        }
    }

    /// Like [`Template::parse`], with a name used in diagnostics (usually
    /// the template file name).
    pub fn parse_named(name: &str, text: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            items: parse::scan(text),
        }
    }

    pub fn render(&self, context: &Record) -> Result<String> {
        self.render_with_limit(context, DEFAULT_RECURSION_LIMIT)
    }

    pub fn render_with_limit(&self, context: &Record, limit: usize) -> Result<String> {
        let renderer = Renderer {
            name: self.name.as_deref().unwrap_or("<inline>"),
            limit,
        };
        let mut out = String::new();
        renderer.template(self, &mut out, context, 0)?;
        Ok(out)
    }
}

/// One render pass: the root template's name and the recursion cap, shared
/// by every nested sub-template render.
struct Renderer<'a> {
    name: &'a str,
    limit: usize,
}

impl Renderer<'_> {
    fn template(
        &self,
        template: &Template,
        out: &mut String,
        context: &Record,
        depth: usize,
    ) -> Result<()> {
        if depth >= self.limit {
            return Err(Error::TemplateRecursion {
                template: self.name.to_string(),
                limit: self.limit,
            });
        }
        for item in &template.items {
            match item {
                Item::Literal(text) => out.push_str(text),
                Item::Error(detail) => {
                    warn!("template `{}`: {detail}", self.name);
                    out.push_str(&marker(detail));
                }
                Item::Subst { key, directive } => {
                    self.subst(out, context, depth, key, directive.as_ref())?;
                }
            }
        }
        Ok(())
    }

    fn subst(
        &self,
        out: &mut String,
        context: &Record,
        depth: usize,
        key: &str,
        directive: Option<&Directive>,
    ) -> Result<()> {
        // `if` consults a field of its own, not the subject key
        if let Some(Directive::If {
            cmp,
            field,
            value,
            body,
        }) = directive
        {
            if self.condition_holds(context, *cmp, field, value) {
                self.template(body, out, context, depth + 1)?;
            }
            return Ok(());
        }

        let Some(subject) = context.get_path(key) else {
            warn!("template `{}`: no key `{key}` in context", self.name);
            out.push_str(&marker(&format!("unknown key `{key}`")));
            return Ok(());
        };

        match directive {
            None => match subject.display() {
                Some(text) => out.push_str(&text),
                None => out.push_str(&marker(&format!("key `{key}` is not a scalar"))),
            },
            Some(Directive::Upper) => match subject.display() {
                Some(text) => out.push_str(&text.to_uppercase()),
                None => out.push_str(&marker(&format!("key `{key}` is not a scalar"))),
            },
            Some(Directive::Lower) => match subject.display() {
                Some(text) => out.push_str(&text.to_lowercase()),
                None => out.push_str(&marker(&format!("key `{key}` is not a scalar"))),
            },
            Some(Directive::Hex { pad }) => match coerce_int(subject) {
                Some(v) => out.push_str(&to_hex(v, *pad)),
                None => out.push_str(&marker(&format!("key `{key}` is not an integer"))),
            },
            Some(Directive::RemovePrefix(prefix)) => match subject.display() {
                Some(text) => out.push_str(text.strip_prefix(prefix.as_str()).unwrap_or(&text)),
                None => out.push_str(&marker(&format!("key `{key}` is not a scalar"))),
            },
            Some(Directive::Repeat(body)) => match subject.as_list() {
                Some(elements) => {
                    for element in elements {
                        match element.as_record() {
                            Some(record) => self.template(body, out, record, depth + 1)?,
                            None => out.push_str(&marker(&format!(
                                "element of `{key}` is not a record"
                            ))),
                        }
                    }
                }
                None => out.push_str(&marker(&format!("key `{key}` is not a sequence"))),
            },
            Some(Directive::Unknown(spec)) => {
                warn!("template `{}`: unknown directive `{spec}`", self.name);
                out.push_str(&marker(&format!("unknown directive `{spec}`")));
            }
            Some(Directive::If { .. }) => unreachable!("handled above"),
        }
        Ok(())
    }

    /// Integer comparison when both sides coerce; otherwise `eq`/`ne` fall
    /// back to string comparison and ordered comparisons degrade to false
    /// with a report.
    fn condition_holds(&self, context: &Record, cmp: Cmp, field: &str, value: &str) -> bool {
        let Some(subject) = context.get_path(field) else {
            warn!(
                "template `{}`: no field `{field}` to compare against",
                self.name
            );
            return false;
        };
        if let (Some(left), Some(right)) = (coerce_int(subject), parse_int(value)) {
            return cmp.compare(&left, &right);
        }
        let Some(left) = subject.display() else {
            warn!("template `{}`: field `{field}` is not comparable", self.name);
            return false;
        };
        if cmp.ordered() {
            warn!(
                "template `{}`: ordered comparison on non-numeric field `{field}`",
                self.name
            );
            return false;
        }
        cmp.compare(&left, &value.to_string())
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Int(v) => Some(*v),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Str(s) => parse_int(s),
        _ => None,
    }
}

fn parse_int(text: &str) -> Option<i64> {
    let t = text.trim();
    match t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok(),
        None => t.parse().ok(),
    }
}
