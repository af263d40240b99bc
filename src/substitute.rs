//! Placeholder substitution.
//!
//! Each declared field with a domain token, plus the implicit agent-name
//! field, becomes a [`Binding`]. A filled field displays its value; an empty
//! one displays its own token, so unfilled placeholders stay visible.
//!
//! Substitution is two-phase. [`ParsedAssembly`] splits the pristine
//! assembly into literal and token runs once; every render rewrites those
//! runs. Values are never scanned for tokens, which keeps repeated renders
//! idempotent even when a value looks like a token.

use serde::Serialize;
use std::borrow::Cow;

use crate::assembly::Assembly;
use crate::markup;
use crate::state::{FieldValues, is_filled};
use crate::surface::RichSurface;
use crate::template::{AGENT_NAME_KEY, AGENT_NAME_TOKEN, Template};
use crate::token::{ParsedText, Segment};

/// A field's token and what it displays as for one render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub key: String,
    pub token: String,
    pub display: String,
    pub filled: bool,
}

/// Substituted outputs; `body` is HTML with field spans
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Resolved {
    pub subject: String,
    pub body: String,
    pub case_comment: String,
}

/// Build the binding list for a template. Declared fields come first, so a
/// template that declares the agent token itself takes precedence. A
/// template that declares a field under the agent key gets no implicit
/// agent binding, since both would tag the same spans.
pub fn bindings(template: &Template, values: &FieldValues, agent_name: &str) -> Vec<Binding> {
    let mut out: Vec<Binding> = template
        .fields
        .iter()
        .filter_map(|field| {
            let token = field.token()?;
            Some(make_binding(&field.key, token, values.get(&field.key)))
        })
        .collect();

    if !template.has_field(AGENT_NAME_KEY) {
        let agent = agent_name.to_string();
        out.push(make_binding(AGENT_NAME_KEY, AGENT_NAME_TOKEN, Some(&agent)));
    }
    out
}

fn make_binding(key: &str, token: &str, value: Option<&String>) -> Binding {
    let filled = is_filled(value);
    let display = match value {
        Some(v) if filled => v.clone(),
        _ => token.to_string(),
    };
    Binding {
        key: key.to_string(),
        token: token.to_string(),
        display,
        filled,
    }
}

fn find<'b>(bindings: &'b [Binding], token: &str) -> Option<&'b Binding> {
    bindings.iter().find(|b| b.token == token)
}

/// An assembly split into runs against its template's tokens
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedAssembly {
    subject: ParsedText,
    body: ParsedText,
    case_comment: ParsedText,
}

impl ParsedAssembly {
    pub fn new(assembly: &Assembly, template: &Template) -> Self {
        let tokens = template.tokens();
        Self {
            subject: ParsedText::parse(&assembly.subject, &tokens),
            body: ParsedText::parse(&assembly.body, &tokens),
            case_comment: ParsedText::parse(&assembly.case_comment, &tokens),
        }
    }

    pub fn resolve(&self, bindings: &[Binding]) -> Resolved {
        Resolved {
            subject: render_plain(&self.subject, bindings),
            body: render_body(&self.body, bindings),
            case_comment: render_plain(&self.case_comment, bindings),
        }
    }

    /// Tokens that occur inside a markup tag in the body (for example in an
    /// `href`). Those occurrences carry no span and need a full re-render.
    pub fn tokens_inside_tags(&self) -> Vec<&str> {
        let mut found: Vec<&str> = Vec::new();
        let mut in_tag = false;
        for segment in self.body.segments() {
            match segment {
                Segment::Literal(s) => in_tag = markup::ends_inside_tag(s, in_tag),
                Segment::Token(t) => {
                    if in_tag && !found.contains(&t.as_str()) {
                        found.push(t.as_str());
                    }
                }
            }
        }
        found
    }
}

fn render_plain(parsed: &ParsedText, bindings: &[Binding]) -> String {
    parsed.render(|token| find(bindings, token).map(|b| Cow::Borrowed(b.display.as_str())))
}

fn render_body(parsed: &ParsedText, bindings: &[Binding]) -> String {
    let mut out = String::new();
    let mut in_tag = false;

    for segment in parsed.segments() {
        match segment {
            Segment::Literal(s) => {
                out.push_str(s);
                in_tag = markup::ends_inside_tag(s, in_tag);
            }
            Segment::Token(t) => match find(bindings, t) {
                Some(b) if in_tag => out.push_str(&markup::escape(&b.display)),
                Some(b) => out.push_str(&markup::field_span(&b.key, &markup::escape(&b.display))),
                None => out.push_str(t),
            },
        }
    }

    out
}

/// Substitute field values into all three outputs of an assembly.
pub fn resolve_placeholders(
    assembly: &Assembly,
    template: &Template,
    values: &FieldValues,
    agent_name: &str,
) -> Resolved {
    ParsedAssembly::new(assembly, template).resolve(&bindings(template, values, agent_name))
}

/// Bring the field spans already on `surface` up to date, touching only the
/// spans whose displayed value differs. Returns the keys that were updated.
pub fn reconcile_rich_surface<S: RichSurface + ?Sized>(
    surface: &mut S,
    template: &Template,
    values: &FieldValues,
    agent_name: &str,
) -> Vec<String> {
    reconcile_with_bindings(surface, &bindings(template, values, agent_name))
}

pub(crate) fn reconcile_with_bindings<S: RichSurface + ?Sized>(
    surface: &mut S,
    bindings: &[Binding],
) -> Vec<String> {
    let mut updated = Vec::new();
    let mut seen: Vec<&str> = Vec::new();
    for binding in bindings {
        // the first binding for a key owns its spans
        if seen.contains(&binding.key.as_str()) {
            continue;
        }
        seen.push(&binding.key);
        match surface.field_text(&binding.key) {
            Some(current) if current != binding.display => {
                surface.update_field(&binding.key, &binding.display);
                tracing::debug!(key = %binding.key, "updated field spans");
                updated.push(binding.key.clone());
            }
            _ => {}
        }
    }
    updated
}
