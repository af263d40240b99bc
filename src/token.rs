//! Structural parse of variant text into literal and token runs.
//!
//! Only tokens the template declares are recognised, and they are matched
//! verbatim: there is no pattern syntax, so a token may contain any
//! characters. When several declared tokens start at the same position the
//! longest one wins.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// One run of parsed text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Segment {
    Literal(String),
    Token(String),
}

/// Text split into runs against a fixed token set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedText {
    segments: Vec<Segment>,
}

impl ParsedText {
    pub fn parse<S: AsRef<str>>(text: &str, tokens: &[S]) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = text;

        while !rest.is_empty() {
            let matched = tokens
                .iter()
                .map(|t| -> &str { t.as_ref() })
                .filter(|t| !t.is_empty() && rest.starts_with(*t))
                .max_by_key(|t| t.len());

            if let Some(token) = matched {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Token(token.to_string()));
                rest = &rest[token.len()..];
                continue;
            }

            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                literal.push(c);
            }
            rest = chars.as_str();
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Distinct tokens in order of first occurrence.
    pub fn tokens(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Token(t) = segment
                && !seen.contains(&t.as_str())
            {
                seen.push(t.as_str());
            }
        }
        seen
    }

    /// Rewrite every token run with `resolve`; tokens it returns `None` for
    /// are emitted verbatim.
    pub fn render<'v, F>(&self, mut resolve: F) -> String
    where
        F: FnMut(&str) -> Option<Cow<'v, str>>,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Token(t) => match resolve(t) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(t),
                },
            }
        }
        out
    }

    /// The original text.
    pub fn raw(&self) -> String {
        self.render(|_| None)
    }
}

/// Find `{{...}}` style markers in text. Used to report markers that no
/// field declares.
pub fn brace_markers(text: &str) -> Vec<&str> {
    let mut markers = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        let Some(close_rel) = rest[open + 2..].find("}}") else {
            break;
        };
        let close = open + 2 + close_rel;
        // innermost opener, so "{{a {{b}}" yields "{{b}}"
        let open = rest[..close].rfind("{{").unwrap_or(open);
        markers.push(&rest[open..close + 2]);
        rest = &rest[close + 2..];
    }

    markers
}
