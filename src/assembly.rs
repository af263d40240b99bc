//! Random variant selection.
//!
//! An [`Assembly`] is the chosen, not-yet-substituted text of one email. It is
//! recomputed only when the template changes or a shuffle is requested, so
//! that edits never re-randomize the wording.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::template::Template;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Assembly {
    pub subject: String,
    pub body: String,
    pub case_comment: String,
}

/// Assemble a template. An absent template yields an absent assembly.
pub fn assemble<R: Rng + ?Sized>(template: Option<&Template>, rng: &mut R) -> Option<Assembly> {
    template.map(|t| assemble_template(t, rng))
}

pub fn assemble_template<R: Rng + ?Sized>(template: &Template, rng: &mut R) -> Assembly {
    let subject = pick(&template.subject.variants, rng).to_string();
    let body: String = template
        .body
        .iter()
        .map(|block| pick(&block.variants, rng))
        .collect();
    let case_comment = pick(&template.case_comment.variants, rng).to_string();

    Assembly {
        subject,
        body,
        case_comment,
    }
}

/// Uniform choice; an empty slot yields "".
fn pick<'a, R: Rng + ?Sized>(variants: &'a [String], rng: &mut R) -> &'a str {
    variants.choose(rng).map(String::as_str).unwrap_or("")
}
