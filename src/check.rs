use crate::template::{AGENT_NAME_KEY, AGENT_NAME_TOKEN, Template, TemplateLibrary};
use crate::token::brace_markers;
use serde::Serialize;
use std::collections::HashSet;

/// Result of checking the template library for issues
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckResult {
    pub duplicate_fields: Vec<DuplicateField>,
    pub reserved_fields: Vec<ReservedField>,
    pub shared_tokens: Vec<SharedToken>,
    pub unknown_markers: Vec<UnknownMarker>,
    pub empty_parts: Vec<EmptyPart>,
    pub ok: bool,
}

/// A field key declared more than once in one template
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateField {
    pub template: String,
    pub key: String,
}

/// A declared field using the key reserved for the agent name
#[derive(Debug, Clone, Serialize)]
pub struct ReservedField {
    pub template: String,
    pub key: String,
}

/// A domain token bound to more than one field of a template
#[derive(Debug, Clone, Serialize)]
pub struct SharedToken {
    pub template: String,
    pub token: String,
    pub keys: Vec<String>,
}

/// A `{{...}}` marker in a variant that matches no declared token.
/// It will be left in the output verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct UnknownMarker {
    pub template: String,
    pub marker: String,
}

/// A part of a template with no variants to choose from
#[derive(Debug, Clone, Serialize)]
pub struct EmptyPart {
    pub template: String,
    pub part: String,
}

/// Check for field keys declared twice in the same template
pub fn check_duplicate_fields(library: &TemplateLibrary) -> Vec<DuplicateField> {
    let mut duplicates = Vec::new();

    for template in library.templates() {
        let mut seen = HashSet::new();
        for field in &template.fields {
            if !seen.insert(field.key.as_str()) {
                duplicates.push(DuplicateField {
                    template: template.id.clone(),
                    key: field.key.clone(),
                });
            }
        }
    }

    duplicates
}

/// Check for declared fields that take the agent name's key
pub fn check_reserved_fields(library: &TemplateLibrary) -> Vec<ReservedField> {
    library
        .templates()
        .filter(|t| t.has_field(AGENT_NAME_KEY))
        .map(|t| ReservedField {
            template: t.id.clone(),
            key: AGENT_NAME_KEY.to_string(),
        })
        .collect()
}

/// Check for tokens claimed by two distinct fields (or by a field and the
/// agent name)
pub fn check_shared_tokens(library: &TemplateLibrary) -> Vec<SharedToken> {
    let mut shared = Vec::new();

    for template in library.templates() {
        let mut by_token: Vec<(&str, Vec<String>)> = Vec::new();
        for field in &template.fields {
            let Some(token) = field.token() else {
                continue;
            };
            match by_token.iter_mut().find(|(t, _)| *t == token) {
                Some((_, keys)) => {
                    if !keys.contains(&field.key) {
                        keys.push(field.key.clone());
                    }
                }
                None => by_token.push((token, vec![field.key.clone()])),
            }
        }

        for (token, keys) in by_token {
            let agent_clash = token == AGENT_NAME_TOKEN;
            if keys.len() > 1 || agent_clash {
                shared.push(SharedToken {
                    template: template.id.clone(),
                    token: token.to_string(),
                    keys,
                });
            }
        }
    }

    shared
}

/// Check for `{{...}}` markers that no field resolves
pub fn check_unknown_markers(library: &TemplateLibrary) -> Vec<UnknownMarker> {
    let mut unknown = Vec::new();

    for template in library.templates() {
        let tokens = template.tokens();
        let mut reported: HashSet<&str> = HashSet::new();
        for text in template.variant_texts() {
            for marker in brace_markers(text) {
                if !tokens.contains(&marker) && reported.insert(marker) {
                    unknown.push(UnknownMarker {
                        template: template.id.clone(),
                        marker: marker.to_string(),
                    });
                }
            }
        }
    }

    unknown
}

/// Check for parts that would assemble to an empty string
pub fn check_empty_parts(library: &TemplateLibrary) -> Vec<EmptyPart> {
    let mut empty = Vec::new();

    for template in library.templates() {
        let mut push = |part: String| {
            empty.push(EmptyPart {
                template: template.id.clone(),
                part,
            })
        };
        if template.subject.variants.is_empty() {
            push("subject".to_string());
        }
        if template.case_comment.variants.is_empty() {
            push("case_comment".to_string());
        }
        for (i, block) in template.body.iter().enumerate() {
            if block.variants.is_empty() {
                push(block_name(template, i));
            }
        }
    }

    empty
}

fn block_name(template: &Template, index: usize) -> String {
    match template.body.get(index).map(|b| b.label.as_str()) {
        Some(label) if !label.is_empty() => format!("body block '{}'", label),
        _ => format!("body block {}", index + 1),
    }
}

/// Run all checks and return a summary
pub fn check_all(library: &TemplateLibrary) -> CheckResult {
    let duplicate_fields = check_duplicate_fields(library);
    let reserved_fields = check_reserved_fields(library);
    let shared_tokens = check_shared_tokens(library);
    let unknown_markers = check_unknown_markers(library);
    let empty_parts = check_empty_parts(library);

    // Unknown markers and empty parts still render; only ambiguous field
    // bindings make the library invalid
    let ok = duplicate_fields.is_empty() && reserved_fields.is_empty() && shared_tokens.is_empty();

    CheckResult {
        duplicate_fields,
        reserved_fields,
        shared_tokens,
        unknown_markers,
        empty_parts,
        ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::BodyBlock;
    use crate::test_helpers::{make_field, make_template, sample_library};

    #[test]
    fn test_sample_library_is_clean() {
        let result = check_all(&sample_library());
        assert!(result.ok);
        assert!(result.duplicate_fields.is_empty());
        assert!(result.unknown_markers.is_empty());
        assert!(result.empty_parts.is_empty());
    }

    #[test]
    fn test_empty_library_is_ok() {
        let result = check_all(&TemplateLibrary::new());
        assert!(result.ok);
    }

    #[test]
    fn test_detects_duplicate_field() {
        let mut t = make_template("t1", "Hello {{a}}");
        t.fields = vec![make_field("a", "{{a}}"), make_field("a", "{{a}}")];
        let result = check_all(&TemplateLibrary::from_templates([t]));
        assert_eq!(result.duplicate_fields.len(), 1);
        assert_eq!(result.duplicate_fields[0].key, "a");
        assert!(!result.ok);
    }

    #[test]
    fn test_detects_shared_token() {
        let mut t = make_template("t1", "Hello {{x}}");
        t.fields = vec![make_field("a", "{{x}}"), make_field("b", "{{x}}")];
        let shared = check_shared_tokens(&TemplateLibrary::from_templates([t]));
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].token, "{{x}}");
        assert_eq!(shared[0].keys, vec!["a", "b"]);
    }

    #[test]
    fn test_field_claiming_agent_token_is_reported() {
        let mut t = make_template("t1", "Hi");
        t.fields = vec![make_field("me", AGENT_NAME_TOKEN)];
        let shared = check_shared_tokens(&TemplateLibrary::from_templates([t]));
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].keys, vec!["me"]);
    }

    #[test]
    fn test_field_using_agent_key_is_an_error() {
        let mut t = make_template("t1", "{{sig}} / {{agent.name}}");
        t.fields = vec![make_field(AGENT_NAME_KEY, "{{sig}}")];
        let result = check_all(&TemplateLibrary::from_templates([t]));
        assert_eq!(result.reserved_fields.len(), 1);
        assert_eq!(result.reserved_fields[0].template, "t1");
        assert!(result.shared_tokens.is_empty());
        assert!(!result.ok);
    }

    #[test]
    fn test_detects_unknown_marker_once() {
        let mut t = make_template("t1", "{{typo}} and {{typo}} and {{a}} by {{agent.name}}");
        t.fields = vec![make_field("a", "{{a}}")];
        let unknown = check_unknown_markers(&TemplateLibrary::from_templates([t]));
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].marker, "{{typo}}");
    }

    #[test]
    fn test_unknown_markers_are_warnings() {
        let t = make_template("t1", "Hello {{nobody}}");
        let result = check_all(&TemplateLibrary::from_templates([t]));
        assert_eq!(result.unknown_markers.len(), 1);
        assert!(result.ok);
    }

    #[test]
    fn test_detects_empty_parts() {
        let mut t = make_template("t1", "Hi");
        t.case_comment = Default::default();
        t.body.push(BodyBlock {
            label: "Closing".to_string(),
            variants: vec![],
        });
        let empty = check_empty_parts(&TemplateLibrary::from_templates([t]));
        let parts: Vec<&str> = empty.iter().map(|e| e.part.as_str()).collect();
        assert_eq!(parts, vec!["case_comment", "body block 'Closing'"]);
    }
}
