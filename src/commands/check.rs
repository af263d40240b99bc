use anyhow::Result;
use mailgen::check::{
    DuplicateField, EmptyPart, ReservedField, SharedToken, UnknownMarker, check_all,
};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct CheckJsonOutput {
    ok: bool,
    duplicate_fields: Vec<DuplicateField>,
    reserved_fields: Vec<ReservedField>,
    shared_tokens: Vec<SharedToken>,
    unknown_markers: Vec<UnknownMarker>,
    empty_parts: Vec<EmptyPart>,
    template_count: usize,
    warnings: usize,
    errors: usize,
}

pub fn run(dir: &Path, json: bool) -> Result<()> {
    let (_config, library) = super::load_library(dir)?;
    let result = check_all(&library);

    let warnings = result.unknown_markers.len() + result.empty_parts.len();
    let errors = result.duplicate_fields.len()
        + result.reserved_fields.len()
        + result.shared_tokens.len();

    if json {
        let output = CheckJsonOutput {
            ok: result.ok,
            duplicate_fields: result.duplicate_fields,
            reserved_fields: result.reserved_fields,
            shared_tokens: result.shared_tokens,
            unknown_markers: result.unknown_markers,
            empty_parts: result.empty_parts,
            template_count: library.len(),
            warnings,
            errors,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    // Unknown markers are warnings (they stay in the output as typed)
    if !result.unknown_markers.is_empty() {
        eprintln!("Warning: Markers that match no field:");
        for unknown in &result.unknown_markers {
            eprintln!("  {}: {}", unknown.template, unknown.marker);
        }
    }

    if !result.empty_parts.is_empty() {
        eprintln!("Warning: Parts with no variants (will render empty):");
        for empty in &result.empty_parts {
            eprintln!("  {}: {}", empty.template, empty.part);
        }
    }

    if !result.duplicate_fields.is_empty() {
        eprintln!("Error: Duplicate field keys:");
        for dup in &result.duplicate_fields {
            eprintln!("  {}: {}", dup.template, dup.key);
        }
    }

    if !result.reserved_fields.is_empty() {
        eprintln!("Error: Fields using the reserved agent name key:");
        for reserved in &result.reserved_fields {
            eprintln!("  {}: {}", reserved.template, reserved.key);
        }
    }

    if !result.shared_tokens.is_empty() {
        eprintln!("Error: Tokens bound to more than one field:");
        for shared in &result.shared_tokens {
            eprintln!(
                "  {}: {} ({})",
                shared.template,
                shared.token,
                if shared.keys.len() > 1 {
                    shared.keys.join(", ")
                } else {
                    format!("{} and the agent name", shared.keys.join(", "))
                }
            );
        }
    }

    if errors > 0 {
        anyhow::bail!("Found {} error(s) and {} warning(s)", errors, warnings);
    } else if warnings > 0 {
        println!("Library OK: {} templates, {} warning(s)", library.len(), warnings);
    } else {
        println!("Library OK: {} templates, no issues found", library.len());
    }

    Ok(())
}
