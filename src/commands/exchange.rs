//! Export and import of field values

use anyhow::{Context, Result};
use mailgen::persist::write_atomic;
use std::fs;
use std::path::Path;

/// Write the current field values as an export document, to `output` or stdout.
pub fn export(dir: &Path, profile_dir: &Path, output: Option<&Path>) -> Result<()> {
    let (_config, session) = super::open_session(dir, profile_dir)?;
    let json = session
        .export_values()
        .context("Failed to serialize field values")?;

    match output {
        Some(path) => {
            write_atomic(path, json.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "Exported {} field values to {}",
                session.values().len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Replace the field values with those in `file`. A malformed file leaves
/// the session untouched.
pub fn import(dir: &Path, profile_dir: &Path, file: &Path) -> Result<()> {
    let json = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let (_config, mut session) = super::open_session(dir, profile_dir)?;
    let result = session.import_values(&json);
    super::print_notices(&mut session);
    result.with_context(|| format!("Failed to import {}", file.display()))?;

    if let Some(template) = session.template() {
        println!("Template: {} ({})", template.id, template.name);
    }
    Ok(())
}
