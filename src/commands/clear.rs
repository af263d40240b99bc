use anyhow::Result;
use std::path::Path;

/// Forget the selected template and all field values.
pub fn run(dir: &Path, profile_dir: &Path) -> Result<()> {
    let (_config, mut session) = super::open_session(dir, profile_dir)?;
    session.clear_session();
    println!("Session cleared");
    Ok(())
}
