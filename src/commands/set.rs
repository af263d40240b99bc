use anyhow::Result;
use std::path::Path;

pub fn run(dir: &Path, profile_dir: &Path, key: &str, value: &str) -> Result<()> {
    let (_config, mut session) = super::open_session(dir, profile_dir)?;
    session.edit_field(key, value)?;
    println!("Set {} = {}", key, value);
    Ok(())
}
