use anyhow::Result;
use std::path::Path;

pub fn run(dir: &Path, profile_dir: &Path) -> Result<()> {
    let (_config, mut session) = super::open_session(dir, profile_dir)?;
    session.shuffle()?;
    if let Some(resolved) = session.resolved() {
        println!("{}", resolved.subject);
    }
    Ok(())
}
