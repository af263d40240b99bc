use anyhow::Result;
use std::path::Path;

/// Show or set the agent display name.
pub fn run(dir: &Path, profile_dir: &Path, name: Option<&str>, json: bool) -> Result<()> {
    let (_config, mut session) = super::open_session(dir, profile_dir)?;

    if let Some(name) = name {
        session.edit_agent_name(name);
    }

    let current = &session.profile().display_name;
    if json {
        println!("{}", serde_json::json!({ "agent_name": current }));
    } else if current.is_empty() {
        println!("Agent name not set");
    } else if name.is_some() {
        println!("Agent name set to '{}'", current);
    } else {
        println!("{}", current);
    }
    Ok(())
}
