use anyhow::{Context, Result};
use mailgen::config::Config;
use mailgen::starter::{STARTER_FILE, STARTER_LIBRARY};
use std::fs;
use std::path::Path;

/// Default content for .mailgen/.gitignore
const GITIGNORE_CONTENT: &str = r#"# mailgen gitignore
# In-progress session (customer data)
session.json
.session.json.tmp.*

# Exports
*.export.json
"#;

pub fn run(dir: &Path) -> Result<()> {
    if dir.exists() {
        anyhow::bail!("mailgen already initialized at {}", dir.display());
    }

    fs::create_dir_all(dir).context("Failed to create mailgen directory")?;
    Config::init(dir)?;

    let library_dir = Config::load(dir)?.library_dir(dir);
    fs::create_dir_all(&library_dir).context("Failed to create templates directory")?;
    fs::write(library_dir.join(STARTER_FILE), STARTER_LIBRARY)
        .context("Failed to write starter templates")?;

    // Keep session data out of version control
    let gitignore_path = dir.join(".gitignore");
    fs::write(&gitignore_path, GITIGNORE_CONTENT).context("Failed to create .gitignore")?;

    println!("Initialized mailgen at {}", dir.display());
    println!("Starter templates written to {}", library_dir.join(STARTER_FILE).display());
    Ok(())
}
