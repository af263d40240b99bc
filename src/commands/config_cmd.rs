//! Configuration management commands

use anyhow::Result;
use mailgen::config::Config;
use std::path::Path;

/// Show current configuration
pub fn show(dir: &Path, json: bool) -> Result<()> {
    let config = Config::load(dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("mailgen Configuration");
        println!("=====================");
        println!();
        println!("[library]");
        println!("  path = \"{}\"", config.library.path);
        println!("  (resolved: {})", config.library_dir(dir).display());
        println!();
        println!("[session]");
        let pinned: Vec<String> = config
            .session
            .pinned_fields
            .iter()
            .map(|k| format!("\"{}\"", k))
            .collect();
        println!("  pinned_fields = [{}]", pinned.join(", "));
        println!();
        println!("[output]");
        println!("  rich_copy = {}", config.output.rich_copy);
    }

    Ok(())
}

/// Initialize default config file
pub fn init(dir: &Path) -> Result<()> {
    if Config::init(dir)? {
        println!("Created default configuration at {}", dir.join("config.toml").display());
    } else {
        println!("Configuration already exists at {}", dir.join("config.toml").display());
    }
    Ok(())
}

/// Update configuration values
pub fn update(
    dir: &Path,
    library: Option<&str>,
    pin: &[String],
    unpin: &[String],
    rich_copy: Option<bool>,
) -> Result<()> {
    if !dir.exists() {
        anyhow::bail!("mailgen not initialized. Run 'mailgen init' first.");
    }
    let mut config = Config::load(dir)?;
    let mut changed = false;

    if let Some(path) = library {
        config.library.path = path.to_string();
        println!("Set library.path = \"{}\"", path);
        changed = true;
    }

    for key in pin {
        if !config.session.pinned_fields.contains(key) {
            config.session.pinned_fields.push(key.clone());
            println!("Pinned field '{}'", key);
            changed = true;
        }
    }

    for key in unpin {
        let before = config.session.pinned_fields.len();
        config.session.pinned_fields.retain(|k| k != key);
        if config.session.pinned_fields.len() != before {
            println!("Unpinned field '{}'", key);
            changed = true;
        }
    }

    if let Some(rich) = rich_copy {
        config.output.rich_copy = rich;
        println!("Set output.rich_copy = {}", rich);
        changed = true;
    }

    if changed {
        config.save(dir)?;
    } else {
        println!("No changes specified. Use --show to view current config.");
    }

    Ok(())
}
