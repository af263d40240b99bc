//! Project configuration for mailgen
//!
//! Configuration is stored in `.mailgen/config.toml` and controls where the
//! template library lives, which field values survive a template switch, and
//! how outputs are copied.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Template library configuration
    #[serde(default)]
    pub library: LibraryConfig,

    /// Session behaviour
    #[serde(default)]
    pub session: SessionConfig,

    /// Output and copy behaviour
    #[serde(default)]
    pub output: OutputConfig,
}

/// Template library location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Library directory, relative to the mailgen directory unless absolute
    #[serde(default = "default_library_path")]
    pub path: String,
}

fn default_library_path() -> String {
    "templates".to_string()
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: default_library_path(),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Field keys whose values carry over when another template is selected
    #[serde(default = "default_pinned_fields")]
    pub pinned_fields: Vec<String>,
}

fn default_pinned_fields() -> Vec<String> {
    vec!["recipient_email".to_string()]
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pinned_fields: default_pinned_fields(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Copy the body as HTML when possible (falls back to plain text)
    #[serde(default = "default_rich_copy")]
    pub rich_copy: bool,
}

fn default_rich_copy() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            rich_copy: default_rich_copy(),
        }
    }
}

impl Config {
    /// Load configuration from .mailgen/config.toml
    /// Returns default config if file doesn't exist
    pub fn load(mailgen_dir: &Path) -> anyhow::Result<Self> {
        let config_path = mailgen_dir.join("config.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to read config: {}", e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))?;

        Ok(config)
    }

    /// Save configuration to .mailgen/config.toml
    pub fn save(&self, mailgen_dir: &Path) -> anyhow::Result<()> {
        let config_path = mailgen_dir.join("config.toml");

        let content = toml::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

        fs::write(&config_path, content)
            .map_err(|e| anyhow::anyhow!("Failed to write config: {}", e))?;

        Ok(())
    }

    /// Initialize default config file if it doesn't exist
    pub fn init(mailgen_dir: &Path) -> anyhow::Result<bool> {
        let config_path = mailgen_dir.join("config.toml");

        if config_path.exists() {
            return Ok(false); // Already exists
        }

        let config = Self::default();
        config.save(mailgen_dir)?;
        Ok(true) // Created new
    }

    /// Resolved template library directory
    pub fn library_dir(&self, mailgen_dir: &Path) -> PathBuf {
        let path = Path::new(&self.library.path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            mailgen_dir.join(path)
        }
    }

    /// Default location of the agent profile: ~/.config/mailgen
    pub fn default_profile_dir() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("mailgen"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.library.path, "templates");
        assert_eq!(config.session.pinned_fields, vec!["recipient_email"]);
        assert!(config.output.rich_copy);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.library.path, "templates");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();

        let mut config = Config::default();
        config.library.path = "/srv/canned".to_string();
        config.session.pinned_fields.push("customer_name".to_string());
        config.output.rich_copy = false;
        config.save(temp_dir.path()).unwrap();

        let loaded = Config::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.library.path, "/srv/canned");
        assert_eq!(
            loaded.session.pinned_fields,
            vec!["recipient_email", "customer_name"]
        );
        assert!(!loaded.output.rich_copy);
    }

    #[test]
    fn test_init_config() {
        let temp_dir = TempDir::new().unwrap();

        // First init should create file
        let created = Config::init(temp_dir.path()).unwrap();
        assert!(created);

        // Second init should not overwrite
        let created = Config::init(temp_dir.path()).unwrap();
        assert!(!created);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[session]
pinned_fields = []
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.session.pinned_fields.is_empty());
        assert_eq!(config.library.path, "templates");
        assert!(config.output.rich_copy);
    }

    #[test]
    fn test_library_dir_relative_and_absolute() {
        let base = Path::new("/tmp/project/.mailgen");
        let config = Config::default();
        assert_eq!(config.library_dir(base), base.join("templates"));

        let mut config = Config::default();
        config.library.path = "/opt/library".to_string();
        assert_eq!(config.library_dir(base), PathBuf::from("/opt/library"));
    }
}
