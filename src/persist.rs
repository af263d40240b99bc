//! Persistence adapter over two key-value stores.
//!
//! The durable store keeps the agent profile (`agent_name`, `theme`); the
//! session store keeps one JSON blob with the in-progress work. Every save is
//! best-effort: failures are logged and the in-memory state stays
//! authoritative.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::state::{AgentProfile, SessionState, Theme};

pub const AGENT_NAME_ENTRY: &str = "agent_name";
pub const THEME_ENTRY: &str = "theme";
pub const SESSION_ENTRY: &str = "session";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Serialize(serde_json::Error),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// A JSON object of string entries in one file, rewritten atomically on
/// every change.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|source| StoreError::Json {
                    path: path.clone(),
                    source,
                })?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    /// Open the store, starting empty if the file is unreadable.
    pub fn open_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self::open(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable store");
            Self {
                path: path.to_path_buf(),
                entries: BTreeMap::new(),
            }
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.entries).map_err(StoreError::Serialize)?;
        write_atomic(&self.path, json.as_bytes())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Write to a temporary file in the same directory, then rename over the
/// target so a crash mid-write leaves the previous content intact.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), StoreError> {
    let parent = path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("store");
    let tmp_path = parent.join(format!(".{}.tmp.{}", file_name, std::process::id()));

    let result = (|| -> Result<(), StoreError> {
        let mut file: File = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;
        file.write_all(content)?;
        file.flush()?;
        file.sync_all()?;
        Ok(())
    })();

    if result.is_ok() {
        std::fs::rename(&tmp_path, path)?;
    } else {
        let _ = std::fs::remove_file(&tmp_path);
    }

    result
}

/// Load/save over a durable and a session store
pub struct Persistence {
    durable: Box<dyn KeyValueStore>,
    session: Box<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(durable: Box<dyn KeyValueStore>, session: Box<dyn KeyValueStore>) -> Self {
        Self { durable, session }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()), Box::new(MemoryStore::new()))
    }

    /// Durable store at `profile_dir/profile.json`, session store at
    /// `session_dir/session.json`.
    pub fn on_disk(profile_dir: &Path, session_dir: &Path) -> Self {
        Self::new(
            Box::new(FileStore::open_or_empty(profile_dir.join("profile.json"))),
            Box::new(FileStore::open_or_empty(session_dir.join("session.json"))),
        )
    }

    pub fn load_profile(&self) -> AgentProfile {
        let display_name = self.durable.get(AGENT_NAME_ENTRY).unwrap_or_default();
        let theme = match self.durable.get(THEME_ENTRY) {
            Some(raw) => raw.parse::<Theme>().unwrap_or_else(|e: String| {
                tracing::warn!(error = %e, "ignoring stored theme");
                Theme::default()
            }),
            None => Theme::default(),
        };
        AgentProfile {
            display_name,
            theme,
        }
    }

    pub fn save_profile(&mut self, profile: &AgentProfile) {
        best_effort(
            "agent name",
            self.durable.set(AGENT_NAME_ENTRY, &profile.display_name),
        );
        best_effort("theme", self.durable.set(THEME_ENTRY, profile.theme.as_str()));
    }

    pub fn load_session(&self) -> Option<SessionState> {
        let raw = self.session.get(SESSION_ENTRY)?;
        match serde_json::from_str(&raw) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable session");
                None
            }
        }
    }

    pub fn save_session(&mut self, state: &SessionState) {
        match serde_json::to_string(state) {
            Ok(json) => best_effort("session", self.session.set(SESSION_ENTRY, &json)),
            Err(e) => tracing::warn!(error = %e, "failed to serialize session"),
        }
    }

    pub fn clear_session(&mut self) {
        best_effort("session", self.session.remove(SESSION_ENTRY));
    }
}

fn best_effort(what: &str, result: Result<(), StoreError>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "failed to persist {}", what);
    }
}
