pub mod agent;
pub mod check;
pub mod clear;
pub mod compose;
pub mod config_cmd;
pub mod copy;
pub mod exchange;
pub mod init;
pub mod select;
pub mod set;
pub mod show;
pub mod shuffle;
pub mod templates;
pub mod theme;

use std::path::Path;

use anyhow::{Context, Result};
use mailgen::config::Config;
use mailgen::controller::{Controller, ControllerOptions};
use mailgen::persist::Persistence;
use mailgen::ports::{MemoryPorts, Notice};
use mailgen::template::TemplateLibrary;
use rand::rngs::ThreadRng;

/// A controller restored from disk, rendering into memory.
pub type Session = Controller<MemoryPorts, ThreadRng>;

/// Load the template library named by the config in `dir`.
pub fn load_library(dir: &Path) -> Result<(Config, TemplateLibrary)> {
    if !dir.exists() {
        anyhow::bail!("mailgen not initialized. Run 'mailgen init' first.");
    }
    let config = Config::load(dir)?;
    let library_dir = config.library_dir(dir);
    let library = TemplateLibrary::load_dir(&library_dir)
        .with_context(|| format!("Failed to load templates from {}", library_dir.display()))?;
    Ok((config, library))
}

/// Load config and library, then restore the session from `dir` and the
/// agent profile from `profile_dir`.
pub fn open_session(dir: &Path, profile_dir: &Path) -> Result<(Config, Session)> {
    let (config, library) = load_library(dir)?;
    let persistence = Persistence::on_disk(profile_dir, dir);
    let options = ControllerOptions {
        pinned_fields: config.session.pinned_fields.clone(),
    };
    let session = Controller::start(
        library,
        persistence,
        MemoryPorts::new(),
        rand::thread_rng(),
        options,
    );
    Ok((config, session))
}

/// Print notices raised by the last operation to stderr.
pub fn print_notices(session: &mut Session) {
    for notice in session.ports_mut().take_notices() {
        match notice {
            Notice::Copied { .. } | Notice::Imported { .. } => eprintln!("{}", notice),
            _ => eprintln!("Warning: {}", notice),
        }
    }
}
