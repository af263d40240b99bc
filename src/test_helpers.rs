use crate::clipboard::{Clipboard, ClipboardError};
use crate::config::Config;
use crate::starter::{STARTER_FILE, STARTER_LIBRARY, starter_library};
use crate::template::{BodyBlock, Field, InputType, Template, TemplateLibrary};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};

/// Create a text field bound to `token`.
pub fn make_field(key: &str, token: &str) -> Field {
    Field {
        key: key.to_string(),
        label: key.to_string(),
        input_type: InputType::Text,
        placeholder_example: None,
        domain_token: Some(token.to_string()),
    }
}

/// Create a template with no fields whose subject, single body block and
/// case comment all read `text`.
pub fn make_template(id: &str, text: &str) -> Template {
    Template {
        id: id.to_string(),
        name: id.to_string(),
        category: String::new(),
        fields: Vec::new(),
        subject: [text].into_iter().collect(),
        body: vec![BodyBlock {
            label: "Body".to_string(),
            variants: vec![text.to_string()],
        }],
        case_comment: [text].into_iter().collect(),
    }
}

/// The starter library (payment-missing, refund-issued, password-reset).
pub fn sample_library() -> TemplateLibrary {
    starter_library().unwrap()
}

/// Deterministic rng for assembly.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Create a `.mailgen` directory at `dir` with a default config and the
/// starter library, and return the library directory.
pub fn setup_mailgen(dir: &Path) -> PathBuf {
    setup_mailgen_with(dir, STARTER_LIBRARY)
}

/// Like [`setup_mailgen`], with `library_toml` as the only library file.
pub fn setup_mailgen_with(dir: &Path, library_toml: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    Config::init(dir).unwrap();
    let library_dir = Config::default().library_dir(dir);
    std::fs::create_dir_all(&library_dir).unwrap();
    std::fs::write(library_dir.join(STARTER_FILE), library_toml).unwrap();
    library_dir
}

/// Records what was copied; can be told to refuse rich or all writes.
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    pub refuse_rich: bool,
    pub refuse_all: bool,
    pub rich: Vec<String>,
    pub text: Vec<String>,
}

impl RecordingClipboard {
    pub fn plain_only() -> Self {
        Self {
            refuse_rich: true,
            ..Self::default()
        }
    }

    pub fn broken() -> Self {
        Self {
            refuse_rich: true,
            refuse_all: true,
            ..Self::default()
        }
    }
}

impl Clipboard for RecordingClipboard {
    fn write_rich(&mut self, html: &str, _text: &str) -> Result<(), ClipboardError> {
        if self.refuse_rich {
            return Err(ClipboardError::RichUnsupported);
        }
        self.rich.push(html.to_string());
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.refuse_all {
            return Err(ClipboardError::Write("permission denied".to_string()));
        }
        self.text.push(text.to_string());
        Ok(())
    }
}
