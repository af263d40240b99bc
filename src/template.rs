//! Template library: the read-only data an email is assembled from.
//!
//! A library is a directory of `.toml`, `.yaml`/`.yml` or `.json` files. Each
//! file holds a list of templates under `template` (or `templates`):
//!
//! ```toml
//! [[template]]
//! id = "payment-missing"
//! name = "Payment not received"
//! category = "Billing"
//! subject = ["Case #{{case.number}}", "Your payment to {{biller.name}}"]
//! case_comment = "Advised {{customer.name}} to contact {{biller.name}}."
//!
//! [[template.fields]]
//! key = "case_number"
//! label = "Case number"
//! domain_token = "{{case.number}}"
//!
//! [[template.body]]
//! label = "Greeting"
//! variants = ["<p>Hello {{customer.name}},</p>", "<p>Hi {{customer.name}},</p>"]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Field key of the implicit agent-name field present in every template.
pub const AGENT_NAME_KEY: &str = "agent_name";

/// Domain token bound to the agent's display name.
pub const AGENT_NAME_TOKEN: &str = "{{agent.name}}";

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML error in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("YAML error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Template library not found at {0}")]
    NotFound(PathBuf),
}

/// Kind of input control a field is edited with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    #[default]
    Text,
    Email,
    Date,
    Number,
    Textarea,
    /// Anything this version does not know about renders as plain text
    #[serde(other)]
    Other,
}

/// A user-editable value, bound to zero or one domain token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, alias = "inputType")]
    pub input_type: InputType,
    #[serde(default, alias = "placeholderExample", skip_serializing_if = "Option::is_none")]
    pub placeholder_example: Option<String>,
    /// Marker inside variant text replaced by this field's value.
    /// Fields without one are display-only.
    #[serde(default, alias = "domainToken", skip_serializing_if = "Option::is_none")]
    pub domain_token: Option<String>,
}

impl Field {
    /// The domain token, if the field has a non-empty one.
    pub fn token(&self) -> Option<&str> {
        self.domain_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Label for prompts, falling back to the key.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VariantSetRepr {
    One(String),
    Many(Vec<String>),
    Table { variants: Vec<String> },
}

/// Ordered wording alternatives for one slot
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "VariantSetRepr", into = "Vec<String>")]
pub struct VariantSet {
    pub variants: Vec<String>,
}

impl From<VariantSetRepr> for VariantSet {
    fn from(repr: VariantSetRepr) -> Self {
        let variants = match repr {
            VariantSetRepr::One(s) => vec![s],
            VariantSetRepr::Many(v) => v,
            VariantSetRepr::Table { variants } => variants,
        };
        Self { variants }
    }
}

impl From<VariantSet> for Vec<String> {
    fn from(set: VariantSet) -> Self {
        set.variants
    }
}

impl<S: Into<String>> FromIterator<S> for VariantSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            variants: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// One section of the body, chosen independently of the others
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyBlock {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub subject: VariantSet,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<BodyBlock>,
    #[serde(default, alias = "caseComment")]
    pub case_comment: VariantSet,
}

impl Template {
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// Every non-empty domain token the template declares, plus the agent token.
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.fields.iter().filter_map(Field::token).collect();
        tokens.push(AGENT_NAME_TOKEN);
        tokens
    }

    /// All variant strings in the template, in declaration order.
    pub fn variant_texts(&self) -> impl Iterator<Item = &str> {
        self.subject
            .variants
            .iter()
            .chain(self.body.iter().flat_map(|b| b.variants.iter()))
            .chain(self.case_comment.variants.iter())
            .map(String::as_str)
    }
}

/// On-disk shape of a single library file
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LibraryFile {
    #[serde(default, rename = "template", alias = "templates")]
    pub templates: Vec<Template>,
}

/// Ordered collection of templates, keyed by id
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    templates: Vec<Template>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_templates(templates: impl IntoIterator<Item = Template>) -> Self {
        let mut library = Self::new();
        for template in templates {
            library.insert(template);
        }
        library
    }

    /// Insert a template, replacing any earlier template with the same id in place.
    pub fn insert(&mut self, template: Template) {
        if let Some(existing) = self.templates.iter_mut().find(|t| t.id == template.id) {
            tracing::warn!(
                id = %template.id,
                "duplicate template id (overwriting previous definition)"
            );
            *existing = template;
        } else {
            self.templates.push(template);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates grouped by category, categories in order of first appearance.
    /// Templates with no category are grouped under "Uncategorized".
    pub fn by_category(&self) -> Vec<(&str, Vec<&Template>)> {
        let mut groups: Vec<(&str, Vec<&Template>)> = Vec::new();
        for template in &self.templates {
            let category = if template.category.is_empty() {
                "Uncategorized"
            } else {
                template.category.as_str()
            };
            match groups.iter_mut().find(|(c, _)| *c == category) {
                Some((_, members)) => members.push(template),
                None => groups.push((category, vec![template])),
            }
        }
        groups
    }

    /// Load every library file under `dir`, in path order.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, LibraryError> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Err(LibraryError::NotFound(dir.to_path_buf()));
        }

        let mut library = Self::new();
        let entries = WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file());

        for entry in entries {
            let path = entry.path();
            if Format::of(path).is_none() {
                continue;
            }
            for template in load_file(path)?.templates {
                library.insert(template);
            }
        }

        tracing::debug!(count = library.len(), dir = %dir.display(), "loaded template library");
        Ok(library)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Yaml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Some(Format::Toml),
            Some("yaml") | Some("yml") => Some(Format::Yaml),
            Some("json") => Some(Format::Json),
            _ => None,
        }
    }
}

/// Parse a single library file. The format is chosen by extension; unknown
/// extensions are read as TOML.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<LibraryFile, LibraryError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match Format::of(path).unwrap_or(Format::Toml) {
        Format::Toml => toml::from_str(&content).map_err(|source| LibraryError::Toml {
            path: path.to_path_buf(),
            source,
        }),
        Format::Yaml => serde_yaml::from_str(&content).map_err(|source| LibraryError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
        Format::Json => serde_json::from_str(&content).map_err(|source| LibraryError::Json {
            path: path.to_path_buf(),
            source,
        }),
    }
}
