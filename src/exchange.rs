//! Export and import of field values as a JSON document.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::FieldValues;

pub const EXPORT_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported export version {0}")]
    UnsupportedVersion(u32),
}

/// The exported document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    pub field_values: FieldValues,
}

impl ExportDocument {
    pub fn new(template_id: Option<&str>, field_values: &FieldValues) -> Self {
        Self {
            version: EXPORT_VERSION,
            exported_at: Some(Utc::now().to_rfc3339()),
            template_id: template_id.map(str::to_string),
            field_values: field_values.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportRepr {
    Document(ExportDocument),
    Bare(FieldValues),
}

/// Parse an import. Accepts an [`ExportDocument`] or a bare object of
/// string values; anything else is rejected.
pub fn parse_import(json: &str) -> Result<ExportDocument, ImportError> {
    // Parse to a value first so a syntax error is reported as such rather
    // than as "did not match any variant".
    let value: serde_json::Value = serde_json::from_str(json)?;
    let doc = match serde_json::from_value::<ImportRepr>(value.clone()) {
        Ok(ImportRepr::Document(doc)) => doc,
        Ok(ImportRepr::Bare(field_values)) => ExportDocument {
            version: EXPORT_VERSION,
            exported_at: None,
            template_id: None,
            field_values,
        },
        Err(_) => {
            // Re-run the strict shape to get a useful message.
            let err = serde_json::from_value::<FieldValues>(value)
                .err()
                .unwrap_or_else(|| serde::de::Error::custom("unrecognised document"));
            return Err(ImportError::Malformed(err));
        }
    };

    if doc.version > EXPORT_VERSION {
        return Err(ImportError::UnsupportedVersion(doc.version));
    }
    Ok(doc)
}
