//! Output ports: where the controller renders to.
//!
//! The controller never touches a concrete UI. It writes the subject and
//! case comment as plain strings, drives the body through a [`RichSurface`],
//! and reports user-visible feedback as [`Notice`]s.

use serde::Serialize;
use std::fmt;

use crate::surface::{MarkupSurface, RichSurface};

/// Named output surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputKind {
    Subject,
    Body,
    #[value(alias = "comment")]
    CaseComment,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputKind::Subject => "subject",
            OutputKind::Body => "body",
            OutputKind::CaseComment => "case comment",
        })
    }
}

/// Feedback for the user (toasts and alerts in a graphical front end)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Notice {
    Copied { output: OutputKind, rich: bool },
    CopyFailed { output: OutputKind, reason: String },
    ImportRejected { reason: String },
    Imported { fields: usize },
    UnknownTemplate { id: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Copied { output, rich: true } => write!(f, "Copied {} (rich text)", output),
            Notice::Copied { output, rich: false } => write!(f, "Copied {}", output),
            Notice::CopyFailed { output, reason } => {
                write!(f, "Could not copy {}: {}", output, reason)
            }
            Notice::ImportRejected { reason } => write!(f, "Import rejected: {}", reason),
            Notice::Imported { fields } => write!(f, "Imported {} field values", fields),
            Notice::UnknownTemplate { id } => write!(f, "Unknown template '{}'", id),
        }
    }
}

pub trait OutputPorts {
    type Body: RichSurface;

    fn render_subject(&mut self, subject: &str);

    fn render_case_comment(&mut self, comment: &str);

    fn body(&mut self) -> &mut Self::Body;

    fn body_ref(&self) -> &Self::Body;

    fn subject(&self) -> &str;

    fn case_comment(&self) -> &str;

    /// Blank every output.
    fn clear(&mut self) {
        self.render_subject("");
        self.render_case_comment("");
        self.body().set_html("");
    }

    fn notify(&mut self, _notice: Notice) {}
}

/// Headless ports that keep everything in memory
#[derive(Debug, Default)]
pub struct MemoryPorts {
    subject: String,
    case_comment: String,
    body: MarkupSurface,
    notices: Vec<Notice>,
}

impl MemoryPorts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl OutputPorts for MemoryPorts {
    type Body = MarkupSurface;

    fn render_subject(&mut self, subject: &str) {
        self.subject = subject.to_string();
    }

    fn render_case_comment(&mut self, comment: &str) {
        self.case_comment = comment.to_string();
    }

    fn body(&mut self) -> &mut MarkupSurface {
        &mut self.body
    }

    fn body_ref(&self) -> &MarkupSurface {
        &self.body
    }

    fn subject(&self) -> &str {
        &self.subject
    }

    fn case_comment(&self) -> &str {
        &self.case_comment
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_blanks_all_outputs() {
        let mut ports = MemoryPorts::new();
        ports.render_subject("s");
        ports.render_case_comment("c");
        ports.body().set_html("<p>b</p>");
        ports.clear();
        assert_eq!(ports.subject(), "");
        assert_eq!(ports.case_comment(), "");
        assert_eq!(ports.body_ref().html(), "");
    }

    #[test]
    fn test_notice_display() {
        let n = Notice::CopyFailed {
            output: OutputKind::Body,
            reason: "denied".to_string(),
        };
        assert_eq!(n.to_string(), "Could not copy body: denied");
        assert_eq!(
            Notice::Copied {
                output: OutputKind::CaseComment,
                rich: false
            }
            .to_string(),
            "Copied case comment"
        );
    }
}
