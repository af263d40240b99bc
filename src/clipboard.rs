//! Copying outputs to a clipboard.
//!
//! The body has rich (HTML) content; copying it tries the rich path first and
//! falls back to plain text once. Subject and case comment are plain text
//! only. A failure never changes the document.

use std::io::Write;
use thiserror::Error;

use crate::ports::OutputKind;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("rich text is not supported by this clipboard")]
    RichUnsupported,
    #[error("clipboard write failed: {0}")]
    Write(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait Clipboard {
    fn write_rich(&mut self, html: &str, text: &str) -> Result<(), ClipboardError>;

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// How a copy ended up being performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Rich,
    Plain,
}

/// Copy one output. `html` is only consulted for the body.
pub fn copy_output<C: Clipboard + ?Sized>(
    clipboard: &mut C,
    output: OutputKind,
    html: &str,
    text: &str,
) -> Result<CopyOutcome, ClipboardError> {
    if output == OutputKind::Body && !html.is_empty() {
        match clipboard.write_rich(html, text) {
            Ok(()) => return Ok(CopyOutcome::Rich),
            Err(e) => {
                tracing::warn!(error = %e, "rich copy failed, retrying as plain text");
            }
        }
    }
    clipboard.write_text(text)?;
    Ok(CopyOutcome::Plain)
}

/// Writes copied content to a stream; the CLI uses stdout.
pub struct WriterClipboard<W: Write> {
    writer: W,
    rich: bool,
}

impl<W: Write> WriterClipboard<W> {
    /// `rich` selects whether HTML is written for rich copies.
    pub fn new(writer: W, rich: bool) -> Self {
        Self { writer, rich }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Clipboard for WriterClipboard<W> {
    fn write_rich(&mut self, html: &str, _text: &str) -> Result<(), ClipboardError> {
        if !self.rich {
            return Err(ClipboardError::RichUnsupported);
        }
        writeln!(self.writer, "{}", html)?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        writeln!(self.writer, "{}", text)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_copies_rich_when_supported() {
        let mut cb = WriterClipboard::new(Vec::new(), true);
        let outcome = copy_output(&mut cb, OutputKind::Body, "<p>Hi</p>", "Hi").unwrap();
        assert_eq!(outcome, CopyOutcome::Rich);
        assert_eq!(String::from_utf8(cb.into_inner()).unwrap(), "<p>Hi</p>\n");
    }

    #[test]
    fn test_body_falls_back_to_plain() {
        let mut cb = WriterClipboard::new(Vec::new(), false);
        let outcome = copy_output(&mut cb, OutputKind::Body, "<p>Hi</p>", "Hi").unwrap();
        assert_eq!(outcome, CopyOutcome::Plain);
        assert_eq!(String::from_utf8(cb.into_inner()).unwrap(), "Hi\n");
    }

    #[test]
    fn test_subject_is_always_plain() {
        let mut cb = WriterClipboard::new(Vec::new(), true);
        let outcome = copy_output(&mut cb, OutputKind::Subject, "ignored", "Case #1").unwrap();
        assert_eq!(outcome, CopyOutcome::Plain);
        assert_eq!(String::from_utf8(cb.into_inner()).unwrap(), "Case #1\n");
    }
}
