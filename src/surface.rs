//! The rich-text body surface.
//!
//! A real editor widget sits behind [`RichSurface`]; [`MarkupSurface`] is the
//! headless implementation used by the CLI and the tests. It keeps the body
//! as an HTML string and edits field spans in place, leaving everything
//! outside them (including formatting the user applied) untouched.

use crate::markup;

pub trait RichSurface {
    /// Replace the whole document.
    fn set_html(&mut self, html: &str);

    fn html(&self) -> String;

    fn text(&self) -> String {
        markup::to_plain_text(&self.html())
    }

    /// Replace the text content of every span tagged with `key`.
    /// Returns how many spans were updated.
    fn update_field(&mut self, key: &str, text: &str) -> usize;

    /// Text content of the first span tagged with `key`, if any, with
    /// whitespace kept as stored.
    fn field_text(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupSurface {
    html: String,
    full_renders: usize,
    targeted_updates: usize,
}

impl MarkupSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of whole-document replacements so far.
    pub fn full_renders(&self) -> usize {
        self.full_renders
    }

    /// Number of spans rewritten by targeted updates so far.
    pub fn targeted_updates(&self) -> usize {
        self.targeted_updates
    }

    /// Apply an edit the user makes directly in the editor.
    pub fn edit_html<F: FnOnce(&str) -> String>(&mut self, edit: F) {
        self.html = edit(&self.html);
    }
}

impl RichSurface for MarkupSurface {
    fn set_html(&mut self, html: &str) {
        self.html = html.to_string();
        self.full_renders += 1;
    }

    fn html(&self) -> String {
        self.html.clone()
    }

    fn update_field(&mut self, key: &str, text: &str) -> usize {
        let ranges = markup::field_span_ranges(&self.html, key);
        if ranges.is_empty() {
            return 0;
        }

        let escaped = markup::escape(text);
        // back to front so earlier offsets stay valid
        for (start, end) in ranges.iter().rev() {
            self.html.replace_range(*start..*end, &escaped);
        }
        self.targeted_updates += ranges.len();
        ranges.len()
    }

    fn field_text(&self, key: &str) -> Option<String> {
        markup::field_span_ranges(&self.html, key)
            .first()
            .map(|(start, end)| markup::inner_text(&self.html[*start..*end]))
    }
}
