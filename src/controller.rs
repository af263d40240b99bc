//! The form/output controller.
//!
//! Owns every piece of mutable state (selected template, current assembly,
//! field values, agent profile) and changes it only through its transitions.
//! Rendering goes out through [`OutputPorts`]; persistence through
//! [`Persistence`]. Both are injected, so the controller runs headless.
//!
//! ```text
//!                 select_template(known id)
//!   NoTemplateSelected ───────────────────────▶ TemplateSelected
//!          ▲                                     │  edit_field / shuffle /
//!          └──────── select_template(unknown) ───┘  edit_agent_name (self)
//! ```

use rand::Rng;
use thiserror::Error;

use crate::assembly::{Assembly, assemble_template};
use crate::clipboard::{Clipboard, ClipboardError, CopyOutcome, copy_output};
use crate::exchange::{ExportDocument, ImportError, parse_import};
use crate::persist::Persistence;
use crate::ports::{Notice, OutputKind, OutputPorts};
use crate::state::{AgentProfile, FieldValues, SessionState, Theme};
use crate::substitute::{Binding, ParsedAssembly, Resolved, bindings, reconcile_with_bindings};
use crate::surface::RichSurface;
use crate::template::{AGENT_NAME_KEY, Template, TemplateLibrary};

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("No template selected")]
    NoTemplateSelected,
    #[error("Template '{template}' has no field '{key}'")]
    UnknownField { template: String, key: String },
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),
}

/// Controller settings
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Field keys whose values survive a template switch
    pub pinned_fields: Vec<String>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            pinned_fields: vec!["recipient_email".to_string()],
        }
    }
}

/// The selected template and the wording chosen for it
#[derive(Debug, Clone)]
pub struct ActiveTemplate {
    template_id: String,
    assembly: Assembly,
    parsed: ParsedAssembly,
}

impl ActiveTemplate {
    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn assembly(&self) -> &Assembly {
        &self.assembly
    }
}

#[derive(Debug, Clone, Default)]
pub enum ControllerState {
    #[default]
    NoTemplateSelected,
    TemplateSelected(ActiveTemplate),
}

/// Input port: everything the outside world can ask of the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SelectTemplate(String),
    EditField { key: String, value: String },
    Shuffle,
    EditAgentName(String),
    ToggleTheme,
    Import(String),
}

pub struct Controller<P: OutputPorts, R: Rng> {
    library: TemplateLibrary,
    persistence: Persistence,
    ports: P,
    rng: R,
    pinned: Vec<String>,
    profile: AgentProfile,
    values: FieldValues,
    state: ControllerState,
}

impl<P: OutputPorts, R: Rng> Controller<P, R> {
    /// Build a controller and restore the previous session, if any.
    ///
    /// When the session names a template that still exists it is selected
    /// with the saved field values (and saved wording, when present) instead
    /// of a reset.
    pub fn start(
        library: TemplateLibrary,
        persistence: Persistence,
        ports: P,
        rng: R,
        options: ControllerOptions,
    ) -> Self {
        let profile = persistence.load_profile();
        let mut controller = Self {
            library,
            persistence,
            ports,
            rng,
            pinned: options.pinned_fields,
            profile,
            values: FieldValues::new(),
            state: ControllerState::NoTemplateSelected,
        };

        if let Some(session) = controller.persistence.load_session() {
            controller.restore(session);
        }
        controller
    }

    fn restore(&mut self, session: SessionState) {
        self.values = session.field_values;

        let Some(id) = session.template_id else {
            return;
        };
        let Some(template) = self.library.get(&id) else {
            tracing::warn!(id = %id, "session names a template that is no longer in the library");
            self.ports.clear();
            self.save_session();
            return;
        };

        let assembly = session
            .assembly
            .unwrap_or_else(|| assemble_template(template, &mut self.rng));
        let parsed = ParsedAssembly::new(&assembly, template);
        tracing::debug!(id = %id, "restored session");
        self.state = ControllerState::TemplateSelected(ActiveTemplate {
            template_id: id,
            assembly,
            parsed,
        });
        self.render_full();
        self.save_session();
    }

    /// Dispatch an input event.
    pub fn handle(&mut self, event: Event) -> Result<(), ControllerError> {
        match event {
            Event::SelectTemplate(id) => {
                self.select_template(&id);
                Ok(())
            }
            Event::EditField { key, value } => self.edit_field(&key, &value),
            Event::Shuffle => self.shuffle(),
            Event::EditAgentName(name) => {
                self.edit_agent_name(&name);
                Ok(())
            }
            Event::ToggleTheme => {
                self.toggle_theme();
                Ok(())
            }
            Event::Import(json) => self.import_values(&json),
        }
    }

    /// Select a template by id. Field values reset to the pinned set.
    /// An unknown id leaves no template selected and clears the outputs;
    /// returns whether the template was found.
    pub fn select_template(&mut self, id: &str) -> bool {
        if self.library.get(id).is_none() {
            tracing::warn!(id = %id, "unknown template");
            self.state = ControllerState::NoTemplateSelected;
            self.ports.clear();
            self.ports.notify(Notice::UnknownTemplate { id: id.to_string() });
            self.save_session();
            return false;
        }

        let pinned = &self.pinned;
        self.values.retain(|key, _| pinned.contains(key));
        self.activate_fresh(id);
        self.save_session();
        tracing::debug!(id = %id, carried = self.values.len(), "selected template");
        true
    }

    /// Assemble `id` anew and render it in full. Values are left alone.
    fn activate_fresh(&mut self, id: &str) -> bool {
        let Some(template) = self.library.get(id) else {
            return false;
        };
        let assembly = assemble_template(template, &mut self.rng);
        let parsed = ParsedAssembly::new(&assembly, template);
        self.state = ControllerState::TemplateSelected(ActiveTemplate {
            template_id: id.to_string(),
            assembly,
            parsed,
        });
        self.render_full();
        true
    }

    /// Set one field value and update the outputs in place.
    pub fn edit_field(&mut self, key: &str, value: &str) -> Result<(), ControllerError> {
        let template = self.template().ok_or(ControllerError::NoTemplateSelected)?;
        if !template.has_field(key) && !self.pinned.iter().any(|p| p == key) {
            return Err(ControllerError::UnknownField {
                template: template.id.clone(),
                key: key.to_string(),
            });
        }

        self.values.insert(key.to_string(), value.to_string());
        self.render_edit(&[key]);
        self.save_session();
        Ok(())
    }

    /// Pick new wording for the current template, keeping the field values.
    pub fn shuffle(&mut self) -> Result<(), ControllerError> {
        let ControllerState::TemplateSelected(active) = &mut self.state else {
            return Err(ControllerError::NoTemplateSelected);
        };
        let template = self
            .library
            .get(&active.template_id)
            .ok_or(ControllerError::NoTemplateSelected)?;

        let assembly = assemble_template(template, &mut self.rng);
        active.parsed = ParsedAssembly::new(&assembly, template);
        active.assembly = assembly;

        self.render_full();
        self.save_session();
        Ok(())
    }

    pub fn edit_agent_name(&mut self, name: &str) {
        self.profile.display_name = name.to_string();
        self.persistence.save_profile(&self.profile);
        if self.template().is_some() {
            self.render_edit(&[AGENT_NAME_KEY]);
        }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.profile.theme.toggled())
    }

    pub fn set_theme(&mut self, theme: Theme) -> Theme {
        self.profile.theme = theme;
        self.persistence.save_profile(&self.profile);
        theme
    }

    /// Field values as an export document.
    pub fn export_values(&self) -> Result<String, serde_json::Error> {
        ExportDocument::new(self.template_id(), &self.values).to_json()
    }

    /// Replace the field values wholesale from an export document and
    /// reload everything derived from them. A malformed document is rejected
    /// before any state changes.
    pub fn import_values(&mut self, json: &str) -> Result<(), ControllerError> {
        let doc = match parse_import(json) {
            Ok(doc) => doc,
            Err(e) => {
                self.ports.notify(Notice::ImportRejected {
                    reason: e.to_string(),
                });
                return Err(e.into());
            }
        };

        let imported = doc.field_values.len();
        self.values = doc.field_values;

        let target = doc
            .template_id
            .filter(|id| self.library.get(id).is_some())
            .or_else(|| self.template_id().map(str::to_string));
        match target {
            Some(id) => {
                self.activate_fresh(&id);
            }
            None => {
                self.state = ControllerState::NoTemplateSelected;
                self.ports.clear();
            }
        }

        self.save_session();
        self.ports.notify(Notice::Imported { fields: imported });
        Ok(())
    }

    /// Copy one output. Failures are reported through a notice and never
    /// touch the document.
    pub fn copy<C: Clipboard + ?Sized>(
        &mut self,
        output: OutputKind,
        clipboard: &mut C,
    ) -> Result<CopyOutcome, ClipboardError> {
        let (html, text) = match output {
            OutputKind::Subject => (String::new(), self.ports.subject().to_string()),
            OutputKind::CaseComment => (String::new(), self.ports.case_comment().to_string()),
            OutputKind::Body => {
                let body = self.ports.body_ref();
                (body.html(), body.text())
            }
        };

        let result = copy_output(clipboard, output, &html, &text);
        match &result {
            Ok(outcome) => self.ports.notify(Notice::Copied {
                output,
                rich: *outcome == CopyOutcome::Rich,
            }),
            Err(e) => self.ports.notify(Notice::CopyFailed {
                output,
                reason: e.to_string(),
            }),
        }
        result
    }

    /// Forget the session: no template, no values, blank outputs.
    pub fn clear_session(&mut self) {
        self.state = ControllerState::NoTemplateSelected;
        self.values.clear();
        self.ports.clear();
        self.persistence.clear_session();
    }

    fn active(&self) -> Option<&ActiveTemplate> {
        match &self.state {
            ControllerState::TemplateSelected(active) => Some(active),
            ControllerState::NoTemplateSelected => None,
        }
    }

    fn current_bindings(&self) -> Option<Vec<Binding>> {
        let template = self.template()?;
        Some(bindings(template, &self.values, &self.profile.display_name))
    }

    /// Outputs for the current state, if a template is selected.
    pub fn resolved(&self) -> Option<Resolved> {
        let active = self.active()?;
        Some(active.parsed.resolve(&self.current_bindings()?))
    }

    /// Full re-render: the body surface is replaced wholesale.
    fn render_full(&mut self) {
        match self.resolved() {
            Some(resolved) => {
                self.ports.render_subject(&resolved.subject);
                self.ports.render_case_comment(&resolved.case_comment);
                self.ports.body().set_html(&resolved.body);
            }
            None => self.ports.clear(),
        }
    }

    /// Re-render after `changed` keys were edited. Plain outputs are
    /// rewritten; the body only has its field spans updated unless a changed
    /// field also occurs inside a tag.
    fn render_edit(&mut self, changed: &[&str]) {
        let Some(active) = self.active() else {
            self.ports.clear();
            return;
        };
        let Some(bindings) = self.current_bindings() else {
            self.ports.clear();
            return;
        };
        let in_tags = active.parsed.tokens_inside_tags();
        let needs_full = bindings
            .iter()
            .any(|b| changed.contains(&b.key.as_str()) && in_tags.contains(&b.token.as_str()));
        let resolved = active.parsed.resolve(&bindings);

        self.ports.render_subject(&resolved.subject);
        self.ports.render_case_comment(&resolved.case_comment);
        if needs_full {
            tracing::debug!("changed field occurs inside markup, re-rendering body");
            self.ports.body().set_html(&resolved.body);
        } else {
            reconcile_with_bindings(self.ports.body(), &bindings);
        }
    }

    fn save_session(&mut self) {
        let session = SessionState {
            template_id: self.template_id().map(str::to_string),
            field_values: self.values.clone(),
            assembly: self.assembly().cloned(),
        };
        self.persistence.save_session(&session);
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn template_id(&self) -> Option<&str> {
        self.active().map(|a| a.template_id.as_str())
    }

    pub fn template(&self) -> Option<&Template> {
        self.library.get(self.template_id()?)
    }

    pub fn assembly(&self) -> Option<&Assembly> {
        self.active().map(|a| &a.assembly)
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    pub fn library(&self) -> &TemplateLibrary {
        &self.library
    }

    pub fn pinned_fields(&self) -> &[String] {
        &self.pinned
    }

    pub fn ports(&self) -> &P {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut P {
        &mut self.ports
    }
}
