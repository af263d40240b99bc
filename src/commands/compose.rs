//! Interactive composer.
//!
//! Walks through picking a template and filling its fields with dialoguer
//! prompts, then offers shuffling and copying until the user is done.

use anyhow::{Result, bail};
use dialoguer::{Confirm, Input, Select};
use mailgen::clipboard::WriterClipboard;
use mailgen::ports::{OutputKind, OutputPorts};
use mailgen::surface::RichSurface;
use mailgen::template::{Field, InputType, TemplateLibrary};
use std::io::{self, IsTerminal};
use std::path::Path;

use super::Session;

/// Menu entries offered once the fields are filled.
const ACTIONS: &[&str] = &[
    "Show",
    "Shuffle wording",
    "Edit a field",
    "Copy subject",
    "Copy body",
    "Copy case comment",
    "Done",
];

/// Template ids and their menu labels, grouped by category.
pub fn template_choices(library: &TemplateLibrary) -> Vec<(String, String)> {
    library
        .by_category()
        .into_iter()
        .flat_map(|(category, members)| {
            members
                .into_iter()
                .map(move |t| (t.id.clone(), format!("{} / {}", category, t.name)))
        })
        .collect()
}

/// Prompt text for a field, with its example when it has one.
pub fn field_prompt(field: &Field) -> String {
    match &field.placeholder_example {
        Some(example) if !example.is_empty() => {
            format!("{} (e.g. {})", field.display_label(), example)
        }
        _ => field.display_label().to_string(),
    }
}

/// Light validation matching the field's input type. Empty is always valid.
pub fn validate_field(field: &Field, value: &str) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    match field.input_type {
        InputType::Email if !value.contains('@') => Err("Not an email address".to_string()),
        InputType::Number if value.parse::<f64>().is_err() => Err("Not a number".to_string()),
        _ => Ok(()),
    }
}

pub fn run(dir: &Path, profile_dir: &Path) -> Result<()> {
    if !io::stdin().is_terminal() {
        bail!("mailgen compose requires an interactive terminal");
    }

    let (config, mut session) = super::open_session(dir, profile_dir)?;

    if session.profile().display_name.is_empty() {
        let name: String = Input::new()
            .with_prompt("Your name (signs emails as {{agent.name}})")
            .allow_empty(true)
            .interact_text()?;
        if !name.is_empty() {
            session.edit_agent_name(&name);
        }
    }

    let choices = template_choices(session.library());
    if choices.is_empty() {
        bail!("No templates found. Add some to {}", config.library_dir(dir).display());
    }
    let current = session
        .template_id()
        .and_then(|id| choices.iter().position(|(c, _)| c == id))
        .unwrap_or(0);
    let labels: Vec<&str> = choices.iter().map(|(_, label)| label.as_str()).collect();
    let picked = Select::new()
        .with_prompt("Template")
        .items(&labels)
        .default(current)
        .interact()?;
    let id = choices[picked].0.clone();
    if session.template_id() != Some(id.as_str()) {
        session.select_template(&id);
    }

    fill_fields(&mut session, None)?;

    loop {
        let action = Select::new()
            .with_prompt("Next")
            .items(ACTIONS)
            .default(0)
            .interact()?;
        match ACTIONS[action] {
            "Show" => print_outputs(&session),
            "Shuffle wording" => {
                session.shuffle()?;
                print_outputs(&session);
            }
            "Edit a field" => {
                let keys: Vec<String> = session
                    .template()
                    .map(|t| t.fields.iter().map(|f| f.key.clone()).collect())
                    .unwrap_or_default();
                if keys.is_empty() {
                    println!("This template has no fields");
                    continue;
                }
                let idx = Select::new()
                    .with_prompt("Field")
                    .items(&keys)
                    .default(0)
                    .interact()?;
                fill_fields(&mut session, Some(&keys[idx]))?;
            }
            "Copy subject" => copy(&mut session, OutputKind::Subject, config.output.rich_copy),
            "Copy body" => copy(&mut session, OutputKind::Body, config.output.rich_copy),
            "Copy case comment" => {
                copy(&mut session, OutputKind::CaseComment, config.output.rich_copy)
            }
            _ => break,
        }
    }

    let clear = Confirm::new()
        .with_prompt("Clear this session?")
        .default(false)
        .interact()?;
    if clear {
        session.clear_session();
        println!("Session cleared");
    }

    Ok(())
}

/// Prompt for every field of the current template, or only `only`.
fn fill_fields(session: &mut Session, only: Option<&str>) -> Result<()> {
    let fields: Vec<Field> = session
        .template()
        .map(|t| t.fields.clone())
        .unwrap_or_default();

    for field in fields.iter().filter(|f| only.is_none_or(|k| k == f.key)) {
        let current = session.values().get(&field.key).cloned().unwrap_or_default();
        let prompt = field_prompt(field);
        let validator = field.clone();
        let value: String = Input::new()
            .with_prompt(prompt)
            .default(current)
            .allow_empty(true)
            .validate_with(move |input: &String| validate_field(&validator, input))
            .interact_text()?;
        session.edit_field(&field.key, &value)?;
    }
    Ok(())
}

fn print_outputs(session: &Session) {
    let ports = session.ports();
    println!();
    println!("Subject: {}", ports.subject());
    println!();
    println!("{}", ports.body_ref().text());
    println!();
    println!("Case comment: {}", ports.case_comment());
    println!();
}

fn copy(session: &mut Session, output: OutputKind, rich: bool) {
    let mut clipboard = WriterClipboard::new(io::stdout().lock(), rich);
    if let Err(e) = session.copy(output, &mut clipboard) {
        tracing::debug!(error = %e, "copy failed");
    }
    super::print_notices(session);
}
