use anyhow::Result;
use mailgen::ports::{OutputKind, OutputPorts};
use mailgen::state::{FieldValues, is_filled};
use mailgen::surface::RichSurface;
use serde::Serialize;
use std::path::Path;

/// JSON output structure for show command
#[derive(Debug, Serialize)]
struct SessionDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template_name: Option<String>,
    agent_name: String,
    theme: String,
    field_values: FieldValues,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unfilled: Vec<String>,
    subject: String,
    body_html: String,
    body_text: String,
    case_comment: String,
}

pub fn run(
    dir: &Path,
    profile_dir: &Path,
    output: Option<OutputKind>,
    text: bool,
    json: bool,
) -> Result<()> {
    let (_config, session) = super::open_session(dir, profile_dir)?;
    let ports = session.ports();
    let body = ports.body_ref();

    if json {
        let template = session.template();
        let unfilled: Vec<String> = template
            .map(|t| {
                t.fields
                    .iter()
                    .filter(|f| f.token().is_some() && !is_filled(session.values().get(&f.key)))
                    .map(|f| f.key.clone())
                    .collect()
            })
            .unwrap_or_default();
        let details = SessionDetails {
            template_id: template.map(|t| t.id.clone()),
            template_name: template.map(|t| t.name.clone()),
            agent_name: session.profile().display_name.clone(),
            theme: session.profile().theme.to_string(),
            field_values: session.values().clone(),
            unfilled,
            subject: ports.subject().to_string(),
            body_html: body.html(),
            body_text: body.text(),
            case_comment: ports.case_comment().to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    let Some(template) = session.template() else {
        println!("No template selected. Run 'mailgen select <id>'.");
        return Ok(());
    };

    let body_out = if text { body.text() } else { body.html() };
    match output {
        Some(OutputKind::Subject) => println!("{}", ports.subject()),
        Some(OutputKind::Body) => println!("{}", body_out),
        Some(OutputKind::CaseComment) => println!("{}", ports.case_comment()),
        None => {
            println!("Template: {} ({})", template.id, template.name);
            println!();
            println!("Fields:");
            for field in &template.fields {
                let value = session.values().get(&field.key);
                let shown = if is_filled(value) {
                    value.map(String::as_str).unwrap_or_default()
                } else {
                    "(empty)"
                };
                println!("  {:<20} {}", field.display_label(), shown);
            }
            println!();
            println!("Subject:");
            println!("  {}", ports.subject());
            println!();
            println!("Body:");
            for line in body_out.lines() {
                println!("  {}", line);
            }
            println!();
            println!("Case comment:");
            println!("  {}", ports.case_comment());
        }
    }

    Ok(())
}
