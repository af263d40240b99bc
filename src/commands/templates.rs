use anyhow::Result;
use mailgen::persist::Persistence;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct TemplateSummary<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    fields: Vec<&'a str>,
    selected: bool,
}

pub fn run(dir: &Path, profile_dir: &Path, json: bool) -> Result<()> {
    let (_config, library) = super::load_library(dir)?;
    let selected = Persistence::on_disk(profile_dir, dir)
        .load_session()
        .and_then(|s| s.template_id);
    let is_selected = |id: &str| selected.as_deref() == Some(id);

    if json {
        let summaries: Vec<TemplateSummary> = library
            .templates()
            .map(|t| TemplateSummary {
                id: &t.id,
                name: &t.name,
                category: &t.category,
                fields: t.fields.iter().map(|f| f.key.as_str()).collect(),
                selected: is_selected(&t.id),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if library.is_empty() {
        println!("No templates found");
        return Ok(());
    }

    for (category, members) in library.by_category() {
        println!("{}", category);
        for t in members {
            let marker = if is_selected(&t.id) { "*" } else { " " };
            println!("  {} {:<24} {}", marker, t.id, t.name);
        }
    }

    Ok(())
}
