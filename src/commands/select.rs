use anyhow::Result;
use std::path::Path;

pub fn run(dir: &Path, profile_dir: &Path, id: &str) -> Result<()> {
    let (_config, mut session) = super::open_session(dir, profile_dir)?;

    if !session.select_template(id) {
        anyhow::bail!("Template '{}' not found", id);
    }

    let Some(template) = session.template() else {
        anyhow::bail!("Template '{}' not found", id);
    };
    println!("Selected '{}' ({})", template.id, template.name);
    for field in &template.fields {
        match session.values().get(&field.key) {
            Some(value) => println!("  {} = {}", field.key, value),
            None => println!("  {}", field.key),
        }
    }
    Ok(())
}
