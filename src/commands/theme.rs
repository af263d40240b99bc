use anyhow::Result;
use mailgen::state::Theme;
use std::path::Path;

/// Show, set or toggle the UI theme.
pub fn run(
    dir: &Path,
    profile_dir: &Path,
    set: Option<&str>,
    toggle: bool,
    json: bool,
) -> Result<()> {
    let (_config, mut session) = super::open_session(dir, profile_dir)?;

    let theme = match (set, toggle) {
        (Some(_), true) => anyhow::bail!("Use either a theme name or --toggle, not both"),
        (Some(name), false) => {
            let theme: Theme = name.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            session.set_theme(theme)
        }
        (None, true) => session.toggle_theme(),
        (None, false) => session.profile().theme,
    };

    if json {
        println!("{}", serde_json::json!({ "theme": theme.as_str() }));
    } else {
        println!("{}", theme);
    }
    Ok(())
}
