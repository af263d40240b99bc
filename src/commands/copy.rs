use anyhow::{Context, Result};
use mailgen::clipboard::WriterClipboard;
use mailgen::ports::OutputKind;
use std::io;
use std::path::Path;

/// Copy one output to stdout, as HTML when the body can be copied rich.
pub fn run(dir: &Path, profile_dir: &Path, output: OutputKind, plain: bool) -> Result<()> {
    let (config, mut session) = super::open_session(dir, profile_dir)?;
    if session.template().is_none() {
        anyhow::bail!("No template selected. Run 'mailgen select <id>' first.");
    }

    let rich = config.output.rich_copy && !plain;
    let mut clipboard = WriterClipboard::new(io::stdout().lock(), rich);
    let result = session.copy(output, &mut clipboard);
    super::print_notices(&mut session);
    result.with_context(|| format!("Failed to copy {}", output))?;
    Ok(())
}
