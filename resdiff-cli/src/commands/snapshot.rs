//! Snapshot command - store a parsed source file as a JSON syntax snapshot
//!
//! Snapshots can be diffed later (or elsewhere) without the grammar library.

use anyhow::Context as _;
use std::path::Path;

use resdiff_core::differ::read_source;
use resdiff_core::parser::parse_labeled;

use super::Context;

/// Run the snapshot command
pub fn run(ctx: &Context, file: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let differ = ctx.differ()?;
    let source = read_source(file)?;
    let parsed = parse_labeled(&differ.language, source, &file.display().to_string())?;

    if parsed.has_errors() {
        tracing::warn!(path = %file.display(), "source has syntax errors; snapshot includes error nodes");
    }

    let snapshot = parsed.snapshot();
    let json = snapshot.to_json(!ctx.output.compact)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
            tracing::info!(path = %path.display(), nodes = snapshot.len(), "snapshot written");
        }
        None => println!("{}", json),
    }
    Ok(())
}
