//! Compare command - declaration-level diff between two versions of a module

use std::path::Path;

use resdiff_core::differ::compare_declarations;

use super::{module_name_for, Context};
use crate::output::Output;

/// Run the compare command
pub fn run(
    ctx: &Context,
    before: &Path,
    after: &Path,
    module: Option<&str>,
) -> anyhow::Result<()> {
    let module_name = module
        .map(str::to_string)
        .unwrap_or_else(|| module_name_for(after));

    let before_decls = ctx.declarations(before)?;
    let after_decls = ctx.declarations(after)?;
    let report = compare_declarations(&module_name, &before_decls, &after_decls);

    tracing::debug!(module = %module_name, summary = %report.summary().text(), "compare finished");
    Output::new(&report, &ctx.output).render()
}
