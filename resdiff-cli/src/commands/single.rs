//! Single command - report one version of a module as wholly added or deleted

use std::path::Path;

use resdiff_core::differ::single_declarations;
use resdiff_core::ChangeMode;

use super::{module_name_for, Context};
use crate::output::Output;

/// Run the single command
pub fn run(
    ctx: &Context,
    file: &Path,
    mode: ChangeMode,
    module: Option<&str>,
) -> anyhow::Result<()> {
    let module_name = module
        .map(str::to_string)
        .unwrap_or_else(|| module_name_for(file));

    let declarations = ctx.declarations(file)?;
    let report = single_declarations(&module_name, &declarations, mode);

    Output::new(&report, &ctx.output).render()
}
