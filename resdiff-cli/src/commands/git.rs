//! Git command - declaration-level diff of every changed `.res` file between two refs

use std::path::Path;
use std::process::Command;

use resdiff_core::differ::module_name_from_path;
use resdiff_core::{ChangeMode, ChangeReport};

use super::Context;
use crate::output::{Output, ReportList};

/// Extension of files that are diffed.
const RESCRIPT_EXTENSION: &str = "res";

/// `git diff` arguments listing changed paths. Renames are split into a
/// deletion and an addition so the old module gets its own report.
fn diff_args<'a>(base_ref: &'a str, head_ref: &'a str) -> [&'a str; 5] {
    ["diff", "--name-only", "--no-renames", base_ref, head_ref]
}

/// Get the list of changed files between two git refs
fn get_changed_files(repo: &Path, base_ref: &str, head_ref: &str) -> anyhow::Result<Vec<String>> {
    let output = Command::new("git")
        .current_dir(repo)
        .args(diff_args(base_ref, head_ref))
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git diff failed: {}", stderr.trim());
    }

    let files: Vec<String> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|l| !l.is_empty())
        .filter(|l| is_rescript(l))
        .map(|s| s.to_string())
        .collect();

    Ok(files)
}

/// Get file content at a specific git ref
fn get_file_at_ref(file_path: &str, git_ref: &str) -> anyhow::Result<Option<String>> {
    let output = Command::new("git")
        .args(["show", &format!("{}:{}", git_ref, file_path)])
        .output()?;

    if !output.status.success() {
        // File might not exist at this ref
        return Ok(None);
    }

    Ok(Some(String::from_utf8_lossy(&output.stdout).to_string()))
}

fn is_rescript(file_path: &str) -> bool {
    Path::new(file_path)
        .extension()
        .map(|ext| ext == RESCRIPT_EXTENSION)
        .unwrap_or(false)
}

/// Run the git command
pub fn run(ctx: &Context, base_ref: &str, head_ref: &str) -> anyhow::Result<()> {
    let changed_files = get_changed_files(Path::new("."), base_ref, head_ref)?;
    tracing::debug!(files = changed_files.len(), "changed ReScript files");

    let mut list = ReportList::default();
    if changed_files.is_empty() {
        return Output::new(&list, &ctx.output).render();
    }

    let differ = ctx.differ()?;

    for file_path in &changed_files {
        let module_name = module_name_from_path(Path::new(file_path));
        let base = get_file_at_ref(file_path, base_ref)?;
        let head = get_file_at_ref(file_path, head_ref)?;

        let report = match (base, head) {
            (Some(base), Some(head)) => differ.compare_sources(&module_name, &base, &head)?,
            (None, Some(head)) => {
                differ.process_single_source(&module_name, &head, ChangeMode::Added)?
            }
            (Some(base), None) => {
                differ.process_single_source(&module_name, &base, ChangeMode::Deleted)?
            }
            (None, None) => {
                tracing::warn!(file = %file_path, "file missing at both refs");
                ChangeReport::new(module_name)
            }
        };
        list.reports.push(report);
    }

    Output::new(&list, &ctx.output).render()
}
