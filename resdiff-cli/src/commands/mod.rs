//! Command implementations for the resdiff CLI
//!
//! Each command module provides a `run` function that executes the command
//! logic against a shared [`Context`].

pub mod compare;
pub mod git;
pub mod single;
pub mod snapshot;

use anyhow::Context as _;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

use resdiff_core::differ::module_name_from_path;
use resdiff_core::extractor::extract;
use resdiff_core::parser::load_language;
use resdiff_core::{Declarations, FileDiffer, Grammar, SyntaxSnapshot};

use crate::config::ResdiffConfig;
use crate::output::OutputConfig;

/// State shared by all commands.
///
/// The grammar is loaded on first use, so commands fed only syntax snapshots
/// never need it.
pub struct Context {
    pub config: ResdiffConfig,
    pub output: OutputConfig,
    grammar_flag: Option<PathBuf>,
    no_format: bool,
    differ: OnceCell<FileDiffer>,
}

impl Context {
    pub fn new(
        config: ResdiffConfig,
        output: OutputConfig,
        grammar_flag: Option<PathBuf>,
        no_format: bool,
    ) -> Self {
        Self {
            config,
            output,
            grammar_flag,
            no_format,
            differ: OnceCell::new(),
        }
    }

    /// File differ backed by the configured grammar, loaded on first call.
    pub fn differ(&self) -> anyhow::Result<&FileDiffer> {
        self.differ.get_or_try_init(|| {
            let path = self
                .config
                .grammar_path(self.grammar_flag.as_deref())
                .context("No grammar configured: pass --grammar or set RESDIFF_GRAMMAR")?;
            let symbol = self.config.grammar_symbol();
            tracing::debug!(path = %path.display(), symbol, "loading grammar");

            let language = load_language(&path, symbol).with_context(|| {
                format!(
                    "Could not load the ReScript grammar from {} (use --grammar or RESDIFF_GRAMMAR)",
                    path.display()
                )
            })?;
            Ok(FileDiffer::new(language).with_formatter(self.config.formatter(self.no_format)))
        })
    }

    /// Declarations of one input, either a syntax snapshot or a source file.
    pub fn declarations(&self, path: &Path) -> anyhow::Result<Declarations> {
        if is_snapshot(path) {
            let snapshot = SyntaxSnapshot::read(path)
                .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
            Ok(snapshot
                .root()
                .map(|root| extract(&root, &Grammar::rescript()))
                .unwrap_or_default())
        } else {
            let differ = self.differ()?;
            differ
                .declarations_for_file(path)
                .with_context(|| format!("Failed to process {}", path.display()))
        }
    }
}

/// Whether an input path names a JSON syntax snapshot.
pub fn is_snapshot(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Module name for an input: the file stem, ignoring a trailing `.json`
/// (`Math.res.json` -> `Math`).
pub fn module_name_for(path: &Path) -> String {
    if is_snapshot(path) {
        if let Some(stem) = path.file_stem() {
            return module_name_from_path(Path::new(stem));
        }
    }
    module_name_from_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_snapshot() {
        assert!(is_snapshot(Path::new("Math.res.json")));
        assert!(is_snapshot(Path::new("a/B.JSON")));
        assert!(!is_snapshot(Path::new("Math.res")));
        assert!(!is_snapshot(Path::new("json")));
    }

    #[test]
    fn test_module_name_for() {
        assert_eq!(module_name_for(Path::new("src/Math.res")), "Math");
        assert_eq!(module_name_for(Path::new("snap/Math.res.json")), "Math");
        assert_eq!(module_name_for(Path::new("Math.json")), "Math");
    }
}
