//! File-level drivers: read, optionally format, parse and diff.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::differ::changes::{ChangeMode, ChangeReport};
use crate::differ::comparator::{compare_trees, single_tree};
use crate::error::{DiffError, Result};
use crate::extractor::extract;
use crate::formatter::Formatter;
use crate::grammar::Grammar;
use crate::parser::{parse_labeled, LoadedLanguage};
use crate::types::Declarations;

/// Module name for a source path: its file stem (`src/Math.res` -> `Math`).
pub fn module_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read a source file, replacing invalid UTF-8 sequences.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| DiffError::read(path, e))?;
    Ok(String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
}

/// One module in a batch: either side may be missing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePair {
    pub module_name: String,
    pub before: Option<PathBuf>,
    pub after: Option<PathBuf>,
}

impl FilePair {
    /// Pair two paths, naming the module after whichever side exists.
    pub fn new(before: Option<PathBuf>, after: Option<PathBuf>) -> Self {
        let module_name = after
            .as_deref()
            .or(before.as_deref())
            .map(module_name_from_path)
            .unwrap_or_default();
        Self {
            module_name,
            before,
            after,
        }
    }
}

/// Diffs source files with a loaded grammar.
#[derive(Debug)]
pub struct FileDiffer {
    pub grammar: Grammar,
    pub language: LoadedLanguage,
    pub formatter: Option<Formatter>,
}

impl FileDiffer {
    pub fn new(language: LoadedLanguage) -> Self {
        Self {
            grammar: Grammar::rescript(),
            language,
            formatter: None,
        }
    }

    pub fn with_grammar(mut self, grammar: Grammar) -> Self {
        self.grammar = grammar;
        self
    }

    pub fn with_formatter(mut self, formatter: Option<Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Compare two versions held in memory.
    pub fn compare_sources(
        &self,
        module_name: &str,
        before: &str,
        after: &str,
    ) -> Result<ChangeReport> {
        let before = parse_labeled(&self.language, before.to_string(), "before")?;
        let after = parse_labeled(&self.language, after.to_string(), "after")?;
        Ok(compare_trees(
            module_name,
            &before.root(),
            &after.root(),
            &self.grammar,
        ))
    }

    /// Compare two files on disk, formatting them first when configured.
    pub fn compare_files(
        &self,
        module_name: &str,
        before: &Path,
        after: &Path,
    ) -> Result<ChangeReport> {
        let before_tree = self.parse_file(before)?;
        let after_tree = self.parse_file(after)?;
        Ok(compare_trees(
            module_name,
            &before_tree.root(),
            &after_tree.root(),
            &self.grammar,
        ))
    }

    /// Report every declaration of one in-memory version as added or deleted.
    pub fn process_single_source(
        &self,
        module_name: &str,
        source: &str,
        mode: ChangeMode,
    ) -> Result<ChangeReport> {
        let parsed = parse_labeled(&self.language, source.to_string(), module_name)?;
        Ok(single_tree(module_name, &parsed.root(), &self.grammar, mode))
    }

    /// Report every declaration of one file as added or deleted.
    pub fn process_single_file(
        &self,
        module_name: &str,
        path: &Path,
        mode: ChangeMode,
    ) -> Result<ChangeReport> {
        let parsed = self.parse_file(path)?;
        Ok(single_tree(module_name, &parsed.root(), &self.grammar, mode))
    }

    /// Extract the declarations of one file.
    pub fn declarations_for_file(&self, path: &Path) -> Result<Declarations> {
        let parsed = self.parse_file(path)?;
        Ok(extract(&parsed.root(), &self.grammar))
    }

    /// Diff a batch of modules in parallel.
    ///
    /// A pair with only an `after` side is a new file, one with only a
    /// `before` side a removed file; a pair with neither yields an empty
    /// report. Results keep the input order.
    pub fn diff_pairs(&self, pairs: &[FilePair]) -> Vec<Result<ChangeReport>> {
        pairs
            .par_iter()
            .map(|pair| match (&pair.before, &pair.after) {
                (Some(before), Some(after)) => self.compare_files(&pair.module_name, before, after),
                (None, Some(after)) => {
                    self.process_single_file(&pair.module_name, after, ChangeMode::Added)
                }
                (Some(before), None) => {
                    self.process_single_file(&pair.module_name, before, ChangeMode::Deleted)
                }
                (None, None) => Ok(ChangeReport::new(pair.module_name.as_str())),
            })
            .collect()
    }

    fn parse_file(&self, path: &Path) -> Result<crate::parser::ParsedSource> {
        if let Some(formatter) = &self.formatter {
            formatter.format_in_place(path);
        }
        let source = read_source(path)?;
        debug!(path = %path.display(), bytes = source.len(), "parsing");
        parse_labeled(&self.language, source, &path.display().to_string())
    }
}
