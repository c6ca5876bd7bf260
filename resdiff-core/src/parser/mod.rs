//! Source parsing with tree-sitter.
//!
//! Every call builds its own `tree_sitter::Parser`; parsers are cheap and are
//! never shared between threads. Trees come back wrapped in [`ParsedSource`],
//! which owns the source text so nodes can be handed to the extractor.

use libloading::Library;
use rayon::prelude::*;
use std::sync::Arc;

use crate::error::{DiffError, Result};
use crate::node::TsNode;
use crate::snapshot::SyntaxSnapshot;

pub mod language;

pub use language::{load_language, LoadedLanguage};

/// A parsed source file.
pub struct ParsedSource {
    tree: tree_sitter::Tree,
    source: String,
    // Keeps a dynamically loaded grammar alive until the tree is gone.
    _library: Option<Arc<Library>>,
}

impl ParsedSource {
    /// Root node of the tree.
    pub fn root(&self) -> TsNode<'_> {
        TsNode::new(self.tree.root_node(), self.source.as_bytes())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tree(&self) -> &tree_sitter::Tree {
        &self.tree
    }

    /// Whether tree-sitter had to recover from syntax errors.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Detach the tree into a serializable snapshot.
    pub fn snapshot(&self) -> SyntaxSnapshot {
        SyntaxSnapshot::capture(&self.tree, &self.source)
    }
}

/// Parse `source` with `language`.
pub fn parse_source(language: &LoadedLanguage, source: impl Into<String>) -> Result<ParsedSource> {
    parse_labeled(language, source.into(), "<source>")
}

/// Parse `source`, naming it `label` in errors.
pub fn parse_labeled(
    language: &LoadedLanguage,
    source: String,
    label: &str,
) -> Result<ParsedSource> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(language.language())
        .map_err(|e| DiffError::IncompatibleGrammar(e.to_string()))?;

    let tree = parser.parse(&source, None).ok_or_else(|| DiffError::Parse {
        path: label.to_string(),
    })?;

    if tree.root_node().has_error() {
        tracing::debug!(source = label, "parsed with syntax errors");
    }

    Ok(ParsedSource {
        tree,
        source,
        _library: language.library(),
    })
}

/// Parse many sources in parallel using rayon.
///
/// Results keep the input order.
pub fn parse_sources_parallel(
    language: &LoadedLanguage,
    sources: Vec<String>,
) -> Vec<Result<ParsedSource>> {
    sources
        .into_par_iter()
        .map(|source| parse_source(language, source))
        .collect()
}
