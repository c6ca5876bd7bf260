//! resdiff core - declaration-level semantic diffing for ReScript modules.
//!
//! Given two versions of a module, this crate reports which top-level
//! functions, types and external bindings were added, deleted or structurally
//! modified. Declarations are matched by name and compared by a structural
//! signature of their syntax tree, so reformatting is not a change.
//!
//! # Features
//!
//! - **Grammar-agnostic engine**: extraction works over any [`node::SyntaxNode`],
//!   either a live tree-sitter tree or a stored [`snapshot::SyntaxSnapshot`]
//! - **Runtime grammar loading**: compiled tree-sitter grammars are loaded from
//!   a shared library
//! - **Parallel batches**: many modules are diffed concurrently using Rayon
//! - **Stable output**: every list is sorted by name and serializes to a flat
//!   JSON object
//!
//! # Usage
//!
//! ```no_run
//! use resdiff_core::differ::FileDiffer;
//! use resdiff_core::parser::{language::DEFAULT_SYMBOL, load_language};
//! use std::path::Path;
//!
//! let language = load_language(Path::new("rescript.so"), DEFAULT_SYMBOL)?;
//! let differ = FileDiffer::new(language);
//! let report = differ.compare_files("Math", Path::new("old/Math.res"), Path::new("Math.res"))?;
//! println!("{}", report.summary().text());
//! # Ok::<(), resdiff_core::DiffError>(())
//! ```

pub mod differ;
pub mod error;
pub mod extractor;
pub mod formatter;
pub mod grammar;
pub mod node;
pub mod parser;
pub mod snapshot;
pub mod types;

pub use differ::{ChangeMode, ChangeReport, DiffSummary, FileDiffer, FilePair};
pub use error::{DiffError, Result};
pub use grammar::Grammar;
pub use node::SyntaxNode;
pub use snapshot::SyntaxSnapshot;
pub use types::{Declaration, DeclarationKind, Declarations};

/// Extract the declarations of a ReScript module.
///
/// # Arguments
///
/// * `root` - Root node of the module's syntax tree
///
/// # Returns
///
/// Functions, types and externals keyed by (possibly qualified) name.
pub fn extract_declarations<N: SyntaxNode>(root: &N) -> Declarations {
    extractor::extract(root, &Grammar::rescript())
}

/// Compare two versions of a ReScript module.
///
/// # Arguments
///
/// * `module_name` - Name recorded in the report
/// * `before` - Root of the old version
/// * `after` - Root of the new version
///
/// # Returns
///
/// A ChangeReport with added, modified and deleted declarations.
pub fn diff_modules<A: SyntaxNode, B: SyntaxNode>(
    module_name: &str,
    before: &A,
    after: &B,
) -> ChangeReport {
    differ::compare_trees(module_name, before, after, &Grammar::rescript())
}

/// Report one version of a ReScript module as wholly added or deleted.
///
/// # Arguments
///
/// * `module_name` - Name recorded in the report
/// * `root` - Root of the only version
/// * `mode` - Whether the module was created or removed
pub fn diff_single<N: SyntaxNode>(module_name: &str, root: &N, mode: ChangeMode) -> ChangeReport {
    differ::single_tree(module_name, root, &Grammar::rescript(), mode)
}

/// Get the version of resdiff-core.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
