//! Declaration-level diff engine.
//!
//! Declarations are matched by name within their category (functions, types,
//! externals) and compared by structural signature. Each category yields a
//! [`ChangeRecord`] of added, modified and deleted declarations; the three
//! records for one module make up a [`ChangeReport`].
//!
//! # Features
//!
//! - **Two-version compare**: [`compare_trees`] / [`FileDiffer::compare_files`]
//! - **Single-version framing**: report a created or removed file as wholly
//!   added or deleted with [`single_tree`]
//! - **Batch diffing**: [`FileDiffer::diff_pairs`] runs modules in parallel via Rayon
//!
//! # Example
//!
//! ```
//! use resdiff_core::differ::compare_trees;
//! use resdiff_core::grammar::Grammar;
//! use resdiff_core::snapshot::SnapshotBuilder;
//!
//! let module = |body: &str| {
//!     let mut b = SnapshotBuilder::new();
//!     b.open("source_file");
//!     b.open("let_declaration");
//!     b.token("let").gap(" ");
//!     b.open("let_binding");
//!     b.leaf("value_identifier", "x").gap(" ").token("=").gap(" ");
//!     b.leaf("number", body);
//!     b.close();
//!     b.close();
//!     b.close();
//!     b.finish()
//! };
//! let (before, after) = (module("1"), module("2"));
//!
//! let report = compare_trees(
//!     "Example",
//!     &before.root().unwrap(),
//!     &after.root().unwrap(),
//!     &Grammar::rescript(),
//! );
//! assert_eq!(report.functions.modified[0].name, "x");
//! ```

pub mod changes;
pub mod comparator;
pub mod files;

pub use changes::{
    ChangeMode, ChangeRecord, ChangeReport, ChangeType, DeclarationText, DiffSummary,
    ModifiedDeclaration, SpanChange,
};
pub use comparator::{
    compare_declarations, compare_trees, diff_category, single_declarations, single_tree,
};
pub use files::{module_name_from_path, read_source, FileDiffer, FilePair};
