//! Data models for extracted declarations.
//!
//! These types describe what the extractor pulls out of one version of a
//! module: named declarations grouped by category, each with its structural
//! signature, raw text and position.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::extractor::signature::Signature;

/// Separator between an enclosing module name and a nested declaration name.
pub const QUALIFIER_SEPARATOR: &str = " --> ";

/// A zero-based `(row, column)` position in a source file.
///
/// Serializes as a two-element array, matching how tree-sitter reports points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// One-based line number, for display.
    pub fn line(&self) -> usize {
        self.row + 1
    }
}

impl From<(usize, usize)> for Point {
    fn from((row, column): (usize, usize)) -> Self {
        Self { row, column }
    }
}

impl From<Point> for (usize, usize) {
    fn from(point: Point) -> Self {
        (point.row, point.column)
    }
}

impl From<tree_sitter::Point> for Point {
    fn from(point: tree_sitter::Point) -> Self {
        Self {
            row: point.row,
            column: point.column,
        }
    }
}

/// Category of a top-level declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeclarationKind {
    Function,
    Type,
    External,
}

impl DeclarationKind {
    /// All categories, in report order.
    pub const ALL: [DeclarationKind; 3] = [
        DeclarationKind::Function,
        DeclarationKind::Type,
        DeclarationKind::External,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Function => "function",
            DeclarationKind::Type => "type",
            DeclarationKind::External => "external",
        }
    }

    /// Plural label used in report keys and summaries.
    pub fn plural(&self) -> &'static str {
        match self {
            DeclarationKind::Function => "functions",
            DeclarationKind::Type => "types",
            DeclarationKind::External => "externals",
        }
    }
}

/// One extracted declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Declared name, qualified with its enclosing module when nested.
    pub name: String,
    /// Structural signature used for change detection.
    pub signature: Signature,
    /// Full source text of the declaration.
    pub source_text: String,
    pub start: Point,
    pub end: Point,
}

/// Declarations of one category keyed by name.
///
/// Inserting a name twice keeps the later declaration.
pub type DeclarationMap = BTreeMap<String, Declaration>;

/// Everything extracted from one version of a module.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Declarations {
    pub functions: DeclarationMap,
    pub types: DeclarationMap,
    pub externals: DeclarationMap,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map for one category.
    pub fn category(&self, kind: DeclarationKind) -> &DeclarationMap {
        match kind {
            DeclarationKind::Function => &self.functions,
            DeclarationKind::Type => &self.types,
            DeclarationKind::External => &self.externals,
        }
    }

    /// Mutable map for one category.
    pub fn category_mut(&mut self, kind: DeclarationKind) -> &mut DeclarationMap {
        match kind {
            DeclarationKind::Function => &mut self.functions,
            DeclarationKind::Type => &mut self.types,
            DeclarationKind::External => &mut self.externals,
        }
    }

    /// Record a declaration, replacing any earlier one with the same name.
    pub fn insert(&mut self, kind: DeclarationKind, declaration: Declaration) {
        self.category_mut(kind)
            .insert(declaration.name.clone(), declaration);
    }

    /// Total number of declarations across categories.
    pub fn len(&self) -> usize {
        self.functions.len() + self.types.len() + self.externals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
