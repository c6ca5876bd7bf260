//! Change records and the per-module change report.

use serde::ser::{SerializeStruct, SerializeTuple};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::DiffError;
use crate::types::{DeclarationKind, Point};

/// Type of change detected for a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeType {
    Added,
    Modified,
    Deleted,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Modified => "modified",
            ChangeType::Deleted => "deleted",
        }
    }
}

/// Framing for a single file version: wholly added or wholly deleted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChangeMode {
    Added,
    #[default]
    Deleted,
}

impl ChangeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeMode::Added => "added",
            ChangeMode::Deleted => "deleted",
        }
    }
}

impl FromStr for ChangeMode {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "added" => Ok(ChangeMode::Added),
            "deleted" => Ok(ChangeMode::Deleted),
            _ => Err(DiffError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for ChangeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declaration reported with one version of its text.
///
/// Serializes as `[name, text]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclarationText {
    pub name: String,
    pub text: String,
}

impl DeclarationText {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl Serialize for DeclarationText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.name)?;
        tuple.serialize_element(&self.text)?;
        tuple.end()
    }
}

/// Old and new positions of a modified declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SpanChange {
    pub old_start: Point,
    pub old_end: Point,
    pub new_start: Point,
    pub new_end: Point,
}

/// A declaration present in both versions with a different structure.
///
/// Serializes as `[name, old_text, new_text, span]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModifiedDeclaration {
    pub name: String,
    pub old_text: String,
    pub new_text: String,
    pub span: SpanChange,
}

impl Serialize for ModifiedDeclaration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(4)?;
        tuple.serialize_element(&self.name)?;
        tuple.serialize_element(&self.old_text)?;
        tuple.serialize_element(&self.new_text)?;
        tuple.serialize_element(&self.span)?;
        tuple.end()
    }
}

/// Changes within one declaration category. Every list is sorted by name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    pub added: Vec<DeclarationText>,
    pub modified: Vec<ModifiedDeclaration>,
    pub deleted: Vec<DeclarationText>,
}

impl ChangeRecord {
    /// Number of changed declarations.
    pub fn len(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, change_type: ChangeType) -> usize {
        match change_type {
            ChangeType::Added => self.added.len(),
            ChangeType::Modified => self.modified.len(),
            ChangeType::Deleted => self.deleted.len(),
        }
    }
}

/// Declaration-level changes for one module.
///
/// Serializes as a flat object: `moduleName` plus nine lists named
/// `added|modified|deleted` × `Functions|Types|Externals`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeReport {
    pub module_name: String,
    pub functions: ChangeRecord,
    pub types: ChangeRecord,
    pub externals: ChangeRecord,
}

impl ChangeReport {
    /// A report with no changes.
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            ..Default::default()
        }
    }

    /// Record for one category.
    pub fn record(&self, kind: DeclarationKind) -> &ChangeRecord {
        match kind {
            DeclarationKind::Function => &self.functions,
            DeclarationKind::Type => &self.types,
            DeclarationKind::External => &self.externals,
        }
    }

    pub(crate) fn record_mut(&mut self, kind: DeclarationKind) -> &mut ChangeRecord {
        match kind {
            DeclarationKind::Function => &mut self.functions,
            DeclarationKind::Type => &mut self.types,
            DeclarationKind::External => &mut self.externals,
        }
    }

    /// Total number of changed declarations.
    pub fn change_count(&self) -> usize {
        self.functions.len() + self.types.len() + self.externals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.change_count() == 0
    }

    /// Count changes per category and change type.
    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        for kind in DeclarationKind::ALL {
            let record = self.record(kind);
            for change_type in [ChangeType::Added, ChangeType::Modified, ChangeType::Deleted] {
                summary.record(kind, change_type, record.count(change_type) as u32);
            }
        }
        summary
    }
}

impl Serialize for ChangeReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ChangeReport", 10)?;
        state.serialize_field("moduleName", &self.module_name)?;
        state.serialize_field("addedFunctions", &self.functions.added)?;
        state.serialize_field("modifiedFunctions", &self.functions.modified)?;
        state.serialize_field("deletedFunctions", &self.functions.deleted)?;
        state.serialize_field("addedTypes", &self.types.added)?;
        state.serialize_field("modifiedTypes", &self.types.modified)?;
        state.serialize_field("deletedTypes", &self.types.deleted)?;
        state.serialize_field("addedExternals", &self.externals.added)?;
        state.serialize_field("modifiedExternals", &self.externals.modified)?;
        state.serialize_field("deletedExternals", &self.externals.deleted)?;
        state.end()
    }
}

/// Summary statistics for a report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub functions_added: u32,
    pub functions_modified: u32,
    pub functions_deleted: u32,

    pub types_added: u32,
    pub types_modified: u32,
    pub types_deleted: u32,

    pub externals_added: u32,
    pub externals_modified: u32,
    pub externals_deleted: u32,
}

impl DiffSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` changes of one type to a category's counters.
    pub fn record(&mut self, kind: DeclarationKind, change_type: ChangeType, count: u32) {
        let counter = match (kind, change_type) {
            (DeclarationKind::Function, ChangeType::Added) => &mut self.functions_added,
            (DeclarationKind::Function, ChangeType::Modified) => &mut self.functions_modified,
            (DeclarationKind::Function, ChangeType::Deleted) => &mut self.functions_deleted,
            (DeclarationKind::Type, ChangeType::Added) => &mut self.types_added,
            (DeclarationKind::Type, ChangeType::Modified) => &mut self.types_modified,
            (DeclarationKind::Type, ChangeType::Deleted) => &mut self.types_deleted,
            (DeclarationKind::External, ChangeType::Added) => &mut self.externals_added,
            (DeclarationKind::External, ChangeType::Modified) => &mut self.externals_modified,
            (DeclarationKind::External, ChangeType::Deleted) => &mut self.externals_deleted,
        };
        *counter += count;
    }

    /// Counters for one category as `(added, modified, deleted)`.
    pub fn counts(&self, kind: DeclarationKind) -> (u32, u32, u32) {
        match kind {
            DeclarationKind::Function => (
                self.functions_added,
                self.functions_modified,
                self.functions_deleted,
            ),
            DeclarationKind::Type => (self.types_added, self.types_modified, self.types_deleted),
            DeclarationKind::External => (
                self.externals_added,
                self.externals_modified,
                self.externals_deleted,
            ),
        }
    }

    /// Merge another summary into this one.
    pub fn merge(&mut self, other: &DiffSummary) {
        for kind in DeclarationKind::ALL {
            let (added, modified, deleted) = other.counts(kind);
            self.record(kind, ChangeType::Added, added);
            self.record(kind, ChangeType::Modified, modified);
            self.record(kind, ChangeType::Deleted, deleted);
        }
    }

    /// Generate human-readable summary string.
    pub fn text(&self) -> String {
        let mut parts = Vec::new();

        for kind in DeclarationKind::ALL {
            let (added, modified, deleted) = self.counts(kind);
            let mut kind_parts = Vec::new();
            if added > 0 {
                kind_parts.push(format!("{} added", added));
            }
            if modified > 0 {
                kind_parts.push(format!("{} modified", modified));
            }
            if deleted > 0 {
                kind_parts.push(format!("{} deleted", deleted));
            }
            if !kind_parts.is_empty() {
                parts.push(format!("{}: {}", kind.plural(), kind_parts.join(", ")));
            }
        }

        if parts.is_empty() {
            "No changes".to_string()
        } else {
            parts.join("; ")
        }
    }
}
