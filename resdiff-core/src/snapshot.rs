//! Owned syntax-tree snapshots.
//!
//! A `SyntaxSnapshot` stores a parse tree as a flat node list plus the source
//! text it covers. Snapshots let the engine run without a live parser: they
//! can be captured from tree-sitter, written as JSON, read back later, or
//! composed by hand with `SnapshotBuilder`.
//!
//! Nodes are stored in preorder. Node 0 is the root and every child index is
//! greater than its parent's, so JSON nesting stays flat however deep the tree.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DiffError, Result};
use crate::node::SyntaxNode;
use crate::types::Point;

/// One node of a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub kind: String,
    pub named: bool,
    pub start_byte: usize,
    pub end_byte: usize,
    pub start: Point,
    pub end: Point,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<usize>,
}

/// A parse tree detached from its parser.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxSnapshot {
    pub source: String,
    pub nodes: Vec<SnapshotEntry>,
}

impl SyntaxSnapshot {
    /// Capture a tree-sitter tree parsed from `source`.
    ///
    /// Walks the tree with an explicit stack, so very deep trees are fine.
    pub fn capture(tree: &tree_sitter::Tree, source: &str) -> Self {
        let mut nodes: Vec<SnapshotEntry> = Vec::new();
        let mut stack = vec![(tree.root_node(), None::<usize>)];

        while let Some((node, parent)) = stack.pop() {
            let index = nodes.len();
            nodes.push(SnapshotEntry {
                kind: node.kind().to_string(),
                named: node.is_named(),
                start_byte: node.start_byte(),
                end_byte: node.end_byte(),
                start: node.start_position().into(),
                end: node.end_position().into(),
                children: Vec::new(),
            });
            if let Some(parent) = parent {
                nodes[parent].children.push(index);
            }

            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            for child in children.into_iter().rev() {
                stack.push((child, Some(index)));
            }
        }

        Self {
            source: source.to_string(),
            nodes,
        }
    }

    /// Root node, or `None` for an empty snapshot.
    pub fn root(&self) -> Option<SnapshotNode<'_>> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(SnapshotNode {
                snapshot: self,
                index: 0,
            })
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check that child links form a preorder tree rooted at node 0.
    ///
    /// Every node other than the root must be listed as a child exactly once.
    pub fn validate(&self) -> Result<()> {
        let mut has_parent = vec![false; self.nodes.len()];
        for (index, entry) in self.nodes.iter().enumerate() {
            for &child in &entry.children {
                if child <= index || child >= self.nodes.len() {
                    return Err(DiffError::InvalidSnapshot(format!(
                        "node {} has out-of-order child {}",
                        index, child
                    )));
                }
                if std::mem::replace(&mut has_parent[child], true) {
                    return Err(DiffError::InvalidSnapshot(format!(
                        "node {} is listed as a child more than once",
                        child
                    )));
                }
            }
            if entry.start_byte > entry.end_byte {
                return Err(DiffError::InvalidSnapshot(format!(
                    "node {} ends before it starts",
                    index
                )));
            }
        }
        if let Some(orphan) = has_parent.iter().skip(1).position(|&p| !p) {
            return Err(DiffError::InvalidSnapshot(format!(
                "node {} has no parent",
                orphan + 1
            )));
        }
        Ok(())
    }

    /// Decode and validate a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: SyntaxSnapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Encode as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Read a JSON snapshot from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| DiffError::read(path, e))?;
        Self::from_json(&json)
    }
}

/// A node handle into a `SyntaxSnapshot`.
#[derive(Clone, Copy, Debug)]
pub struct SnapshotNode<'a> {
    snapshot: &'a SyntaxSnapshot,
    index: usize,
}

impl<'a> SnapshotNode<'a> {
    fn entry(&self) -> &'a SnapshotEntry {
        &self.snapshot.nodes[self.index]
    }

    /// Position of this node in the snapshot's node list.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl SyntaxNode for SnapshotNode<'_> {
    fn kind(&self) -> &str {
        &self.entry().kind
    }

    fn is_named(&self) -> bool {
        self.entry().named
    }

    fn children(&self) -> Vec<Self> {
        self.entry()
            .children
            .iter()
            .filter(|&&child| child < self.snapshot.nodes.len())
            .map(|&child| SnapshotNode {
                snapshot: self.snapshot,
                index: child,
            })
            .collect()
    }

    fn start_point(&self) -> Point {
        self.entry().start
    }

    fn end_point(&self) -> Point {
        self.entry().end
    }

    fn text(&self) -> &[u8] {
        let entry = self.entry();
        self.snapshot
            .source
            .as_bytes()
            .get(entry.start_byte..entry.end_byte)
            .unwrap_or(&[])
    }
}

/// Composes a snapshot node by node, tracking offsets and points.
///
/// ```
/// use resdiff_core::snapshot::SnapshotBuilder;
///
/// let mut builder = SnapshotBuilder::new();
/// builder.open("source_file");
/// builder.open("external_declaration");
/// builder.token("external").gap(" ").leaf("value_identifier", "log");
/// builder.close();
/// let snapshot = builder.finish();
/// assert_eq!(snapshot.source, "external log");
/// ```
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    source: String,
    nodes: Vec<SnapshotEntry>,
    open: Vec<usize>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a named node; following nodes become its children until `close`.
    pub fn open(&mut self, kind: &str) -> &mut Self {
        let index = self.push_node(kind, true);
        self.open.push(index);
        self
    }

    /// End the innermost open node at the current offset.
    pub fn close(&mut self) -> &mut Self {
        if let Some(index) = self.open.pop() {
            self.nodes[index].end_byte = self.source.len();
        }
        self
    }

    /// Add a named node with no children.
    pub fn leaf(&mut self, kind: &str, text: &str) -> &mut Self {
        let index = self.push_node(kind, true);
        self.source.push_str(text);
        self.nodes[index].end_byte = self.source.len();
        self
    }

    /// Add an anonymous token. Its kind is its text, as in tree-sitter.
    pub fn token(&mut self, text: &str) -> &mut Self {
        let index = self.push_node(text, false);
        self.source.push_str(text);
        self.nodes[index].end_byte = self.source.len();
        self
    }

    /// Add source text that belongs to no node (whitespace, extras).
    pub fn gap(&mut self, text: &str) -> &mut Self {
        self.source.push_str(text);
        self
    }

    /// Close any open nodes and compute points.
    pub fn finish(mut self) -> SyntaxSnapshot {
        while !self.open.is_empty() {
            self.close();
        }

        let line_starts: Vec<usize> = std::iter::once(0)
            .chain(
                self.source
                    .bytes()
                    .enumerate()
                    .filter(|(_, b)| *b == b'\n')
                    .map(|(i, _)| i + 1),
            )
            .collect();
        let point_at = |byte: usize| {
            let row = line_starts.partition_point(|&start| start <= byte).saturating_sub(1);
            Point::new(row, byte - line_starts[row])
        };

        for entry in &mut self.nodes {
            entry.start = point_at(entry.start_byte);
            entry.end = point_at(entry.end_byte);
        }

        SyntaxSnapshot {
            source: self.source,
            nodes: self.nodes,
        }
    }

    fn push_node(&mut self, kind: &str, named: bool) -> usize {
        let index = self.nodes.len();
        let offset = self.source.len();
        self.nodes.push(SnapshotEntry {
            kind: kind.to_string(),
            named,
            start_byte: offset,
            end_byte: offset,
            start: Point::default(),
            end: Point::default(),
            children: Vec::new(),
        });
        if let Some(&parent) = self.open.last() {
            self.nodes[parent].children.push(index);
        }
        index
    }
}
