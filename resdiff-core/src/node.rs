//! Node adapter over parse trees.
//!
//! The extractor and canonicalizer only need a small read-only view of a
//! syntax tree. `SyntaxNode` captures that view so the engine can run over a
//! live tree-sitter tree (`TsNode`) or over a stored snapshot
//! (`crate::snapshot::SnapshotNode`) alike.

use crate::types::Point;

/// Read-only access to one node of a concrete syntax tree.
pub trait SyntaxNode: Clone {
    /// Grammar type tag of the node (e.g. `let_declaration`).
    fn kind(&self) -> &str;

    /// Whether the node is a named grammar node rather than an anonymous token.
    fn is_named(&self) -> bool;

    /// All children, named and anonymous, in document order.
    fn children(&self) -> Vec<Self>;

    fn start_point(&self) -> Point;

    fn end_point(&self) -> Point;

    /// Raw source bytes covered by the node.
    fn text(&self) -> &[u8];

    /// Named children only, in document order.
    fn named_children(&self) -> Vec<Self> {
        self.children()
            .into_iter()
            .filter(|child| child.is_named())
            .collect()
    }

    /// Node text decoded as UTF-8, replacing invalid sequences.
    fn text_lossy(&self) -> String {
        String::from_utf8_lossy(self.text()).into_owned()
    }
}

/// A tree-sitter node paired with the source it was parsed from.
#[derive(Clone, Copy, Debug)]
pub struct TsNode<'a> {
    node: tree_sitter::Node<'a>,
    source: &'a [u8],
}

impl<'a> TsNode<'a> {
    pub fn new(node: tree_sitter::Node<'a>, source: &'a [u8]) -> Self {
        Self { node, source }
    }

    /// The wrapped tree-sitter node.
    pub fn inner(&self) -> tree_sitter::Node<'a> {
        self.node
    }
}

impl SyntaxNode for TsNode<'_> {
    fn kind(&self) -> &str {
        self.node.kind()
    }

    fn is_named(&self) -> bool {
        self.node.is_named()
    }

    fn children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        self.node
            .children(&mut cursor)
            .map(|child| TsNode::new(child, self.source))
            .collect()
    }

    fn start_point(&self) -> Point {
        self.node.start_position().into()
    }

    fn end_point(&self) -> Point {
        self.node.end_position().into()
    }

    fn text(&self) -> &[u8] {
        self.source.get(self.node.byte_range()).unwrap_or(&[])
    }
}
