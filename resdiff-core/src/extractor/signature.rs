//! Structural signatures of syntax subtrees.
//!
//! A signature keeps node kinds and the text of named leaves, and drops
//! everything else: anonymous tokens, whitespace and layout. Two declarations
//! with equal signatures are considered unchanged.
//!
//! The tree shape is stored flat, in preorder, with each branch recording how
//! many children follow it. Preorder plus arity identifies a tree uniquely, and
//! the flat form keeps comparison, hashing and dropping iterative for deeply
//! nested expressions.

use serde::Serialize;

use crate::node::SyntaxNode;

/// One node of a signature in preorder.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureNode {
    /// A node with no named children, with its decoded text.
    Leaf { kind: String, text: String },
    /// A node whose `arity` named children follow it.
    Branch { kind: String, arity: usize },
}

impl SignatureNode {
    pub fn kind(&self) -> &str {
        match self {
            SignatureNode::Leaf { kind, .. } | SignatureNode::Branch { kind, .. } => kind,
        }
    }
}

/// Canonical structural form of a subtree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Signature {
    nodes: Vec<SignatureNode>,
}

impl Signature {
    /// Signature of a single leaf.
    pub fn leaf(kind: &str, text: &str) -> Self {
        Self {
            nodes: vec![SignatureNode::Leaf {
                kind: kind.to_string(),
                text: text.to_string(),
            }],
        }
    }

    /// Nodes in preorder.
    pub fn nodes(&self) -> &[SignatureNode] {
        &self.nodes
    }

    /// Kind of the root node.
    pub fn kind(&self) -> &str {
        self.nodes.first().map(SignatureNode::kind).unwrap_or("")
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the root has no named children.
    pub fn is_leaf(&self) -> bool {
        matches!(self.nodes.first(), Some(SignatureNode::Leaf { .. }))
    }
}

/// Compute the signature of `node`.
///
/// Only named children are visited. Leaf text is decoded lossily.
pub fn signature<N: SyntaxNode>(node: &N) -> Signature {
    let mut nodes = Vec::new();
    let mut stack = vec![node.clone()];

    while let Some(current) = stack.pop() {
        let named = current.named_children();
        if named.is_empty() {
            nodes.push(SignatureNode::Leaf {
                kind: current.kind().to_string(),
                text: current.text_lossy(),
            });
        } else {
            nodes.push(SignatureNode::Branch {
                kind: current.kind().to_string(),
                arity: named.len(),
            });
            stack.extend(named.into_iter().rev());
        }
    }

    Signature { nodes }
}
