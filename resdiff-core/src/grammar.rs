//! Node-kind tables describing where declarations live in a grammar.
//!
//! The extractor never compares kind strings directly; it asks the grammar to
//! classify a node and to describe how its name is reached.

use crate::types::DeclarationKind;

/// How a declaration node and its name are laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeclarationShape {
    /// Kind of the declaration node.
    pub kind: &'static str,
    /// Intermediate binding node holding the name, if any.
    pub binding: Option<&'static str>,
    /// Kind of the named node carrying the declared name.
    pub name: &'static str,
    /// Whether nested declarations are prefixed with their container name.
    pub qualify: bool,
}

/// A construct whose declarations are qualified by its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainerShape {
    pub kind: &'static str,
    /// Kind of the named child holding the container name.
    pub name: &'static str,
}

/// Result of classifying a node kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeClass {
    Declaration(DeclarationKind),
    Other,
}

/// Declaration layout of one tree-sitter grammar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grammar {
    /// Kind of the file root node.
    pub root: &'static str,
    pub function: DeclarationShape,
    pub type_decl: DeclarationShape,
    pub external: DeclarationShape,
    pub containers: &'static [ContainerShape],
}

const RESCRIPT_CONTAINERS: &[ContainerShape] = &[ContainerShape {
    kind: "module_binding",
    name: "module_identifier",
}];

impl Grammar {
    /// Layout of `tree-sitter-rescript`.
    pub const fn rescript() -> Self {
        Self {
            root: "source_file",
            function: DeclarationShape {
                kind: "let_declaration",
                binding: Some("let_binding"),
                name: "value_identifier",
                qualify: true,
            },
            type_decl: DeclarationShape {
                kind: "type_declaration",
                binding: Some("type_binding"),
                name: "type_identifier",
                qualify: false,
            },
            external: DeclarationShape {
                kind: "external_declaration",
                binding: None,
                name: "value_identifier",
                qualify: false,
            },
            containers: RESCRIPT_CONTAINERS,
        }
    }

    /// Shape for one declaration category.
    pub fn shape(&self, kind: DeclarationKind) -> &DeclarationShape {
        match kind {
            DeclarationKind::Function => &self.function,
            DeclarationKind::Type => &self.type_decl,
            DeclarationKind::External => &self.external,
        }
    }

    /// Classify a node kind.
    pub fn classify(&self, kind: &str) -> NodeClass {
        DeclarationKind::ALL
            .into_iter()
            .find(|&category| self.shape(category).kind == kind)
            .map_or(NodeClass::Other, NodeClass::Declaration)
    }

    /// Container shape for a node kind, if it is one.
    pub fn container(&self, kind: &str) -> Option<&ContainerShape> {
        self.containers.iter().find(|c| c.kind == kind)
    }

    pub fn is_root(&self, kind: &str) -> bool {
        self.root == kind
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::rescript()
    }
}
