//! Helper functions for locating names in a syntax tree.

use crate::grammar::{DeclarationShape, Grammar};
use crate::node::SyntaxNode;

/// Find the first child of a specific kind.
pub fn find_child_by_type<N: SyntaxNode>(node: &N, kind: &str) -> Option<N> {
    node.children().into_iter().find(|child| child.kind() == kind)
}

/// Find the first named child of a specific kind.
pub fn find_named_child_by_type<N: SyntaxNode>(node: &N, kind: &str) -> Option<N> {
    node.children()
        .into_iter()
        .find(|child| child.is_named() && child.kind() == kind)
}

/// Name declared by a declaration node, following its shape.
///
/// With a binding kind, every binding child is searched in order and the
/// first named name node beneath one wins (`let a = 1 and b = 2` yields `a`).
/// Without one, the name node must sit directly under the declaration.
/// Empty names count as missing.
pub fn declared_name<N: SyntaxNode>(node: &N, shape: &DeclarationShape) -> Option<String> {
    let name_node = match shape.binding {
        Some(binding) => node
            .children()
            .into_iter()
            .filter(|child| child.kind() == binding)
            .find_map(|child| find_named_child_by_type(&child, shape.name)),
        None => find_named_child_by_type(node, shape.name),
    }?;

    let name = name_node.text_lossy();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Name of the nearest enclosing container among `ancestors`.
///
/// `ancestors` runs from the root down to the declaration's parent.
pub fn container_name<N: SyntaxNode>(ancestors: &[N], grammar: &Grammar) -> Option<String> {
    ancestors.iter().rev().find_map(|ancestor| {
        let shape = grammar.container(ancestor.kind())?;
        let name = find_named_child_by_type(ancestor, shape.name)?;
        std::str::from_utf8(name.text())
            .ok()
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    })
}

/// Text of the first child of the declaration's grandparent.
///
/// This is the fixed-offset rule that matches ReScript's
/// `module_binding > block > let_declaration` nesting. Text must be valid
/// UTF-8; anything else yields `None`.
pub fn grandparent_lead_text<N: SyntaxNode>(ancestors: &[N]) -> Option<String> {
    let grandparent = ancestors.len().checked_sub(2).and_then(|i| ancestors.get(i))?;
    let lead = grandparent.children().into_iter().next()?;
    std::str::from_utf8(lead.text())
        .ok()
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
