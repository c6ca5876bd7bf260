//! Declaration extraction from a parsed module.
//!
//! Walks a syntax tree depth-first and collects every function, type and
//! external declaration the grammar recognizes, keyed by name. A declaration
//! is a stopping point: its subtree is not searched for further declarations.
//!
//! # Naming
//!
//! Function-like declarations nested inside a module are qualified as
//! `"<Module> --> <name>"`. Qualification is best-effort:
//!
//! 1. the nearest enclosing container (e.g. `module_binding`) supplies its name;
//! 2. failing that, the text of the first child of the declaration's
//!    grandparent is used;
//! 3. failing that, the plain name is kept.
//!
//! Declarations without a discoverable name are skipped, and a name seen twice
//! keeps the later declaration.

use tracing::{debug, trace};

use crate::grammar::{Grammar, NodeClass};
use crate::node::SyntaxNode;
use crate::types::{Declaration, DeclarationKind, Declarations, QUALIFIER_SEPARATOR};

pub mod helpers;
pub mod signature;

use helpers::{container_name, declared_name, grandparent_lead_text};
use signature::signature;

/// Extract all declarations under `root`.
pub fn extract<N: SyntaxNode>(root: &N, grammar: &Grammar) -> Declarations {
    let mut declarations = Declarations::new();

    // Each entry carries its depth; `ancestors` is cut back to that depth on
    // pop, so it always holds the path from the root to the popped node's parent.
    let mut stack: Vec<(N, usize)> = vec![(root.clone(), 0)];
    let mut ancestors: Vec<N> = Vec::new();

    while let Some((node, depth)) = stack.pop() {
        ancestors.truncate(depth);

        match grammar.classify(node.kind()) {
            NodeClass::Declaration(kind) => {
                match build_declaration(&node, kind, &ancestors, grammar) {
                    Some(declaration) => declarations.insert(kind, declaration),
                    None => trace!(
                        kind = node.kind(),
                        row = node.start_point().row,
                        "skipping unnamed declaration"
                    ),
                }
            }
            NodeClass::Other => {
                let children = node.named_children();
                ancestors.push(node);
                stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
            }
        }
    }

    debug!(
        functions = declarations.functions.len(),
        types = declarations.types.len(),
        externals = declarations.externals.len(),
        "extracted declarations"
    );
    declarations
}

fn build_declaration<N: SyntaxNode>(
    node: &N,
    kind: DeclarationKind,
    ancestors: &[N],
    grammar: &Grammar,
) -> Option<Declaration> {
    let shape = grammar.shape(kind);
    let mut name = declared_name(node, shape)?;

    if shape.qualify {
        if let Some(qualifier) = qualifier(ancestors, grammar) {
            name = format!("{}{}{}", qualifier, QUALIFIER_SEPARATOR, name);
        }
    }

    Some(Declaration {
        name,
        signature: signature(node),
        source_text: node.text_lossy(),
        start: node.start_point(),
        end: node.end_point(),
    })
}

/// Qualifier for a declaration whose parent is `ancestors.last()`.
///
/// Declarations directly under the file root are never qualified.
fn qualifier<N: SyntaxNode>(ancestors: &[N], grammar: &Grammar) -> Option<String> {
    let parent = ancestors.last()?;
    if grammar.is_root(parent.kind()) {
        return None;
    }
    container_name(ancestors, grammar).or_else(|| grandparent_lead_text(ancestors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{ContainerShape, DeclarationShape};
    use crate::node::TsNode;
    use crate::snapshot::{SnapshotBuilder, SyntaxSnapshot};

    // ------------------------------------------------------------------
    // ReScript-shaped fixtures
    // ------------------------------------------------------------------

    fn let_decl(b: &mut SnapshotBuilder, name: &str, value: &str) {
        b.open("let_declaration");
        b.token("let").gap(" ");
        b.open("let_binding");
        b.leaf("value_identifier", name).gap(" ").token("=").gap(" ");
        b.leaf("number", value);
        b.close();
        b.close();
    }

    fn type_decl(b: &mut SnapshotBuilder, name: &str, body: &str) {
        b.open("type_declaration");
        b.token("type").gap(" ");
        b.open("type_binding");
        b.leaf("type_identifier", name).gap(" ").token("=").gap(" ");
        b.leaf("type_identifier", body);
        b.close();
        b.close();
    }

    fn external_decl(b: &mut SnapshotBuilder, name: &str, target: &str) {
        b.open("external_declaration");
        b.token("external").gap(" ");
        b.leaf("value_identifier", name).gap(" ").token(":").gap(" ");
        b.leaf("type_identifier", "unit").gap(" ").token("=").gap(" ");
        b.leaf("string", target);
        b.close();
    }

    fn module_decl(b: &mut SnapshotBuilder, name: &str, body: impl FnOnce(&mut SnapshotBuilder)) {
        b.open("module_declaration");
        b.token("module").gap(" ");
        b.open("module_binding");
        b.leaf("module_identifier", name).gap(" ").token("=").gap(" ");
        b.open("block");
        b.token("{").gap("\n");
        body(b);
        b.gap("\n").token("}");
        b.close();
        b.close();
        b.close();
    }

    fn file(body: impl FnOnce(&mut SnapshotBuilder)) -> SyntaxSnapshot {
        let mut b = SnapshotBuilder::new();
        b.open("source_file");
        body(&mut b);
        b.close();
        b.finish()
    }

    fn extract_snapshot(snapshot: &SyntaxSnapshot) -> Declarations {
        extract(&snapshot.root().unwrap(), &Grammar::rescript())
    }

    #[test]
    fn test_extracts_each_category() {
        let snapshot = file(|b| {
            let_decl(b, "x", "1");
            b.gap("\n");
            type_decl(b, "t", "int");
            b.gap("\n");
            external_decl(b, "log", "\"console.log\"");
        });
        let decls = extract_snapshot(&snapshot);

        assert_eq!(decls.functions.keys().collect::<Vec<_>>(), vec!["x"]);
        assert_eq!(decls.types.keys().collect::<Vec<_>>(), vec!["t"]);
        assert_eq!(decls.externals.keys().collect::<Vec<_>>(), vec!["log"]);

        let x = &decls.functions["x"];
        assert_eq!(x.source_text, "let x = 1");
        assert_eq!(x.start, crate::types::Point::new(0, 0));
        assert_eq!(x.end, crate::types::Point::new(0, 9));
        assert_eq!(x.signature.kind(), "let_declaration");

        let log = &decls.externals["log"];
        assert_eq!(log.start.row, 2);
    }

    #[test]
    fn test_qualifies_nested_functions() {
        let snapshot = file(|b| {
            module_decl(b, "Utils", |b| {
                let_decl(b, "helper", "1");
                b.gap("\n");
                type_decl(b, "inner", "string");
            });
        });
        let decls = extract_snapshot(&snapshot);

        assert!(decls.functions.contains_key("Utils --> helper"));
        // Types are never qualified.
        assert!(decls.types.contains_key("inner"));
    }

    #[test]
    fn test_nested_modules_use_nearest_container() {
        let snapshot = file(|b| {
            module_decl(b, "Outer", |b| {
                let_decl(b, "a", "1");
                b.gap("\n");
                module_decl(b, "Inner", |b| let_decl(b, "b", "2"));
            });
        });
        let decls = extract_snapshot(&snapshot);

        let names: Vec<&String> = decls.functions.keys().collect();
        assert_eq!(names, vec!["Inner --> b", "Outer --> a"]);
    }

    #[test]
    fn test_falls_back_to_grandparent_lead() {
        // let_declaration nested in something that is not a known container:
        // source_file > switch_match > block > let_declaration
        let snapshot = file(|b| {
            b.open("switch_match");
            b.leaf("variant_identifier", "Some").gap(" ");
            b.open("block");
            let_decl(b, "y", "3");
            b.close();
            b.close();
        });
        let decls = extract_snapshot(&snapshot);

        assert!(decls.functions.contains_key("Some --> y"));
    }

    #[test]
    fn test_unqualified_when_no_lookup_succeeds() {
        // Parent is not the root, but there is no container and no grandparent.
        let mut b = SnapshotBuilder::new();
        b.open("block");
        let_decl(&mut b, "z", "4");
        b.close();
        let snapshot = b.finish();

        let decls = extract(&snapshot.root().unwrap(), &Grammar::rescript());
        assert!(decls.functions.contains_key("z"));
    }

    #[test]
    fn test_skips_unnamed_declarations() {
        let snapshot = file(|b| {
            b.open("let_declaration");
            b.token("let").gap(" ");
            b.open("let_binding");
            b.leaf("unit", "()").gap(" ").token("=").gap(" ");
            b.leaf("number", "1");
            b.close();
            b.close();
            b.gap("\n");
            let_decl(b, "named", "2");
        });
        let decls = extract_snapshot(&snapshot);

        assert_eq!(decls.functions.len(), 1);
        assert!(decls.functions.contains_key("named"));
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let snapshot = file(|b| {
            let_decl(b, "x", "1");
            b.gap("\n");
            let_decl(b, "x", "2");
        });
        let decls = extract_snapshot(&snapshot);

        assert_eq!(decls.functions.len(), 1);
        assert_eq!(decls.functions["x"].source_text, "let x = 2");
        assert_eq!(decls.functions["x"].start.row, 1);
    }

    #[test]
    fn test_does_not_descend_into_declarations() {
        // let outer = { let inner = 1 } must only yield `outer`.
        let snapshot = file(|b| {
            b.open("let_declaration");
            b.token("let").gap(" ");
            b.open("let_binding");
            b.leaf("value_identifier", "outer").gap(" ").token("=").gap(" ");
            b.open("block");
            b.token("{");
            let_decl(b, "inner", "1");
            b.token("}");
            b.close();
            b.close();
            b.close();
        });
        let decls = extract_snapshot(&snapshot);

        assert_eq!(decls.functions.keys().collect::<Vec<_>>(), vec!["outer"]);
    }

    #[test]
    fn test_empty_file() {
        let snapshot = file(|_| {});
        assert!(extract_snapshot(&snapshot).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let snapshot = file(|b| {
            for (i, name) in ["c", "a", "b"].iter().enumerate() {
                let_decl(b, name, &i.to_string());
                b.gap("\n");
            }
        });
        let first = extract_snapshot(&snapshot);
        let second = extract_snapshot(&snapshot);
        assert_eq!(first, second);
        assert_eq!(first.functions.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    // ------------------------------------------------------------------
    // Live tree-sitter trees, using the Rust grammar's layout
    // ------------------------------------------------------------------

    const RUST_CONTAINERS: &[ContainerShape] = &[ContainerShape {
        kind: "mod_item",
        name: "identifier",
    }];

    fn rust_grammar() -> Grammar {
        Grammar {
            root: "source_file",
            function: DeclarationShape {
                kind: "function_item",
                binding: None,
                name: "identifier",
                qualify: true,
            },
            type_decl: DeclarationShape {
                kind: "struct_item",
                binding: None,
                name: "type_identifier",
                qualify: false,
            },
            external: DeclarationShape {
                kind: "function_signature_item",
                binding: None,
                name: "identifier",
                qualify: false,
            },
            containers: RUST_CONTAINERS,
        }
    }

    fn extract_rust(source: &str) -> Declarations {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_rust::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse(source, None).unwrap();
        extract(&TsNode::new(tree.root_node(), source.as_bytes()), &rust_grammar())
    }

    #[test]
    fn test_tree_sitter_extraction() {
        let decls = extract_rust(
            r#"
struct Point { x: i32 }

fn top() -> i32 { 1 }

mod shapes {
    fn area() -> i32 { 2 }
}

extern "C" {
    fn abs(x: i32) -> i32;
}
"#,
        );

        assert!(decls.types.contains_key("Point"));
        assert!(decls.functions.contains_key("top"));
        assert!(decls.functions.contains_key("shapes --> area"));
        assert!(decls.externals.contains_key("abs"));
        assert_eq!(decls.functions["top"].source_text, "fn top() -> i32 { 1 }");
    }

    #[test]
    fn test_tree_sitter_signature_ignores_layout() {
        let compact = extract_rust("fn f(a: i32) -> i32 { a + 1 }");
        let spread = extract_rust("fn f(\n    a: i32,\n) -> i32 {\n    a + 1\n}\n");
        let changed = extract_rust("fn f(a: i32) -> i32 { a + 2 }");

        assert_eq!(
            compact.functions["f"].signature,
            spread.functions["f"].signature
        );
        assert_ne!(
            compact.functions["f"].signature,
            changed.functions["f"].signature
        );
    }
}
