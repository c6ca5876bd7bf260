//! Comparator logic for diffing extracted declarations.

use tracing::debug;

use crate::differ::changes::{
    ChangeMode, ChangeRecord, ChangeReport, DeclarationText, ModifiedDeclaration, SpanChange,
};
use crate::extractor::extract;
use crate::grammar::Grammar;
use crate::node::SyntaxNode;
use crate::types::{DeclarationKind, DeclarationMap, Declarations};

/// Diff one declaration category.
///
/// Names are matched exactly. A name present on both sides is reported as
/// modified only when its signature differs. Every list comes out in
/// ascending name order because the maps are ordered.
pub fn diff_category(before: &DeclarationMap, after: &DeclarationMap) -> ChangeRecord {
    let mut record = ChangeRecord::default();

    // Added
    for (name, decl) in after {
        if !before.contains_key(name) {
            record
                .added
                .push(DeclarationText::new(name.as_str(), decl.source_text.as_str()));
        }
    }

    // Deleted
    for (name, decl) in before {
        if !after.contains_key(name) {
            record
                .deleted
                .push(DeclarationText::new(name.as_str(), decl.source_text.as_str()));
        }
    }

    // Modified
    for (name, old) in before {
        let Some(new) = after.get(name) else {
            continue;
        };
        if old.signature != new.signature {
            record.modified.push(ModifiedDeclaration {
                name: name.clone(),
                old_text: old.source_text.clone(),
                new_text: new.source_text.clone(),
                span: SpanChange {
                    old_start: old.start,
                    old_end: old.end,
                    new_start: new.start,
                    new_end: new.end,
                },
            });
        }
    }

    record
}

/// Compare two extracted versions of a module.
pub fn compare_declarations(
    module_name: &str,
    before: &Declarations,
    after: &Declarations,
) -> ChangeReport {
    let mut report = ChangeReport::new(module_name);
    for kind in DeclarationKind::ALL {
        *report.record_mut(kind) = diff_category(before.category(kind), after.category(kind));
    }

    debug!(
        module = module_name,
        changes = report.change_count(),
        "compared declarations"
    );
    report
}

/// Report every declaration of a single version as added or deleted.
///
/// Models a file that was created or removed as a whole. No modified entries
/// are produced.
pub fn single_declarations(
    module_name: &str,
    declarations: &Declarations,
    mode: ChangeMode,
) -> ChangeReport {
    let mut report = ChangeReport::new(module_name);
    for kind in DeclarationKind::ALL {
        let entries: Vec<DeclarationText> = declarations
            .category(kind)
            .iter()
            .map(|(name, decl)| DeclarationText::new(name.as_str(), decl.source_text.as_str()))
            .collect();

        let record = report.record_mut(kind);
        match mode {
            ChangeMode::Added => record.added = entries,
            ChangeMode::Deleted => record.deleted = entries,
        }
    }

    debug!(
        module = module_name,
        mode = mode.as_str(),
        changes = report.change_count(),
        "reported single version"
    );
    report
}

/// Extract both trees and compare them.
pub fn compare_trees<A: SyntaxNode, B: SyntaxNode>(
    module_name: &str,
    before: &A,
    after: &B,
    grammar: &Grammar,
) -> ChangeReport {
    let before = extract(before, grammar);
    let after = extract(after, grammar);
    compare_declarations(module_name, &before, &after)
}

/// Extract one tree and frame it as wholly added or deleted.
pub fn single_tree<N: SyntaxNode>(
    module_name: &str,
    root: &N,
    grammar: &Grammar,
    mode: ChangeMode,
) -> ChangeReport {
    single_declarations(module_name, &extract(root, grammar), mode)
}
