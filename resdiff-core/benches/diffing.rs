//! Benchmark for extraction and diffing performance.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use resdiff_core::differ::{compare_declarations, compare_trees};
use resdiff_core::extractor::extract;
use resdiff_core::grammar::Grammar;
use resdiff_core::snapshot::{SnapshotBuilder, SyntaxSnapshot};

/// A module with `count` functions. Every `changed_every`-th body is bumped (0: none).
fn synth_module(count: usize, changed_every: usize) -> SyntaxSnapshot {
    let mut b = SnapshotBuilder::new();
    b.open("source_file");
    for i in 0..count {
        let value = if changed_every > 0 && i % changed_every == 0 {
            format!("{}", i + 1)
        } else {
            format!("{}", i)
        };
        b.open("let_declaration");
        b.token("let").gap(" ");
        b.open("let_binding");
        b.leaf("value_identifier", &format!("f{}", i))
            .gap(" ")
            .token("=")
            .gap(" ");
        b.open("binary_expression");
        b.leaf("value_identifier", "x").gap(" ").token("+").gap(" ");
        b.leaf("number", &value);
        b.close();
        b.close();
        b.close();
        b.gap("\n");
    }
    b.close();
    b.finish()
}

fn bench_extract(c: &mut Criterion) {
    let module = synth_module(2_000, 0);
    let grammar = Grammar::rescript();

    c.bench_function("extract_2000_declarations", |b| {
        b.iter(|| black_box(extract(&module.root().unwrap(), &grammar)))
    });
}

fn bench_diff(c: &mut Criterion) {
    let before = synth_module(2_000, 0);
    let after = synth_module(2_000, 10);
    let grammar = Grammar::rescript();

    c.bench_function("compare_trees_2000_declarations", |b| {
        b.iter(|| {
            black_box(compare_trees(
                "Bench",
                &before.root().unwrap(),
                &after.root().unwrap(),
                &grammar,
            ))
        })
    });

    let old = extract(&before.root().unwrap(), &grammar);
    let new = extract(&after.root().unwrap(), &grammar);
    c.bench_function("compare_declarations_2000", |b| {
        b.iter(|| black_box(compare_declarations("Bench", &old, &new)))
    });
}

criterion_group!(benches, bench_extract, bench_diff);
criterion_main!(benches);
