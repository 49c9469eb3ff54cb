use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mathquiz_core::catalog::SymbolCatalog;
use mathquiz_core::classifier::classify;

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let catalog = SymbolCatalog::builtin();

    let short = "Prove that \\neg (A \\land B) \\equiv (\\neg A) \\vee (\\neg B)";

    let long = {
        let mut s = String::new();
        for i in 0..200 {
            s.push_str(&format!(
                "Show \\forall x \\in A_{i}, x^2 \\geq 0 and draw a truth table. "
            ));
        }
        s
    };

    group.bench_function("short", |b| {
        b.iter(|| classify(black_box(short), black_box(&catalog)))
    });
    group.bench_function("long", |b| {
        b.iter(|| classify(black_box(&long), black_box(&catalog)))
    });

    group.finish();
}

criterion_group!(benches, bench_classify);
criterion_main!(benches);
