//! Formula parse and evaluation throughput
//!
//! Measures a representative cost formula and a full tier quote.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use upgrades::formula::{parse, VariableBinding};
use upgrades::{Dimension, UpgradeConfig, VanillaCatalog};

const COST_FORMULA: &str = "([level] ^ 2 * 50 + [numberPlayer] * 20) * (1 + sqrt([islandLevel]) / 10)";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_cost_formula", |b| b.iter(|| parse(black_box(COST_FORMULA))));
}

fn bench_eval(c: &mut Criterion) {
    let expression = parse(COST_FORMULA).expect("formula parses");
    let mut group = c.benchmark_group("eval_cost_formula");
    for level in [1.0, 10.0, 100.0] {
        let vars = VariableBinding::new(level, 250.0, 4.0);
        group.bench_function(format!("level_{}", level), |b| {
            b.iter(|| expression.eval(black_box(&vars)))
        });
    }
    group.finish();
}

fn bench_quote(c: &mut Criterion) {
    let config = UpgradeConfig::defaults().expect("default config parses");
    let (index, _) = config.build_index(&VanillaCatalog).expect("default config builds");
    c.bench_function("quote_range_upgrade", |b| {
        b.iter(|| index.quote(&Dimension::Range, black_box("AcidIsland"), black_box(7), 40, 3))
    });
}

criterion_group!(benches, bench_parse, bench_eval, bench_quote);
criterion_main!(benches);
