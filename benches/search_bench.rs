use cipherforge::alphabet::Alphabet;
use cipherforge::config::SearchParams;
use cipherforge::corpus::Corpus;
use cipherforge::ngram::{Counting, NgramTable, Smoothing};
use cipherforge::search::constraint::ConstraintOptimizer;
use cipherforge::search::local::BigramLogTable;
use cipherforge::search::LocalSearchOptimizer;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;

const TARGET: &str = "kanikanikoshitemotsuyamanoharuwasakuranohanaganagaku";
const PROBE: &str = "NDSBLHMRJCWUYTNDSBLH|MRJCWUYTSBLHNDCWUY|TNDSBLHMRJ";

fn setup_table() -> Arc<BigramLogTable> {
    let target = Alphabet::parse("aiueoksthrmnyw").unwrap();
    let counting = Counting::Smoothed(Smoothing {
        alphabet: target.clone(),
        pseudo_count: 1.0,
    });
    let bigrams = NgramTable::build(TARGET, 2, &counting).expect("Failed to build bigrams");
    Arc::new(BigramLogTable::from_table(&bigrams, &target).expect("Failed to build table"))
}

fn bench_local_steps(c: &mut Criterion) {
    let table = setup_table();
    let source = Alphabet::parse("NDSBLHMRJCWUYT").unwrap();
    let params = SearchParams {
        max_staleness: 2000,
        max_iterations: usize::MAX,
    };
    let mut search = LocalSearchOptimizer::new(table, source, PROBE, params, Some(1)).unwrap();

    c.bench_function("local_search_1000_steps", |b| {
        b.iter(|| {
            search.reset_staleness();
            black_box(search.run(1000))
        })
    });
}

fn bench_constraint_solve(c: &mut Criterion) {
    let source = Alphabet::parse("ABCDEF").unwrap();
    let target = Alphabet::parse("aiukst").unwrap();
    let corpus = Corpus::from_texts(&["ABCDEFABCD", "FEDCBA", "ACEBDF", "BADCFE"], "bench");
    let patterns: Vec<String> = ["ka", "tt", "sa", "iu"].iter().map(|s| s.to_string()).collect();
    let optimizer = ConstraintOptimizer::new(source, target, patterns, corpus);

    c.bench_function("constraint_solve_6x6", |b| {
        b.iter(|| black_box(optimizer.solve().unwrap().score))
    });
}

criterion_group!(benches, bench_local_steps, bench_constraint_solve);
criterion_main!(benches);
