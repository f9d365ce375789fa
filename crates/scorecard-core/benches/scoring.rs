use criterion::{black_box, criterion_group, criterion_main, Criterion};

use scorecard_core::engine::{compute_scores, statistics};
use scorecard_core::model::CheckedItem;
use scorecard_core::rubric::Rubric;

fn all_items(rubric: &Rubric) -> Vec<CheckedItem> {
    rubric
        .items()
        .filter_map(|(id, _)| rubric.checked_item(id))
        .collect()
}

fn legacy_items(rubric: &Rubric) -> Vec<CheckedItem> {
    all_items(rubric)
        .into_iter()
        .map(|mut item| {
            item.id = None;
            item
        })
        .collect()
}

fn bench_compute(c: &mut Criterion) {
    let rubric = Rubric::reference();
    let mut group = c.benchmark_group("compute_scores");

    let empty: Vec<CheckedItem> = Vec::new();
    group.bench_function("empty", |b| {
        b.iter(|| compute_scores(black_box(rubric), black_box(&empty)))
    });

    let full = all_items(rubric);
    group.bench_function("all_items", |b| {
        b.iter(|| compute_scores(black_box(rubric), black_box(&full)))
    });

    group.bench_function("statistics", |b| {
        let snapshot = compute_scores(rubric, &full);
        b.iter(|| statistics(black_box(rubric), black_box(&snapshot)))
    });

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let rubric = Rubric::reference();
    let mut group = c.benchmark_group("resolve");

    let with_ids = all_items(rubric);
    group.bench_function("by_id", |b| {
        b.iter(|| {
            with_ids
                .iter()
                .filter_map(|item| rubric.resolve(black_box(item)))
                .count()
        })
    });

    let by_label = legacy_items(rubric);
    group.bench_function("by_label", |b| {
        b.iter(|| {
            by_label
                .iter()
                .filter_map(|item| rubric.resolve(black_box(item)))
                .count()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_compute, bench_resolve);
criterion_main!(benches);
