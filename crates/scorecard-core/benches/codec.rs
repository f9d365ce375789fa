use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use scorecard_core::codec::{decode_document, export_record, DEFAULT_EXPORT_PREFIX};
use scorecard_core::engine::compute_scores;
use scorecard_core::model::{CandidateInfo, ScoreRecord};
use scorecard_core::rubric::Rubric;
use scorecard_core::validation::validate_imported_shape;

fn sample_record() -> ScoreRecord {
    let rubric = Rubric::reference();
    let checked: Vec<_> = rubric
        .items()
        .step_by(2)
        .filter_map(|(id, _)| rubric.checked_item(id))
        .collect();
    let snapshot = compute_scores(rubric, &checked);
    ScoreRecord {
        id: "bench".into(),
        info: CandidateInfo {
            candidate_name: "Maria da Silva".into(),
            interview_date: "2025-03-14".into(),
            position: "Backend".into(),
            interviewer: "João".into(),
            notes: "n".repeat(500),
        },
        total_score: snapshot.total(),
        max_total_score: snapshot.max_total(),
        scores: snapshot.scores,
        max_scores: snapshot.max_scores,
        checked_items: checked,
        timestamp: Utc.with_ymd_and_hms(2025, 3, 14, 15, 30, 0).unwrap(),
    }
}

fn bench_export(c: &mut Criterion) {
    let record = sample_record();
    let now = Utc.with_ymd_and_hms(2025, 3, 15, 9, 0, 0).unwrap();

    c.bench_function("export_record", |b| {
        b.iter(|| export_record(black_box(record.clone()), now, DEFAULT_EXPORT_PREFIX))
    });
}

fn bench_import(c: &mut Criterion) {
    let rubric = Rubric::reference();
    let now = Utc.with_ymd_and_hms(2025, 3, 15, 9, 0, 0).unwrap();
    let contents = export_record(sample_record(), now, DEFAULT_EXPORT_PREFIX)
        .unwrap()
        .contents;

    c.bench_function("parse_validate_decode", |b| {
        b.iter(|| {
            let value: serde_json::Value = serde_json::from_str(black_box(&contents)).unwrap();
            validate_imported_shape(&value, rubric).unwrap();
            decode_document(value).unwrap()
        })
    });
}

criterion_group!(benches, bench_export, bench_import);
criterion_main!(benches);
