use battlelens::api::{Dashboard, DashboardConfig, TransitionTiming, diff_keys};
use battlelens::core::{EntityKey, EventRecord, EventType, RelationshipMatrix, chord_layout};
use battlelens::data::{ParsedTable, Table, WorldGeometry};
use battlelens::render::NullRenderer;
use criterion::{Criterion, criterion_group, criterion_main};
use indexmap::IndexSet;
use std::hint::black_box;

fn generated_events(count: usize) -> Vec<EventRecord> {
    (0..count)
        .map(|i| EventRecord {
            id: format!("EVT{i}"),
            year: 2015 + (i % 10) as i32,
            event_date: None,
            event_type: EventType::ALL[i % EventType::ALL.len()],
            location: "Generated".to_owned(),
            latitude: 30.0 + (i % 97) as f64 * 0.1,
            longitude: 35.0 + (i % 89) as f64 * 0.1,
            fatalities: (i % 40) as u32,
            actor1: Some(format!("Actor {}", i % 23)),
            actor2: Some(format!("Actor {}", (i * 7) % 31)),
            notes: None,
        })
        .collect()
}

fn bench_diff_keys_10k(c: &mut Criterion) {
    let old: IndexSet<EntityKey> = (0..10_000).map(|i| EntityKey::new(format!("EVT{i}"))).collect();
    let new: IndexSet<EntityKey> = (5_000..15_000)
        .map(|i| EntityKey::new(format!("EVT{i}")))
        .collect();

    c.bench_function("diff_keys_10k", |b| {
        b.iter(|| {
            let diff = diff_keys(black_box(&old), black_box(&new));
            black_box(diff.counts());
        })
    });
}

fn bench_chord_layout_400(c: &mut Criterion) {
    let events = generated_events(400);

    c.bench_function("chord_layout_400_events", |b| {
        b.iter(|| {
            let matrix = RelationshipMatrix::from_events(black_box(&events)).pruned();
            black_box(chord_layout(&matrix, 0.05));
        })
    });
}

fn bench_year_pass_20k(c: &mut Criterion) {
    let config = DashboardConfig::default().with_transitions(TransitionTiming::immediate());
    let mut dashboard = Dashboard::new(NullRenderer::default(), config)
        .and_then(Dashboard::with_standard_charts)
        .expect("dashboard init");
    dashboard
        .install(Table::Events(ParsedTable::new(generated_events(20_000), 0)))
        .expect("install events");
    dashboard
        .install(Table::World(WorldGeometry::default()))
        .expect("install world");

    let mut year = 2015;
    c.bench_function("year_pass_20k_events", |b| {
        b.iter(|| {
            year = if year == 2024 { 2015 } else { year + 1 };
            let report = dashboard.set_year(black_box(year)).expect("year pass");
            black_box(report.redrawn());
        })
    });
}

criterion_group!(
    benches,
    bench_diff_keys_10k,
    bench_chord_layout_400,
    bench_year_pass_20k
);
criterion_main!(benches);
