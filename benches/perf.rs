use std::collections::HashMap;

use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

use combine_scout::dataset::combine_records_from_table;
use combine_scout::records::{CombineMetric, PlayerCombineRecord};
use combine_scout::similarity::find_similar;
use combine_scout::table::RawTable;

fn synthetic_csv(rows: usize) -> String {
    let mut rng = StdRng::seed_from_u64(7);
    let mut out = String::from("player_name,Pos,Height,Weight,40yd,Vertical,Broad Jump,Bench\n");
    for idx in 0..rows {
        let pos = if idx % 2 == 0 { "WR" } else { "RB" };
        out.push_str(&format!(
            "Player {idx},{pos},{}-{},{},{:.2},{:.1},{},{}\n",
            rng.gen_range(5..=6),
            rng.gen_range(0..12),
            rng.gen_range(170..240),
            rng.gen_range(4.25..4.90),
            rng.gen_range(28.0..42.0),
            rng.gen_range(105..135),
            rng.gen_range(5..30),
        ));
    }
    out
}

fn synthetic_pool(rows: usize) -> Vec<PlayerCombineRecord> {
    let table = RawTable::from_csv_reader(synthetic_csv(rows).as_bytes()).unwrap();
    combine_records_from_table(&table).unwrap()
}

fn bench_combine_parse(c: &mut Criterion) {
    let csv = synthetic_csv(2000);
    c.bench_function("combine_parse_2000", |b| {
        b.iter(|| {
            let table = RawTable::from_csv_reader(black_box(csv.as_bytes())).unwrap();
            let records = combine_records_from_table(&table).unwrap();
            black_box(records.len());
        })
    });
}

fn bench_find_similar(c: &mut Criterion) {
    let pool = synthetic_pool(2000);
    let refs: Vec<&PlayerCombineRecord> = pool
        .iter()
        .filter(|r| r.has_all(&CombineMetric::ALL))
        .collect();
    let query: HashMap<CombineMetric, f64> = [
        (CombineMetric::HeightCm, 183.0),
        (CombineMetric::WeightKg, 90.0),
        (CombineMetric::FortyYard, 4.5),
        (CombineMetric::VerticalCm, 88.0),
        (CombineMetric::BroadJumpM, 3.1),
        (CombineMetric::Bench, 16.0),
    ]
    .into_iter()
    .collect();

    c.bench_function("find_similar_2000", |b| {
        b.iter(|| {
            let hits = find_similar(black_box(&query), &refs, &CombineMetric::ALL, 10).unwrap();
            black_box(hits.len());
        })
    });
}

criterion_group!(perf, bench_combine_parse, bench_find_similar);
criterion_main!(perf);
