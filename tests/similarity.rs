use std::collections::HashMap;

use approx::assert_relative_eq;

use combine_scout::Error;
use combine_scout::records::{CombineMetric, PlayerCombineRecord};
use combine_scout::similarity::find_similar;

fn player(
    name: &str,
    height: &str,
    weight: f64,
    forty: f64,
    vertical: f64,
    broad: f64,
    bench: u32,
) -> PlayerCombineRecord {
    PlayerCombineRecord::new(
        name,
        "WR",
        Some(height.to_string()),
        Some(weight),
        Some(forty),
        Some(vertical),
        Some(broad),
        Some(bench),
    )
}

fn sample_pool() -> Vec<PlayerCombineRecord> {
    vec![
        player("Alpha", "6-2", 205.0, 4.45, 35.0, 124.0, 15),
        player("Gamma", "5-11", 185.0, 4.40, 38.0, 128.0, 12),
        player("Delta", "6-3", 215.0, 4.60, 32.0, 115.0, 18),
        player("Echo", "5-9", 178.0, 4.38, 40.0, 130.0, 10),
        player("Kappa", "6-1", 200.0, 4.52, 34.0, 120.0, 16),
    ]
}

fn query_from(
    record: &PlayerCombineRecord,
    metrics: &[CombineMetric],
) -> HashMap<CombineMetric, f64> {
    metrics
        .iter()
        .map(|m| (*m, record.metric(*m).unwrap()))
        .collect()
}

#[test]
fn exact_match_ranks_first_with_zero_distance() {
    let pool = sample_pool();
    let refs: Vec<&PlayerCombineRecord> = pool.iter().collect();
    let query = query_from(&pool[3], &CombineMetric::ALL);

    let results = find_similar(&query, &refs, &CombineMetric::ALL, 3).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].rank, 1);
    assert_eq!(results[0].player_name, "Echo");
    assert!(results[0].distance.abs() < 1e-12);
    assert!(std::ptr::eq(results[0].record, &pool[3]));
}

#[test]
fn ties_keep_pool_order() {
    let pool = vec![
        player("First", "6-0", 200.0, 4.5, 35.0, 120.0, 15),
        player("Other", "6-4", 230.0, 4.7, 30.0, 110.0, 20),
        player("Second", "6-0", 200.0, 4.5, 35.0, 120.0, 15),
    ];
    let refs: Vec<&PlayerCombineRecord> = pool.iter().collect();
    let query = query_from(&pool[0], &CombineMetric::ALL);

    let results = find_similar(&query, &refs, &CombineMetric::ALL, 10).unwrap();
    let names: Vec<&str> = results.iter().map(|r| r.player_name).collect();
    assert_eq!(names, vec!["First", "Second", "Other"]);
    assert_eq!(results[0].distance, results[1].distance);
}

#[test]
fn ranks_are_monotonic_and_capped_by_pool_size() {
    let pool = sample_pool();
    let refs: Vec<&PlayerCombineRecord> = pool.iter().collect();
    let query: HashMap<CombineMetric, f64> = [
        (CombineMetric::HeightCm, 183.0),
        (CombineMetric::WeightKg, 88.0),
        (CombineMetric::FortyYard, 4.5),
        (CombineMetric::VerticalCm, 90.0),
        (CombineMetric::BroadJumpM, 3.1),
        (CombineMetric::Bench, 14.0),
    ]
    .into_iter()
    .collect();

    let results = find_similar(&query, &refs, &CombineMetric::ALL, 10).unwrap();
    assert_eq!(results.len(), 5);
    for (idx, r) in results.iter().enumerate() {
        assert_eq!(r.rank, idx + 1);
    }
    assert!(results.windows(2).all(|w| w[0].distance <= w[1].distance));
}

#[test]
fn query_uses_pool_parameters() {
    // Bench-only pool 10, 20, 30: mean 20, population std sqrt(200/3).
    let pool = vec![
        player("Low", "6-0", 200.0, 4.5, 35.0, 120.0, 10),
        player("Mid", "6-0", 200.0, 4.5, 35.0, 120.0, 20),
        player("High", "6-0", 200.0, 4.5, 35.0, 120.0, 30),
    ];
    let refs: Vec<&PlayerCombineRecord> = pool.iter().collect();
    let query = HashMap::from([(CombineMetric::Bench, 50.0)]);

    let results = find_similar(&query, &refs, &[CombineMetric::Bench], 1).unwrap();
    let std = (200.0_f64 / 3.0).sqrt();
    assert_eq!(results[0].player_name, "High");
    assert_relative_eq!(results[0].distance, 20.0 / std, epsilon = 1e-9);
}

#[test]
fn constant_columns_do_not_produce_nan() {
    let pool = vec![
        player("A", "6-0", 200.0, 4.5, 35.0, 120.0, 15),
        player("B", "6-1", 205.0, 4.5, 36.0, 121.0, 15),
        player("C", "6-2", 210.0, 4.5, 37.0, 122.0, 15),
    ];
    let refs: Vec<&PlayerCombineRecord> = pool.iter().collect();
    let mut query = query_from(&pool[1], &CombineMetric::ALL);
    query.insert(CombineMetric::FortyYard, 5.9);
    query.insert(CombineMetric::Bench, 40.0);

    let results = find_similar(&query, &refs, &CombineMetric::ALL, 3).unwrap();
    assert!(results.iter().all(|r| r.distance.is_finite()));
    assert_eq!(results[0].player_name, "B");
    assert!(results[0].distance.abs() < 1e-12);
}

#[test]
fn empty_pool_returns_nothing() {
    let query = HashMap::from([(CombineMetric::Bench, 10.0)]);
    let results = find_similar(&query, &[], &[CombineMetric::Bench], 10).unwrap();
    assert!(results.is_empty());
}

#[test]
fn invalid_arguments_are_rejected() {
    let pool = sample_pool();
    let refs: Vec<&PlayerCombineRecord> = pool.iter().collect();
    let query = query_from(&pool[0], &CombineMetric::ALL);

    assert!(matches!(
        find_similar(&query, &refs, &CombineMetric::ALL, 0),
        Err(Error::InvalidArgument(_))
    ));

    let partial = query_from(&pool[0], &[CombineMetric::HeightCm]);
    assert!(matches!(
        find_similar(&partial, &refs, &CombineMetric::ALL, 5),
        Err(Error::InvalidArgument(_))
    ));

    let incomplete = PlayerCombineRecord::new(
        "NoBench",
        "WR",
        Some("6-0".into()),
        Some(200.0),
        Some(4.5),
        Some(35.0),
        Some(120.0),
        None,
    );
    assert!(matches!(
        find_similar(&query, &[&incomplete], &CombineMetric::ALL, 5),
        Err(Error::InvalidArgument(_))
    ));
}
