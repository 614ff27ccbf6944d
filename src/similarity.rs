//! Nearest-neighbour search over standardized combine metrics.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::records::{CombineMetric, PlayerCombineRecord};

/// Standard deviation below which a column is treated as constant.
const STDEV_EPSILON: f64 = 1e-9;

/// Per-column mean and population standard deviation fitted on a reference
/// pool. Constant columns standardize to zero for every input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standardizer {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl Standardizer {
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() {
            return Self {
                means: vec![0.0; cols],
                stds: vec![0.0; cols],
            };
        }
        let n = rows.len() as f64;
        let mut means = vec![0.0; cols];
        for row in rows {
            for (acc, v) in means.iter_mut().zip(row) {
                *acc += v;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        let mut stds = vec![0.0; cols];
        for row in rows {
            for ((acc, v), mean) in stds.iter_mut().zip(row).zip(&means) {
                *acc += (v - mean).powi(2);
            }
        }
        stds.iter_mut().for_each(|s| *s = (*s / n).sqrt());

        Self { means, stds }
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn stds(&self) -> &[f64] {
        &self.stds
    }

    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(&self.stds))
            .map(|(v, (mean, std))| {
                if *std < STDEV_EPSILON {
                    0.0
                } else {
                    (v - mean) / std
                }
            })
            .collect()
    }
}

/// One ranked candidate. The source record is borrowed, never modified.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarPlayer<'a> {
    pub rank: usize,
    pub player_name: &'a str,
    pub distance: f64,
    pub record: &'a PlayerCombineRecord,
}

/// Rank `candidate_pool` by Euclidean distance to `query` after standardizing
/// both with parameters fitted on the pool alone.
///
/// Ties keep pool order. At most `k` results are returned; `k == 0` is an
/// invalid argument. Every candidate must have all `metrics` recorded.
pub fn find_similar<'a>(
    query: &HashMap<CombineMetric, f64>,
    candidate_pool: &[&'a PlayerCombineRecord],
    metrics: &[CombineMetric],
    k: usize,
) -> Result<Vec<SimilarPlayer<'a>>> {
    if k == 0 {
        return Err(Error::invalid("result count must be at least 1"));
    }
    if metrics.is_empty() {
        return Err(Error::invalid("no metrics selected for similarity"));
    }
    let query_row = metrics
        .iter()
        .map(|m| match query.get(m) {
            Some(v) if v.is_finite() => Ok(*v),
            Some(_) => Err(Error::invalid(format!("query value for {m} is not finite"))),
            None => Err(Error::invalid(format!("query is missing {m}"))),
        })
        .collect::<Result<Vec<f64>>>()?;

    if candidate_pool.is_empty() {
        return Ok(Vec::new());
    }

    let matrix = candidate_pool
        .iter()
        .map(|rec| {
            metrics
                .iter()
                .map(|m| rec.metric(*m))
                .collect::<Option<Vec<f64>>>()
                .ok_or_else(|| {
                    Error::invalid(format!(
                        "candidate {} has unrecorded metrics",
                        rec.player_name
                    ))
                })
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    let scaler = Standardizer::fit(&matrix);
    let scaled_query = scaler.transform(&query_row);
    let distances: Vec<f64> = matrix
        .par_iter()
        .map(|row| euclidean(&scaler.transform(row), &scaled_query))
        .collect();

    let mut order: Vec<usize> = (0..candidate_pool.len()).collect();
    order.sort_by(|a, b| distances[*a].total_cmp(&distances[*b]));
    order.truncate(k);

    debug!(
        pool = candidate_pool.len(),
        metrics = metrics.len(),
        returned = order.len(),
        "ranked similar players"
    );

    Ok(order
        .into_iter()
        .enumerate()
        .map(|(pos, idx)| {
            let record: &'a PlayerCombineRecord = candidate_pool[idx];
            SimilarPlayer {
                rank: pos + 1,
                player_name: record.player_name.as_str(),
                distance: distances[idx],
                record,
            }
        })
        .collect())
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardized_columns_have_zero_mean_unit_std() {
        let rows = vec![
            vec![1.0, 10.0],
            vec![2.0, 30.0],
            vec![3.0, 20.0],
            vec![6.0, 40.0],
        ];
        let scaler = Standardizer::fit(&rows);
        let scaled: Vec<Vec<f64>> = rows.iter().map(|r| scaler.transform(r)).collect();
        for col in 0..2 {
            let n = scaled.len() as f64;
            let mean = scaled.iter().map(|r| r[col]).sum::<f64>() / n;
            let var = scaled.iter().map(|r| (r[col] - mean).powi(2)).sum::<f64>() / n;
            assert!(mean.abs() < 1e-12);
            assert!((var.sqrt() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn constant_column_maps_to_zero() {
        let rows = vec![vec![5.0, 1.0], vec![5.0, 2.0], vec![5.0, 3.0]];
        let scaler = Standardizer::fit(&rows);
        for row in &rows {
            let z = scaler.transform(row);
            assert_eq!(z[0], 0.0);
            assert!(z[1].is_finite());
        }
        assert_eq!(scaler.transform(&[9.0, 2.0])[0], 0.0);
    }

    #[test]
    fn single_row_pool_is_all_zero() {
        let scaler = Standardizer::fit(&[vec![3.0, 4.0]]);
        assert_eq!(scaler.transform(&[3.0, 4.0]), vec![0.0, 0.0]);
    }
}
