use std::collections::HashMap;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::position::QueryPosition;
use crate::records::CombineMetric;

/// A hypothetical player's combine results, already in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlayerQuery {
    pub position: QueryPosition,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub forty_yard: f64,
    pub vertical_cm: f64,
    pub broad_jump_m: f64,
    pub bench_reps: u32,
}

impl Default for NewPlayerQuery {
    fn default() -> Self {
        Self {
            position: QueryPosition::WR,
            height_cm: 180.0,
            weight_kg: 80.0,
            forty_yard: 4.5,
            vertical_cm: 80.0,
            broad_jump_m: 3.0,
            bench_reps: 20,
        }
    }
}

/// Accepted input range for a metric entered for a new player.
pub fn valid_range(metric: CombineMetric) -> RangeInclusive<f64> {
    match metric {
        CombineMetric::HeightCm => 150.0..=220.0,
        CombineMetric::WeightKg => 50.0..=150.0,
        CombineMetric::FortyYard => 4.0..=6.0,
        CombineMetric::VerticalCm => 50.0..=120.0,
        CombineMetric::BroadJumpM => 2.0..=4.0,
        CombineMetric::Bench => 0.0..=50.0,
    }
}

impl NewPlayerQuery {
    pub fn value(&self, metric: CombineMetric) -> f64 {
        match metric {
            CombineMetric::HeightCm => self.height_cm,
            CombineMetric::WeightKg => self.weight_kg,
            CombineMetric::FortyYard => self.forty_yard,
            CombineMetric::VerticalCm => self.vertical_cm,
            CombineMetric::BroadJumpM => self.broad_jump_m,
            CombineMetric::Bench => f64::from(self.bench_reps),
        }
    }

    /// Reject the whole query if any metric is outside its input range.
    pub fn validate(&self) -> Result<()> {
        let out_of_range: Vec<String> = CombineMetric::ALL
            .into_iter()
            .filter_map(|metric| {
                let value = self.value(metric);
                let range = valid_range(metric);
                (!range.contains(&value)).then(|| {
                    format!(
                        "{} = {value} (expected {}..={})",
                        metric.label(),
                        range.start(),
                        range.end()
                    )
                })
            })
            .collect();
        if out_of_range.is_empty() {
            Ok(())
        } else {
            Err(Error::invalid(format!(
                "new player metrics out of range: {}",
                out_of_range.join("; ")
            )))
        }
    }

    pub fn metric_values(&self) -> HashMap<CombineMetric, f64> {
        CombineMetric::ALL
            .into_iter()
            .map(|metric| (metric, self.value(metric)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_is_valid() {
        assert!(NewPlayerQuery::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let query = NewPlayerQuery {
            forty_yard: 3.2,
            bench_reps: 60,
            ..Default::default()
        };
        let err = query.validate().unwrap_err().to_string();
        assert!(err.contains("40 Yard Dash"));
        assert!(err.contains("Bench Press"));
    }

    #[test]
    fn nan_is_out_of_range() {
        let query = NewPlayerQuery {
            height_cm: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(query.validate(), Err(Error::InvalidArgument(_))));
    }
}
