use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::conversion;
use crate::error::Error;

/// One player's combine event, raw imperial values plus metric conversions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerCombineRecord {
    pub player_name: String,
    pub position: String,
    pub height: Option<String>,
    pub weight_lb: Option<f64>,
    pub forty_yard: Option<f64>,
    pub vertical_in: Option<f64>,
    pub broad_jump_in: Option<f64>,
    pub bench_reps: Option<u32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub vertical_cm: Option<f64>,
    pub broad_jump_m: Option<f64>,
}

impl PlayerCombineRecord {
    /// Build a record from raw measurements; derived fields are always
    /// computed here and nowhere else.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        player_name: impl Into<String>,
        position: impl Into<String>,
        height: Option<String>,
        weight_lb: Option<f64>,
        forty_yard: Option<f64>,
        vertical_in: Option<f64>,
        broad_jump_in: Option<f64>,
        bench_reps: Option<u32>,
    ) -> Self {
        let height_cm = conversion::height_to_cm(height.as_deref());
        Self {
            player_name: player_name.into(),
            position: position.into(),
            weight_kg: conversion::pounds_to_kg(weight_lb),
            vertical_cm: conversion::inches_to_cm(vertical_in),
            broad_jump_m: conversion::inches_to_m(broad_jump_in),
            height_cm,
            height,
            weight_lb,
            forty_yard,
            vertical_in,
            broad_jump_in,
            bench_reps,
        }
    }

    pub fn metric(&self, metric: CombineMetric) -> Option<f64> {
        match metric {
            CombineMetric::HeightCm => self.height_cm,
            CombineMetric::WeightKg => self.weight_kg,
            CombineMetric::FortyYard => self.forty_yard,
            CombineMetric::VerticalCm => self.vertical_cm,
            CombineMetric::BroadJumpM => self.broad_jump_m,
            CombineMetric::Bench => self.bench_reps.map(f64::from),
        }
    }

    pub fn has_all(&self, metrics: &[CombineMetric]) -> bool {
        metrics.iter().all(|m| self.metric(*m).is_some())
    }
}

/// One player's statistics for one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSeasonRecord {
    pub player_name: String,
    pub position: String,
    pub season: i32,
    pub receiving_yards: Option<f64>,
    pub receiving_tds: Option<f64>,
    pub receptions: Option<f64>,
    pub receiving_yards_after_catch: Option<f64>,
    pub carries: Option<f64>,
    pub rushing_yards: Option<f64>,
    pub rushing_tds: Option<f64>,
}

impl PlayerSeasonRecord {
    pub fn stat(&self, stat: SeasonStat) -> Option<f64> {
        match stat {
            SeasonStat::ReceivingYards => self.receiving_yards,
            SeasonStat::ReceivingTds => self.receiving_tds,
            SeasonStat::Receptions => self.receptions,
            SeasonStat::ReceivingYardsAfterCatch => self.receiving_yards_after_catch,
            SeasonStat::Carries => self.carries,
            SeasonStat::RushingYards => self.rushing_yards,
            SeasonStat::RushingTds => self.rushing_tds,
        }
    }
}

/// Standardized combine measurements used for comparison and similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombineMetric {
    HeightCm,
    WeightKg,
    FortyYard,
    VerticalCm,
    BroadJumpM,
    Bench,
}

impl CombineMetric {
    pub const ALL: [CombineMetric; 6] = [
        CombineMetric::HeightCm,
        CombineMetric::WeightKg,
        CombineMetric::FortyYard,
        CombineMetric::VerticalCm,
        CombineMetric::BroadJumpM,
        CombineMetric::Bench,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CombineMetric::HeightCm => "Height_cm",
            CombineMetric::WeightKg => "Weight_kg",
            CombineMetric::FortyYard => "40yd",
            CombineMetric::VerticalCm => "Vertical_cm",
            CombineMetric::BroadJumpM => "BroadJump_m",
            CombineMetric::Bench => "Bench",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CombineMetric::HeightCm => "Height (cm)",
            CombineMetric::WeightKg => "Weight (kg)",
            CombineMetric::FortyYard => "40 Yard Dash (sec)",
            CombineMetric::VerticalCm => "Vertical Jump (cm)",
            CombineMetric::BroadJumpM => "Broad Jump (m)",
            CombineMetric::Bench => "Bench Press (reps)",
        }
    }
}

impl fmt::Display for CombineMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Per-season performance statistics, named by their source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonStat {
    ReceivingYards,
    ReceivingTds,
    Receptions,
    ReceivingYardsAfterCatch,
    Carries,
    RushingYards,
    RushingTds,
}

impl SeasonStat {
    pub const ALL: [SeasonStat; 7] = [
        SeasonStat::ReceivingYards,
        SeasonStat::ReceivingTds,
        SeasonStat::Receptions,
        SeasonStat::ReceivingYardsAfterCatch,
        SeasonStat::Carries,
        SeasonStat::RushingYards,
        SeasonStat::RushingTds,
    ];

    /// The four statistics shown when comparing two existing players.
    pub const RECEIVING: [SeasonStat; 4] = [
        SeasonStat::ReceivingYards,
        SeasonStat::ReceivingTds,
        SeasonStat::Receptions,
        SeasonStat::ReceivingYardsAfterCatch,
    ];

    pub fn column(self) -> &'static str {
        match self {
            SeasonStat::ReceivingYards => "receiving_yards",
            SeasonStat::ReceivingTds => "receiving_tds",
            SeasonStat::Receptions => "receptions",
            SeasonStat::ReceivingYardsAfterCatch => "receiving_yards_after_catch",
            SeasonStat::Carries => "carries",
            SeasonStat::RushingYards => "rushing_yards",
            SeasonStat::RushingTds => "rushing_tds",
        }
    }

    /// Title-cased column name, e.g. "Receiving Yards After Catch".
    pub fn label(self) -> String {
        self.column()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for SeasonStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SeasonStat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeasonStat::ALL
            .into_iter()
            .find(|stat| stat.column() == s.trim())
            .ok_or_else(|| Error::invalid(format!("unknown season statistic '{s}'")))
    }
}
