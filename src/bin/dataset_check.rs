//! Load both datasets from the configured paths and print a JSON summary:
//! row counts, players per position, complete similarity pools and any
//! position labels that only one dataset uses.
//!
//! Environment: `COMBINE_DATA_PATH`, `SEASON_DATA_PATH`, `SEASON_MIN`,
//! `SEASON_MAX`, `RUST_LOG` (default `info`).

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use combine_scout::config::Config;
use combine_scout::dataset::{Dataset, PositionLabelMismatch, complete_metric_pool};
use combine_scout::records::CombineMetric;

#[derive(Debug, Serialize)]
struct PositionSummary {
    position: String,
    players: usize,
    complete_pool: usize,
}

#[derive(Debug, Serialize)]
struct DatasetSummary {
    combine_rows: usize,
    season_rows: usize,
    seasons_in_range: usize,
    positions: Vec<PositionSummary>,
    label_mismatch: PositionLabelMismatch,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cfg = Config::from_env();
    info!(
        combine = %cfg.combine_path.display(),
        season = %cfg.season_path.display(),
        "loading datasets"
    );

    let dataset = match Dataset::load(&cfg.combine_source(), &cfg.season_source()) {
        Ok(dataset) => dataset,
        Err(err) => {
            if !err.missing_columns().is_empty() {
                error!(missing = ?err.missing_columns(), "dataset schema check failed");
            }
            return Err(err).context("load datasets");
        }
    };

    let positions = dataset
        .positions()
        .into_iter()
        .map(|position| {
            let members = dataset.combine_in_position(position);
            PositionSummary {
                position: position.to_string(),
                players: dataset.players_in_position(position).len(),
                complete_pool: complete_metric_pool(&members, &CombineMetric::ALL).len(),
            }
        })
        .collect();

    let summary = DatasetSummary {
        combine_rows: dataset.combine().len(),
        season_rows: dataset.season().len(),
        seasons_in_range: dataset
            .season()
            .iter()
            .filter(|r| cfg.seasons.contains(r.season))
            .count(),
        positions,
        label_mismatch: dataset.position_label_mismatches(),
    };

    let json = serde_json::to_string_pretty(&summary).context("serialize dataset summary")?;
    println!("{json}");
    Ok(())
}
