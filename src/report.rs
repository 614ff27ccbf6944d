//! Presentation-ready views: comparison tables, box-plot panels, ranked
//! similar players and season series with data-availability warnings.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::dataset::{
    Dataset, SeasonMean, SeasonRange, complete_metric_pool, position_season_mean,
    season_rows_for_players,
};
use crate::error::{Error, Result};
use crate::position::QueryPosition;
use crate::query::NewPlayerQuery;
use crate::records::{CombineMetric, PlayerCombineRecord, PlayerSeasonRecord, SeasonStat};
use crate::similarity::{SimilarPlayer, find_similar};

pub const NOT_RECORDED: &str = "This value was not recorded";
pub const NO_POSITION_DATA: &str = "No data available for this position.";
pub const NO_PANEL_VALUES: &str = "No value was recorded for either player.";

/// A table cell; unrecorded values render as [`NOT_RECORDED`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    NotRecorded,
}

impl Serialize for Cell {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cell::Text(text) => s.serialize_str(text),
            Cell::Number(v) => s.serialize_f64(*v),
            Cell::NotRecorded => s.serialize_str(NOT_RECORDED),
        }
    }
}

impl Cell {
    fn from_value(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::NotRecorded)
    }

    pub fn is_recorded(&self) -> bool {
        !matches!(self, Cell::NotRecorded)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::NotRecorded => f.write_str(NOT_RECORDED),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub label: &'static str,
    pub cells: Vec<Cell>,
}

/// Metric label → one cell per player, in `players` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonTable {
    pub players: Vec<String>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn cell(&self, label: &str, player: &str) -> Option<&Cell> {
        let col = self.players.iter().position(|p| p == player)?;
        self.rows
            .iter()
            .find(|row| row.label == label)
            .and_then(|row| row.cells.get(col))
    }
}

/// Five-number summary with linearly interpolated quartiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxSummary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            count: sorted.len(),
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerMarker {
    pub player: String,
    pub value: f64,
}

/// Distribution of one metric in the position pool plus player markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricPanel {
    pub metric: CombineMetric,
    pub summary: Option<BoxSummary>,
    pub markers: Vec<PlayerMarker>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerComparison {
    pub position: String,
    pub table: ComparisonTable,
    pub panels: Vec<MetricPanel>,
    pub warnings: Vec<String>,
}

/// Side-by-side combine comparison of two players within one position.
pub fn compare_players(
    dataset: &Dataset,
    position: &str,
    first: &str,
    second: &str,
) -> PlayerComparison {
    let mut warnings = Vec::new();
    let players = [first, second];
    let records: Vec<Option<&PlayerCombineRecord>> = players
        .iter()
        .map(|name| resolve_player(dataset, position, name, &mut warnings))
        .collect();

    let mut rows = vec![ComparisonRow {
        label: "Position",
        cells: records
            .iter()
            .map(|rec| match rec {
                Some(rec) if !rec.position.is_empty() => Cell::Text(rec.position.clone()),
                _ => Cell::NotRecorded,
            })
            .collect(),
    }];
    rows.extend(CombineMetric::ALL.into_iter().map(|metric| ComparisonRow {
        label: metric.label(),
        cells: records
            .iter()
            .map(|rec| Cell::from_value(rec.and_then(|r| r.metric(metric))))
            .collect(),
    }));

    let pool = complete_metric_pool(&dataset.combine_in_position(position), &CombineMetric::ALL);
    let panels = if pool.is_empty() {
        warnings.push(NO_POSITION_DATA.to_string());
        Vec::new()
    } else {
        CombineMetric::ALL
            .into_iter()
            .map(|metric| metric_panel(metric, &pool, &players, &records))
            .collect()
    };

    PlayerComparison {
        position: position.to_string(),
        table: ComparisonTable {
            players: players.iter().map(|p| p.to_string()).collect(),
            rows,
        },
        panels,
        warnings,
    }
}

fn resolve_player<'a>(
    dataset: &'a Dataset,
    position: &str,
    name: &str,
    warnings: &mut Vec<String>,
) -> Option<&'a PlayerCombineRecord> {
    let matches = dataset.find_players(position, name);
    match matches.len() {
        0 => warnings.push(format!("{name} has no combine record at position {position}.")),
        1 => {}
        n => warnings.push(format!(
            "{name} matches {n} combine records at position {position}; showing the first."
        )),
    }
    matches.first().copied()
}

fn metric_panel(
    metric: CombineMetric,
    pool: &[&PlayerCombineRecord],
    players: &[&str],
    records: &[Option<&PlayerCombineRecord>],
) -> MetricPanel {
    let markers: Vec<PlayerMarker> = players
        .iter()
        .zip(records)
        .filter_map(|(name, rec)| {
            let value = rec.and_then(|r| r.metric(metric))?;
            Some(PlayerMarker {
                player: name.to_string(),
                value,
            })
        })
        .collect();
    if markers.is_empty() {
        return MetricPanel {
            metric,
            summary: None,
            markers,
            message: Some(NO_PANEL_VALUES.to_string()),
        };
    }
    let values: Vec<f64> = pool.iter().filter_map(|r| r.metric(metric)).collect();
    MetricPanel {
        metric,
        summary: BoxSummary::from_values(&values),
        markers,
        message: None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonPoint {
    pub season: i32,
    pub value: f64,
}

/// One player's values of one statistic, ascending by season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSeries {
    pub player: String,
    pub stat: SeasonStat,
    pub points: Vec<SeasonPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalComparison {
    pub series: Vec<SeasonSeries>,
    pub warnings: Vec<String>,
}

/// Receiving trajectories of two existing players.
pub fn seasonal_comparison(
    dataset: &Dataset,
    first: &str,
    second: &str,
    range: SeasonRange,
) -> SeasonalComparison {
    let players = distinct_names(&[first, second]);
    let rows = season_rows_for_players(dataset.season(), &players, &SeasonStat::RECEIVING, range);

    let mut warnings = Vec::new();
    let missing: Vec<&str> = players
        .iter()
        .copied()
        .filter(|name| !rows.iter().any(|r| r.player_name == *name))
        .collect();
    match missing.as_slice() {
        [] => {}
        [only] => warnings.push(no_season_data(only)),
        [a, b, ..] => warnings.push(format!(
            "For both {a} and {b}, no seasonal performance data is available."
        )),
    }
    warnings.extend(averaged_seasons(&rows, &players));

    let mut series = Vec::new();
    for stat in SeasonStat::RECEIVING {
        for player in &players {
            if let Some(s) = series_for(&rows, player, stat) {
                series.push(s);
            }
        }
    }

    SeasonalComparison { series, warnings }
}

fn no_season_data(player: &str) -> String {
    format!("For {player}, no seasonal performance data is available.")
}

fn distinct_names<'n>(names: &[&'n str]) -> Vec<&'n str> {
    let mut seen = HashSet::new();
    names.iter().copied().filter(|name| seen.insert(*name)).collect()
}

/// Name is the only join key, so several distinct rows for one
/// (player, season) may belong to different people.
fn averaged_seasons(rows: &[&PlayerSeasonRecord], players: &[&str]) -> Vec<String> {
    let mut counts: BTreeMap<(usize, i32), usize> = BTreeMap::new();
    for rec in rows {
        if let Some(idx) = players.iter().position(|p| *p == rec.player_name) {
            *counts.entry((idx, rec.season)).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|((idx, season), n)| {
            format!(
                "{} has {n} season records for {season}; values are averaged.",
                players[idx]
            )
        })
        .collect()
}

/// Per-season mean of `stat` for `player` over already filtered rows.
fn series_for(
    rows: &[&PlayerSeasonRecord],
    player: &str,
    stat: SeasonStat,
) -> Option<SeasonSeries> {
    let mut by_season: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for rec in rows.iter().filter(|r| r.player_name == player) {
        if let Some(value) = rec.stat(stat) {
            let entry = by_season.entry(rec.season).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }
    if by_season.is_empty() {
        return None;
    }
    Some(SeasonSeries {
        player: player.to_string(),
        stat,
        points: by_season
            .into_iter()
            .map(|(season, (sum, n))| SeasonPoint {
                season,
                value: sum / n as f64,
            })
            .collect(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedName {
    pub rank: usize,
    pub player_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarPlayersReport<'a> {
    pub query: NewPlayerQuery,
    pub ranked: Vec<RankedName>,
    pub matches: Vec<SimilarPlayer<'a>>,
    pub warnings: Vec<String>,
}

impl SimilarPlayersReport<'_> {
    pub fn player_names(&self) -> Vec<&str> {
        self.matches.iter().map(|m| m.player_name).collect()
    }
}

/// The `k` existing players at the query's position closest to its metrics.
pub fn similar_players<'a>(
    dataset: &'a Dataset,
    query: &NewPlayerQuery,
    k: usize,
) -> Result<SimilarPlayersReport<'a>> {
    query.validate()?;
    let position = query.position.label();
    let pool = complete_metric_pool(&dataset.combine_in_position(position), &CombineMetric::ALL);

    let mut warnings = Vec::new();
    if pool.is_empty() {
        warnings.push(format!(
            "No {position} players have every combine metric recorded."
        ));
    }

    let matches = find_similar(&query.metric_values(), &pool, &CombineMetric::ALL, k)?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for m in &matches {
        *counts.entry(m.player_name).or_default() += 1;
    }
    for m in &matches {
        if counts.remove(m.player_name).is_some_and(|n| n > 1) {
            warnings.push(format!(
                "{} appears more than once among the similar players.",
                m.player_name
            ));
        }
    }

    Ok(SimilarPlayersReport {
        query: query.clone(),
        ranked: matches
            .iter()
            .map(|m| RankedName {
                rank: m.rank,
                player_name: m.player_name.to_string(),
            })
            .collect(),
        matches,
        warnings,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSeasonView {
    pub position: QueryPosition,
    pub stat: SeasonStat,
    pub series: Vec<SeasonSeries>,
    pub position_mean: Vec<SeasonMean>,
    pub warnings: Vec<String>,
}

/// Season series for selected players with the position's yearly mean as
/// a reference line. `stat` must be on the position's metric menu.
pub fn similar_player_seasons(
    dataset: &Dataset,
    position: QueryPosition,
    selected: &[&str],
    stat: SeasonStat,
    range: SeasonRange,
) -> Result<PositionSeasonView> {
    if !position.allows(stat) {
        return Err(Error::invalid(format!(
            "{stat} is not a season metric for {position}"
        )));
    }

    let players = distinct_names(selected);
    let rows = season_rows_for_players(dataset.season(), &players, &[stat], range);
    let mut warnings = Vec::new();
    if players.is_empty() {
        warnings.push("No players selected.".to_string());
    }
    let mut series = Vec::new();
    for player in &players {
        match series_for(&rows, player, stat) {
            Some(s) => series.push(s),
            None => warnings.push(no_season_data(player)),
        }
    }
    warnings.extend(averaged_seasons(&rows, &players));

    Ok(PositionSeasonView {
        position,
        stat,
        series,
        position_mean: position_season_mean(dataset.season(), position.label(), stat, range),
        warnings,
    })
}
