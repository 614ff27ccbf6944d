//! Loading and filtering of the combine and season datasets.
//!
//! Loaded tables are never mutated; every filter returns a new vector of
//! borrowed rows.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::position::normalize_position_label;
use crate::records::{CombineMetric, PlayerCombineRecord, PlayerSeasonRecord, SeasonStat};
use crate::table::{RawTable, TabularSource};

pub const VALID_SEASON_MIN: i32 = 2010;
pub const VALID_SEASON_MAX: i32 = 2023;

pub const COMBINE_COLUMNS: [&str; 8] = [
    "player_name",
    "Pos",
    "Height",
    "Weight",
    "40yd",
    "Vertical",
    "Broad Jump",
    "Bench",
];

pub const SEASON_COLUMNS: [&str; 10] = [
    "player_name",
    "position",
    "season",
    "receiving_yards",
    "receiving_tds",
    "receptions",
    "receiving_yards_after_catch",
    "carries",
    "rushing_yards",
    "rushing_tds",
];

/// Rows that carry a player identity and a position label.
pub trait PlayerRow {
    fn player_name(&self) -> &str;
    fn position(&self) -> &str;
}

impl PlayerRow for PlayerCombineRecord {
    fn player_name(&self) -> &str {
        &self.player_name
    }

    fn position(&self) -> &str {
        &self.position
    }
}

impl PlayerRow for PlayerSeasonRecord {
    fn player_name(&self) -> &str {
        &self.player_name
    }

    fn position(&self) -> &str {
        &self.position
    }
}

/// Inclusive season bounds, always inside 2010..=2023.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonRange {
    min: i32,
    max: i32,
}

impl SeasonRange {
    pub fn new(min: i32, max: i32) -> Result<Self> {
        if min < VALID_SEASON_MIN || max > VALID_SEASON_MAX {
            return Err(Error::invalid(format!(
                "season range {min}-{max} outside {VALID_SEASON_MIN}-{VALID_SEASON_MAX}"
            )));
        }
        if min > max {
            return Err(Error::invalid(format!(
                "season range start {min} is after end {max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, season: i32) -> bool {
        (self.min..=self.max).contains(&season)
    }
}

impl Default for SeasonRange {
    fn default() -> Self {
        Self {
            min: VALID_SEASON_MIN,
            max: VALID_SEASON_MAX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonMean {
    pub season: i32,
    pub mean: f64,
}

/// Position labels present in only one of the two datasets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PositionLabelMismatch {
    pub combine_only: Vec<String>,
    pub season_only: Vec<String>,
}

impl PositionLabelMismatch {
    pub fn is_empty(&self) -> bool {
        self.combine_only.is_empty() && self.season_only.is_empty()
    }
}

pub fn load_combine_records(source: &TabularSource) -> Result<Vec<PlayerCombineRecord>> {
    let table = RawTable::read(source)?;
    let records = combine_records_from_table(&table)?;
    info!(
        path = %source.path().display(),
        rows = records.len(),
        "loaded combine records"
    );
    Ok(records)
}

pub fn combine_records_from_table(table: &RawTable) -> Result<Vec<PlayerCombineRecord>> {
    let idx = table.require_columns("combine", &COMBINE_COLUMNS)?;
    let mut records = Vec::with_capacity(table.len());
    let mut nameless = 0usize;

    for row in table.rows() {
        let Some(name) = cell(row, idx[0]) else {
            nameless += 1;
            continue;
        };
        records.push(PlayerCombineRecord::new(
            name,
            cell(row, idx[1])
                .map(normalize_position_label)
                .unwrap_or_default(),
            cell(row, idx[2]).map(str::to_string),
            parse_number(cell(row, idx[3])),
            parse_number(cell(row, idx[4])),
            parse_number(cell(row, idx[5])),
            parse_number(cell(row, idx[6])),
            parse_count(cell(row, idx[7])),
        ));
    }

    if nameless > 0 {
        warn!(rows = nameless, "skipped combine rows without a player name");
    }
    Ok(records)
}

pub fn load_season_records(source: &TabularSource) -> Result<Vec<PlayerSeasonRecord>> {
    let table = RawTable::read(source)?;
    let records = season_records_from_table(&table)?;
    info!(
        path = %source.path().display(),
        rows = records.len(),
        "loaded season records"
    );
    Ok(records)
}

/// Rows whose season is not an integer are dropped, not kept as nulls.
pub fn season_records_from_table(table: &RawTable) -> Result<Vec<PlayerSeasonRecord>> {
    let idx = table.require_columns("season", &SEASON_COLUMNS)?;
    let mut records = Vec::with_capacity(table.len());
    let mut bad_season = 0usize;
    let mut nameless = 0usize;

    for row in table.rows() {
        let Some(season) = parse_season(cell(row, idx[2])) else {
            bad_season += 1;
            continue;
        };
        let Some(name) = cell(row, idx[0]) else {
            nameless += 1;
            continue;
        };
        records.push(PlayerSeasonRecord {
            player_name: name.to_string(),
            position: cell(row, idx[1])
                .map(normalize_position_label)
                .unwrap_or_default(),
            season,
            receiving_yards: parse_number(cell(row, idx[3])),
            receiving_tds: parse_number(cell(row, idx[4])),
            receptions: parse_number(cell(row, idx[5])),
            receiving_yards_after_catch: parse_number(cell(row, idx[6])),
            carries: parse_number(cell(row, idx[7])),
            rushing_yards: parse_number(cell(row, idx[8])),
            rushing_tds: parse_number(cell(row, idx[9])),
        });
    }

    if bad_season > 0 {
        warn!(rows = bad_season, "dropped season rows with a non-integer season");
    }
    if nameless > 0 {
        warn!(rows = nameless, "skipped season rows without a player name");
    }
    Ok(records)
}

/// Exact, case-sensitive match on the position label.
pub fn filter_by_position<'a, T: PlayerRow>(records: &'a [T], position: &str) -> Vec<&'a T> {
    records.iter().filter(|r| r.position() == position).collect()
}

/// Distinct player names for a position, in order of first appearance.
pub fn players_in_position<'a, T: PlayerRow>(records: &'a [T], position: &str) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| r.position() == position)
        .map(|r| r.player_name())
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Rows with every one of `metrics` recorded.
pub fn complete_metric_pool<'a>(
    records: &[&'a PlayerCombineRecord],
    metrics: &[CombineMetric],
) -> Vec<&'a PlayerCombineRecord> {
    records.iter().copied().filter(|r| r.has_all(metrics)).collect()
}

/// Season rows for the named players inside `range`, with rows missing any
/// of `metrics` removed and duplicates on (player, season, metrics) collapsed.
pub fn season_rows_for_players<'a>(
    records: &'a [PlayerSeasonRecord],
    player_names: &[&str],
    metrics: &[SeasonStat],
    range: SeasonRange,
) -> Vec<&'a PlayerSeasonRecord> {
    let mut seen: HashSet<(&str, i32, Vec<u64>)> = HashSet::new();
    let mut out = Vec::new();
    for rec in records {
        if !range.contains(rec.season) || !player_names.contains(&rec.player_name.as_str()) {
            continue;
        }
        let Some(values) = metrics
            .iter()
            .map(|m| rec.stat(*m).map(f64::to_bits))
            .collect::<Option<Vec<u64>>>()
        else {
            continue;
        };
        if seen.insert((rec.player_name.as_str(), rec.season, values)) {
            out.push(rec);
        }
    }
    debug!(
        players = player_names.len(),
        rows = out.len(),
        "selected season rows"
    );
    out
}

/// Mean of `stat` per season for a position; seasons without a recorded
/// value are omitted. Ascending by season.
pub fn position_season_mean(
    records: &[PlayerSeasonRecord],
    position: &str,
    stat: SeasonStat,
    range: SeasonRange,
) -> Vec<SeasonMean> {
    let mut acc: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for rec in records {
        if rec.position != position || !range.contains(rec.season) {
            continue;
        }
        let Some(value) = rec.stat(stat) else {
            continue;
        };
        let entry = acc.entry(rec.season).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }
    acc.into_iter()
        .map(|(season, (sum, n))| SeasonMean {
            season,
            mean: sum / n as f64,
        })
        .collect()
}

pub fn position_label_mismatches(
    combine: &[PlayerCombineRecord],
    season: &[PlayerSeasonRecord],
) -> PositionLabelMismatch {
    let combine_labels = distinct_positions(combine);
    let season_labels = distinct_positions(season);
    PositionLabelMismatch {
        combine_only: combine_labels
            .iter()
            .filter(|l| !season_labels.contains(*l))
            .map(|l| l.to_string())
            .collect(),
        season_only: season_labels
            .iter()
            .filter(|l| !combine_labels.contains(*l))
            .map(|l| l.to_string())
            .collect(),
    }
}

/// Non-empty position labels in order of first appearance.
pub fn distinct_positions<T: PlayerRow>(records: &[T]) -> Vec<&str> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|r| r.position())
        .filter(|p| !p.is_empty() && seen.insert(*p))
        .collect()
}

/// Both record sets, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    combine: Vec<PlayerCombineRecord>,
    season: Vec<PlayerSeasonRecord>,
}

impl Dataset {
    pub fn new(combine: Vec<PlayerCombineRecord>, season: Vec<PlayerSeasonRecord>) -> Self {
        Self { combine, season }
    }

    pub fn load(combine: &TabularSource, season: &TabularSource) -> Result<Self> {
        let dataset = Self::new(load_combine_records(combine)?, load_season_records(season)?);
        let mismatch = dataset.position_label_mismatches();
        if !mismatch.is_empty() {
            warn!(
                combine_only = ?mismatch.combine_only,
                season_only = ?mismatch.season_only,
                "position labels differ between datasets"
            );
        }
        Ok(dataset)
    }

    pub fn combine(&self) -> &[PlayerCombineRecord] {
        &self.combine
    }

    pub fn season(&self) -> &[PlayerSeasonRecord] {
        &self.season
    }

    pub fn positions(&self) -> Vec<&str> {
        distinct_positions(&self.combine)
    }

    pub fn combine_in_position(&self, position: &str) -> Vec<&PlayerCombineRecord> {
        filter_by_position(&self.combine, position)
    }

    pub fn players_in_position(&self, position: &str) -> Vec<&str> {
        players_in_position(&self.combine, position)
    }

    /// Every combine record for `name` within `position`. More than one
    /// entry means the name is ambiguous.
    pub fn find_players(&self, position: &str, name: &str) -> Vec<&PlayerCombineRecord> {
        self.combine
            .iter()
            .filter(|r| r.position == position && r.player_name == name)
            .collect()
    }

    pub fn position_label_mismatches(&self) -> PositionLabelMismatch {
        position_label_mismatches(&self.combine, &self.season)
    }
}

fn cell(row: &[Option<String>], idx: usize) -> Option<&str> {
    row.get(idx).and_then(|c| c.as_deref())
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_count(raw: Option<&str>) -> Option<u32> {
    let v = parse_number(raw)?;
    if v < 0.0 || v.fract() != 0.0 || v > u32::MAX as f64 {
        return None;
    }
    Some(v as u32)
}

fn parse_season(raw: Option<&str>) -> Option<i32> {
    let v = parse_number(raw)?;
    if v.fract() != 0.0 || v < i32::MIN as f64 || v > i32::MAX as f64 {
        return None;
    }
    Some(v as i32)
}
