use std::env;
use std::path::PathBuf;

use crate::dataset::{SeasonRange, VALID_SEASON_MAX, VALID_SEASON_MIN};
use crate::table::TabularSource;

const DEFAULT_COMBINE_PATH: &str = "00_Data/players_unique_2010_2023.csv";
const DEFAULT_SEASON_PATH: &str = "00_Data/players_2010_2023.csv";
const DEFAULT_SIMILAR_PLAYERS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub combine_path: PathBuf,
    pub season_path: PathBuf,
    pub similar_players: usize,
    pub seasons: SeasonRange,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            combine_path: PathBuf::from(DEFAULT_COMBINE_PATH),
            season_path: PathBuf::from(DEFAULT_SEASON_PATH),
            similar_players: DEFAULT_SIMILAR_PLAYERS,
            seasons: SeasonRange::default(),
        }
    }
}

impl Config {
    /// Read settings from the environment; bad or missing values fall back
    /// to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let opt = |key: &str| {
            lookup(key).and_then(|val| {
                let val = val.trim().to_string();
                if val.is_empty() { None } else { Some(val) }
            })
        };

        let defaults = Self::default();
        let similar_players = opt("SIMILAR_PLAYERS_K")
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(DEFAULT_SIMILAR_PLAYERS)
            .max(1);
        let season_min = opt("SEASON_MIN")
            .and_then(|val| val.parse::<i32>().ok())
            .unwrap_or(VALID_SEASON_MIN)
            .clamp(VALID_SEASON_MIN, VALID_SEASON_MAX);
        let season_max = opt("SEASON_MAX")
            .and_then(|val| val.parse::<i32>().ok())
            .unwrap_or(VALID_SEASON_MAX)
            .clamp(VALID_SEASON_MIN, VALID_SEASON_MAX);

        Self {
            combine_path: opt("COMBINE_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.combine_path),
            season_path: opt("SEASON_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.season_path),
            similar_players,
            seasons: SeasonRange::new(season_min, season_max).unwrap_or(defaults.seasons),
        }
    }

    pub fn combine_source(&self) -> TabularSource {
        TabularSource::from_path(&self.combine_path)
    }

    pub fn season_source(&self) -> TabularSource {
        TabularSource::from_path(&self.season_path)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(Config::from_lookup(|_| None), Config::default());
    }

    #[test]
    fn overrides_and_clamping() {
        let cfg = Config::from_lookup(lookup(&[
            ("COMBINE_DATA_PATH", "data/combine.parquet"),
            ("SIMILAR_PLAYERS_K", "0"),
            ("SEASON_MIN", "2005"),
            ("SEASON_MAX", "2018"),
        ]));
        assert!(matches!(cfg.combine_source(), TabularSource::Parquet(_)));
        assert_eq!(cfg.similar_players, 1);
        assert_eq!(cfg.seasons, SeasonRange::new(2010, 2018).unwrap());
    }

    #[test]
    fn inverted_season_bounds_fall_back() {
        let cfg = Config::from_lookup(lookup(&[("SEASON_MIN", "2020"), ("SEASON_MAX", "2012")]));
        assert_eq!(cfg.seasons, SeasonRange::default());
    }
}
