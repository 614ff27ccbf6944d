use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::records::SeasonStat;

/// Positions a hypothetical new player can be entered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryPosition {
    WR,
    RB,
}

const POSITION_STATS: &[(QueryPosition, &[SeasonStat])] = &[
    (
        QueryPosition::WR,
        &[
            SeasonStat::ReceivingYards,
            SeasonStat::ReceivingTds,
            SeasonStat::ReceivingYardsAfterCatch,
            SeasonStat::Receptions,
        ],
    ),
    (
        QueryPosition::RB,
        &[
            SeasonStat::Carries,
            SeasonStat::RushingYards,
            SeasonStat::RushingTds,
        ],
    ),
];

impl QueryPosition {
    pub const ALL: [QueryPosition; 2] = [QueryPosition::WR, QueryPosition::RB];

    pub fn label(self) -> &'static str {
        match self {
            QueryPosition::WR => "WR",
            QueryPosition::RB => "RB",
        }
    }

    /// Season statistics offered for this position, in menu order.
    pub fn season_stats(self) -> &'static [SeasonStat] {
        POSITION_STATS
            .iter()
            .find(|(pos, _)| *pos == self)
            .map(|(_, stats)| *stats)
            .unwrap_or(&[])
    }

    pub fn allows(self, stat: SeasonStat) -> bool {
        self.season_stats().contains(&stat)
    }
}

impl fmt::Display for QueryPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for QueryPosition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryPosition::ALL
            .into_iter()
            .find(|pos| pos.label() == normalize_position_label(s))
            .ok_or_else(|| Error::invalid(format!("unknown position code '{s}'")))
    }
}

/// Canonical form for position labels coming from either dataset.
pub fn normalize_position_label(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
