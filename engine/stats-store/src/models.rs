//! Domain records for per-player, per-game statistics.
//!
//! One `PlayerStats` value aggregates everything the feed reported for a
//! single player in a single game. A category sub-record that the feed
//! did not report stays at its zero value; it is never optional. The
//! feed does not distinguish "reported all zeros" from "not reported",
//! so neither do these records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// All information for one player in one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub team_abbr: String,
    /// Calendar date of the game (the feed has no kickoff time)
    pub game_date: NaiveDate,
    pub passing: PassingStats,
    pub rushing: RushingStats,
    pub receiving: ReceivingStats,
}

impl PlayerStats {
    /// Create a record with identity fields set and all categories at
    /// their zero values.
    pub fn new(name: impl Into<String>, team_abbr: impl Into<String>, game_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            team_abbr: team_abbr.into(),
            game_date,
            passing: PassingStats::default(),
            rushing: RushingStats::default(),
            receiving: ReceivingStats::default(),
        }
    }
}

/// Passing stats for a player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassingStats {
    pub attempts: i64,
    pub completions: i64,
    pub yards: i64,
    pub touchdowns: i64,
    pub interceptions: i64,
    pub two_point_attempts: i64,
    pub two_point_conversions: i64,
}

/// Rushing stats for a player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RushingStats {
    pub attempts: i64,
    pub yards: i64,
    pub touchdowns: i64,
    pub longest: i64,
    pub longest_touchdown: i64,
    pub two_point_attempts: i64,
    pub two_point_conversions: i64,
}

/// Receiving stats for a player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivingStats {
    pub receptions: i64,
    pub yards: i64,
    pub touchdowns: i64,
    pub longest: i64,
    pub longest_touchdown: i64,
    pub two_point_attempts: i64,
    pub two_point_conversions: i64,
}

/// The three stat categories the feed reports, each with its own
/// required-field schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatCategory {
    Passing,
    Rushing,
    Receiving,
}

impl StatCategory {
    pub const ALL: [StatCategory; 3] =
        [StatCategory::Passing, StatCategory::Rushing, StatCategory::Receiving];

    /// Key of this category's section inside a team's `stats` map
    pub fn feed_key(self) -> &'static str {
        match self {
            StatCategory::Passing => "passing",
            StatCategory::Rushing => "rushing",
            StatCategory::Receiving => "receiving",
        }
    }

    /// Numeric fields a feed entry must carry for the category to be
    /// accepted, in record-field order. `name` is required on top of
    /// these for every category.
    pub fn required_fields(self) -> &'static [&'static str; 7] {
        match self {
            StatCategory::Passing => &["att", "cmp", "yds", "tds", "ints", "twopta", "twoptm"],
            StatCategory::Rushing => &["att", "yds", "tds", "lng", "lngtd", "twopta", "twoptm"],
            StatCategory::Receiving => &["rec", "yds", "tds", "lng", "lngtd", "twopta", "twoptm"],
        }
    }
}
