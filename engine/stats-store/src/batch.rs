//! Bulk command construction.
//!
//! Turns one game's player map into a minimal set of bulk storage
//! commands: one per entity type (player identity, passing, rushing,
//! receiving), chunked so a single command never exceeds the bind
//! budget of one prepared statement. Rows carry typed values that are
//! bound as parameters at execution time; nothing is ever interpolated
//! into command text.

use crate::error::{Result, StoreError};
use crate::models::PlayerStats;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Most rows allowed in one bulk command. Stats rows bind 9 parameters
/// each and Postgres caps a prepared statement at 65535 binds, so 1000
/// rows keeps every command well inside the limit.
pub const MAX_ROWS_PER_COMMAND: usize = 1000;

/// One row of the player identity table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub player_id: String,
    pub name: String,
    pub team_abbr: String,
}

/// One row of the passing stats table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassingRow {
    pub player_id: String,
    pub game_date: NaiveDate,
    pub attempts: i32,
    pub completions: i32,
    pub yards: i32,
    pub touchdowns: i32,
    pub interceptions: i32,
    pub two_point_attempts: i32,
    pub two_point_conversions: i32,
}

/// One row of the rushing stats table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RushingRow {
    pub player_id: String,
    pub game_date: NaiveDate,
    pub attempts: i32,
    pub yards: i32,
    pub touchdowns: i32,
    pub longest: i32,
    pub longest_touchdown: i32,
    pub two_point_attempts: i32,
    pub two_point_conversions: i32,
}

/// One row of the receiving stats table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivingRow {
    pub player_id: String,
    pub game_date: NaiveDate,
    pub receptions: i32,
    pub yards: i32,
    pub touchdowns: i32,
    pub longest: i32,
    pub longest_touchdown: i32,
    pub two_point_attempts: i32,
    pub two_point_conversions: i32,
}

/// A single bulk storage operation: many rows of one entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkCommand {
    Players(Vec<PlayerRow>),
    Passing(Vec<PassingRow>),
    Rushing(Vec<RushingRow>),
    Receiving(Vec<ReceivingRow>),
}

impl BulkCommand {
    /// Number of rows the command carries
    pub fn row_count(&self) -> usize {
        match self {
            BulkCommand::Players(rows) => rows.len(),
            BulkCommand::Passing(rows) => rows.len(),
            BulkCommand::Rushing(rows) => rows.len(),
            BulkCommand::Receiving(rows) => rows.len(),
        }
    }
}

/// Convert one game's player map into an ordered sequence of bulk
/// commands.
///
/// Player identity commands come first so the stats tables always
/// reference an existing player. Every player contributes one row per
/// category, zero values included. An empty map yields no commands at
/// all, never a degenerate empty statement. Row order is sorted by
/// player key so output is deterministic.
///
/// Fails without emitting any command if a counter does not fit its
/// 32-bit column; a partially-built command list never escapes.
pub fn serialize(players: &HashMap<String, PlayerStats>) -> Result<Vec<BulkCommand>> {
    if players.is_empty() {
        return Ok(Vec::new());
    }

    let mut keys: Vec<&String> = players.keys().collect();
    keys.sort();

    let mut player_rows = Vec::with_capacity(players.len());
    let mut passing_rows = Vec::with_capacity(players.len());
    let mut rushing_rows = Vec::with_capacity(players.len());
    let mut receiving_rows = Vec::with_capacity(players.len());

    for key in keys {
        let player = &players[key];
        player_rows.push(PlayerRow {
            player_id: key.clone(),
            name: player.name.clone(),
            team_abbr: player.team_abbr.clone(),
        });
        passing_rows.push(passing_row(key, player)?);
        rushing_rows.push(rushing_row(key, player)?);
        receiving_rows.push(receiving_row(key, player)?);
    }

    let mut commands = Vec::new();
    commands.extend(chunked(player_rows, BulkCommand::Players));
    commands.extend(chunked(passing_rows, BulkCommand::Passing));
    commands.extend(chunked(rushing_rows, BulkCommand::Rushing));
    commands.extend(chunked(receiving_rows, BulkCommand::Receiving));
    Ok(commands)
}

/// Split a row set into commands of at most `MAX_ROWS_PER_COMMAND` rows
fn chunked<T>(mut rows: Vec<T>, wrap: impl Fn(Vec<T>) -> BulkCommand) -> Vec<BulkCommand> {
    let mut commands = Vec::new();
    while rows.len() > MAX_ROWS_PER_COMMAND {
        let rest = rows.split_off(MAX_ROWS_PER_COMMAND);
        commands.push(wrap(rows));
        rows = rest;
    }
    commands.push(wrap(rows));
    commands
}

/// Range-check a counter into its 32-bit column type
fn column(field: &'static str, value: i64) -> Result<i32> {
    i32::try_from(value).map_err(|_| StoreError::out_of_range(field, value))
}

fn passing_row(key: &str, player: &PlayerStats) -> Result<PassingRow> {
    let p = &player.passing;
    Ok(PassingRow {
        player_id: key.to_string(),
        game_date: player.game_date,
        attempts: column("att", p.attempts)?,
        completions: column("cmp", p.completions)?,
        yards: column("yds", p.yards)?,
        touchdowns: column("tds", p.touchdowns)?,
        interceptions: column("ints", p.interceptions)?,
        two_point_attempts: column("twopta", p.two_point_attempts)?,
        two_point_conversions: column("twoptm", p.two_point_conversions)?,
    })
}

fn rushing_row(key: &str, player: &PlayerStats) -> Result<RushingRow> {
    let r = &player.rushing;
    Ok(RushingRow {
        player_id: key.to_string(),
        game_date: player.game_date,
        attempts: column("att", r.attempts)?,
        yards: column("yds", r.yards)?,
        touchdowns: column("tds", r.touchdowns)?,
        longest: column("lng", r.longest)?,
        longest_touchdown: column("lngtd", r.longest_touchdown)?,
        two_point_attempts: column("twopta", r.two_point_attempts)?,
        two_point_conversions: column("twoptm", r.two_point_conversions)?,
    })
}

fn receiving_row(key: &str, player: &PlayerStats) -> Result<ReceivingRow> {
    let r = &player.receiving;
    Ok(ReceivingRow {
        player_id: key.to_string(),
        game_date: player.game_date,
        receptions: column("rec", r.receptions)?,
        yards: column("yds", r.yards)?,
        touchdowns: column("tds", r.touchdowns)?,
        longest: column("lng", r.longest)?,
        longest_touchdown: column("lngtd", r.longest_touchdown)?,
        two_point_attempts: column("twopta", r.two_point_attempts)?,
        two_point_conversions: column("twoptm", r.two_point_conversions)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PassingStats, ReceivingStats, RushingStats};

    fn game_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 8, 1).unwrap()
    }

    fn full_player(name: &str, team: &str) -> PlayerStats {
        let mut player = PlayerStats::new(name, team, game_date());
        player.passing = PassingStats { attempts: 30, completions: 20, yards: 250, ..Default::default() };
        player.rushing = RushingStats { attempts: 3, yards: 12, ..Default::default() };
        player.receiving = ReceivingStats { receptions: 1, yards: 9, ..Default::default() };
        player
    }

    #[test]
    fn empty_map_yields_no_commands() {
        let players = HashMap::new();
        assert!(serialize(&players).unwrap().is_empty());
    }

    #[test]
    fn one_full_player_yields_one_row_per_entity_type() {
        let mut players = HashMap::new();
        players.insert("p1".to_string(), full_player("Tom", "NE"));

        let commands = serialize(&players).unwrap();
        assert_eq!(commands.len(), 4);
        assert!(commands.iter().all(|c| c.row_count() == 1));

        // Identity first, then the categories in fixed order.
        match &commands[0] {
            BulkCommand::Players(rows) => {
                assert_eq!(rows[0].player_id, "p1");
                assert_eq!(rows[0].name, "Tom");
                assert_eq!(rows[0].team_abbr, "NE");
            }
            other => panic!("expected identity command first, got {other:?}"),
        }
        assert!(matches!(commands[1], BulkCommand::Passing(_)));
        assert!(matches!(commands[2], BulkCommand::Rushing(_)));
        assert!(matches!(commands[3], BulkCommand::Receiving(_)));
    }

    #[test]
    fn unreported_category_serializes_as_zero_row() {
        let mut players = HashMap::new();
        let mut player = PlayerStats::new("Tom", "NE", game_date());
        player.passing.attempts = 30;
        players.insert("p1".to_string(), player);

        let commands = serialize(&players).unwrap();
        match &commands[2] {
            BulkCommand::Rushing(rows) => {
                assert_eq!(rows[0].attempts, 0);
                assert_eq!(rows[0].yards, 0);
            }
            other => panic!("expected rushing command, got {other:?}"),
        }
    }

    #[test]
    fn rows_are_sorted_by_player_key() {
        let mut players = HashMap::new();
        players.insert("z9".to_string(), full_player("Zed", "NE"));
        players.insert("a1".to_string(), full_player("Abe", "NE"));

        let commands = serialize(&players).unwrap();
        match &commands[0] {
            BulkCommand::Players(rows) => {
                assert_eq!(rows[0].player_id, "a1");
                assert_eq!(rows[1].player_id, "z9");
            }
            other => panic!("expected identity command first, got {other:?}"),
        }
    }

    #[test]
    fn large_maps_are_chunked() {
        let mut players = HashMap::new();
        for i in 0..(MAX_ROWS_PER_COMMAND + 1) {
            players.insert(format!("p{i:05}"), full_player("Someone", "NE"));
        }

        let commands = serialize(&players).unwrap();
        // Two commands per entity type: a full chunk plus the remainder.
        assert_eq!(commands.len(), 8);
        assert_eq!(commands[0].row_count(), MAX_ROWS_PER_COMMAND);
        assert_eq!(commands[1].row_count(), 1);
    }

    #[test]
    fn out_of_range_counter_fails_the_whole_batch() {
        let mut players = HashMap::new();
        let mut player = full_player("Tom", "NE");
        player.passing.yards = i64::from(i32::MAX) + 1;
        players.insert("p1".to_string(), player);
        players.insert("p2".to_string(), full_player("Bill", "NE"));

        let err = serialize(&players).unwrap_err();
        assert!(matches!(err, StoreError::OutOfRange { field: "yds", .. }));
    }
}
