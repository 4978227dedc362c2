//! Feed document normalization.
//!
//! A game document is a generic JSON tree keyed by the feed token, with
//! `home` and `away` sections that each carry a team abbreviation and a
//! `stats` map of category sections. Normalization walks that tree and
//! produces one typed `PlayerStats` per player key, merging the three
//! categories onto the same record.
//!
//! The policy is deliberately lenient below the top level: a document
//! that parses but is missing sections simply yields fewer players, and
//! a single entry that fails its category schema is skipped without
//! touching what was already merged for that player. Only two failures
//! surface as errors: bytes that are not JSON at all, and a parsed
//! document with no entry for the requested game key.

use crate::cursor::GameKey;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use stats_store::models::{
    PassingStats, PlayerStats, ReceivingStats, RushingStats, StatCategory,
};
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by normalization; both are per-fetch, not fatal to
/// the crawl.
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// The bytes do not parse as JSON at all
    #[error("malformed feed document: {0}")]
    MalformedFeed(#[from] serde_json::Error),

    /// The document parsed but has no entry for the requested game key;
    /// callers should treat this like a NotFound fetch
    #[error("feed document has no entry for game key {0}")]
    KeyNotPresent(String),
}

/// Normalize one raw game document into a per-game player map.
pub fn normalize(
    bytes: &[u8],
    key: &GameKey,
) -> Result<HashMap<String, PlayerStats>, NormalizeError> {
    let document: Value = serde_json::from_slice(bytes)?;
    let token = key.feed_token();

    let mut players = HashMap::new();

    // A parsed but non-map root is found-but-empty, like any other
    // shape mismatch below the top level. Only a map root that lacks
    // the game-key entry is reported, so the caller can roll the day.
    let Some(root) = document.as_object() else {
        return Ok(players);
    };
    let game = root.get(&token).ok_or(NormalizeError::KeyNotPresent(token))?;

    let Some(game) = game.as_object() else {
        return Ok(players);
    };
    // Both sides must exist before either is read; a one-sided document
    // carries no extractable player data.
    if !game.contains_key("home") || !game.contains_key("away") {
        return Ok(players);
    }

    for side in ["home", "away"] {
        if let Some(team) = game.get(side).and_then(Value::as_object) {
            merge_side(&mut players, team, key);
        }
    }

    Ok(players)
}

/// Merge one side's category sections into the player map. A side
/// without a string `abbr` or a map-shaped `stats` is skipped whole.
fn merge_side(players: &mut HashMap<String, PlayerStats>, team: &Map<String, Value>, key: &GameKey) {
    let Some(abbr) = team.get("abbr").and_then(Value::as_str) else {
        return;
    };
    let Some(stats) = team.get("stats").and_then(Value::as_object) else {
        return;
    };

    for category in StatCategory::ALL {
        let Some(entries) = stats.get(category.feed_key()).and_then(Value::as_object) else {
            continue;
        };

        for (player_key, entry) in entries {
            let Some(entry) = entry.as_object() else {
                debug!("skipping {player_key}/{}: entry is not a map", category.feed_key());
                continue;
            };
            let (name, record) = match decode_entry(category, entry) {
                Ok(decoded) => decoded,
                Err(skip) => {
                    debug!("skipping {player_key}/{}: {skip}", category.feed_key());
                    continue;
                }
            };

            let player = players
                .entry(player_key.clone())
                .or_insert_with(|| PlayerStats::new("", abbr, key.date));
            // Restamp identity on every touch; invariant per side, so
            // this is idempotent in practice.
            player.name = name;
            player.team_abbr = abbr.to_string();
            player.game_date = key.date;
            match record {
                CategoryRecord::Passing(p) => player.passing = p,
                CategoryRecord::Rushing(r) => player.rushing = r,
                CategoryRecord::Receiving(r) => player.receiving = r,
            }
        }
    }
}

/// One decoded category record
enum CategoryRecord {
    Passing(PassingStats),
    Rushing(RushingStats),
    Receiving(ReceivingStats),
}

/// Reason a player/category entry was rejected
#[derive(Debug, PartialEq, Eq)]
enum DecodeSkip {
    MissingField(&'static str),
    NotNumeric(&'static str),
    NameNotString,
}

impl fmt::Display for DecodeSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeSkip::MissingField(field) => write!(f, "missing field '{field}'"),
            DecodeSkip::NotNumeric(field) => write!(f, "field '{field}' is not numeric"),
            DecodeSkip::NameNotString => write!(f, "'name' is missing or not a string"),
        }
    }
}

/// Schema-validating decode of one entry: either every required field
/// is present and numeric and `name` is a string, or the whole entry is
/// rejected. There is no partial-field tolerance.
fn decode_entry(
    category: StatCategory,
    entry: &Map<String, Value>,
) -> Result<(String, CategoryRecord), DecodeSkip> {
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .ok_or(DecodeSkip::NameNotString)?
        .to_string();

    let mut values = [0i64; 7];
    for (slot, field) in values.iter_mut().zip(category.required_fields()) {
        *slot = numeric_field(entry, field)?;
    }

    Ok((name, build_record(category, values)))
}

/// Read one required counter. The feed writes plain JSON numbers;
/// fractional values are truncated.
fn numeric_field(entry: &Map<String, Value>, field: &'static str) -> Result<i64, DecodeSkip> {
    let value = entry.get(field).ok_or(DecodeSkip::MissingField(field))?;
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .ok_or(DecodeSkip::NotNumeric(field))
}

/// Assemble the typed record from values in required-field order
fn build_record(category: StatCategory, v: [i64; 7]) -> CategoryRecord {
    match category {
        StatCategory::Passing => CategoryRecord::Passing(PassingStats {
            attempts: v[0],
            completions: v[1],
            yards: v[2],
            touchdowns: v[3],
            interceptions: v[4],
            two_point_attempts: v[5],
            two_point_conversions: v[6],
        }),
        StatCategory::Rushing => CategoryRecord::Rushing(RushingStats {
            attempts: v[0],
            yards: v[1],
            touchdowns: v[2],
            longest: v[3],
            longest_touchdown: v[4],
            two_point_attempts: v[5],
            two_point_conversions: v[6],
        }),
        StatCategory::Receiving => CategoryRecord::Receiving(ReceivingStats {
            receptions: v[0],
            yards: v[1],
            touchdowns: v[2],
            longest: v[3],
            longest_touchdown: v[4],
            two_point_attempts: v[5],
            two_point_conversions: v[6],
        }),
    }
}
