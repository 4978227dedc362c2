//! Postgres execution of bulk stats commands.
//!
//! Each `BulkCommand` becomes one parameterized multi-row upsert. The
//! three category tables are executed independently; cross-category
//! atomicity is not provided, matching the source system.

use crate::batch::BulkCommand;
use crate::error::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

/// Abstract sink for one game's bulk commands
#[async_trait::async_trait]
pub trait StatsSink: Send + Sync {
    /// Execute the commands in order, returning the total rows written
    async fn save(&self, commands: &[BulkCommand]) -> Result<u64>;
}

/// Postgres-backed stats repository
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    /// Connect a repository to the given database URL
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl StatsSink for StatsRepository {
    async fn save(&self, commands: &[BulkCommand]) -> Result<u64> {
        let mut rows_written = 0;
        for command in commands {
            let mut builder = build_upsert(command);
            let result = builder.build().execute(&self.pool).await?;
            rows_written += result.rows_affected();
            debug!("executed bulk command for {} rows", command.row_count());
        }
        Ok(rows_written)
    }
}

/// Render one bulk command as a parameterized multi-row upsert.
///
/// Players are keyed by `player_id`; category tables by
/// `(player_id, game_date)`. Re-crawling a day overwrites the earlier
/// rows instead of duplicating them.
fn build_upsert(command: &BulkCommand) -> QueryBuilder<'static, Postgres> {
    match command {
        BulkCommand::Players(rows) => {
            let mut qb =
                QueryBuilder::new("INSERT INTO players (player_id, name, team_abbr) ");
            qb.push_values(rows, |mut b, row| {
                b.push_bind(row.player_id.clone())
                    .push_bind(row.name.clone())
                    .push_bind(row.team_abbr.clone());
            });
            qb.push(
                " ON CONFLICT (player_id) DO UPDATE SET \
                 name = EXCLUDED.name, team_abbr = EXCLUDED.team_abbr",
            );
            qb
        }
        BulkCommand::Passing(rows) => {
            let mut qb = QueryBuilder::new(
                "INSERT INTO passing_stats (player_id, game_date, attempts, completions, \
                 yards, touchdowns, interceptions, two_point_attempts, two_point_conversions) ",
            );
            qb.push_values(rows, |mut b, row| {
                b.push_bind(row.player_id.clone())
                    .push_bind(row.game_date)
                    .push_bind(row.attempts)
                    .push_bind(row.completions)
                    .push_bind(row.yards)
                    .push_bind(row.touchdowns)
                    .push_bind(row.interceptions)
                    .push_bind(row.two_point_attempts)
                    .push_bind(row.two_point_conversions);
            });
            qb.push(
                " ON CONFLICT (player_id, game_date) DO UPDATE SET \
                 attempts = EXCLUDED.attempts, completions = EXCLUDED.completions, \
                 yards = EXCLUDED.yards, touchdowns = EXCLUDED.touchdowns, \
                 interceptions = EXCLUDED.interceptions, \
                 two_point_attempts = EXCLUDED.two_point_attempts, \
                 two_point_conversions = EXCLUDED.two_point_conversions",
            );
            qb
        }
        BulkCommand::Rushing(rows) => {
            let mut qb = QueryBuilder::new(
                "INSERT INTO rushing_stats (player_id, game_date, attempts, yards, \
                 touchdowns, longest, longest_touchdown, two_point_attempts, \
                 two_point_conversions) ",
            );
            qb.push_values(rows, |mut b, row| {
                b.push_bind(row.player_id.clone())
                    .push_bind(row.game_date)
                    .push_bind(row.attempts)
                    .push_bind(row.yards)
                    .push_bind(row.touchdowns)
                    .push_bind(row.longest)
                    .push_bind(row.longest_touchdown)
                    .push_bind(row.two_point_attempts)
                    .push_bind(row.two_point_conversions);
            });
            qb.push(
                " ON CONFLICT (player_id, game_date) DO UPDATE SET \
                 attempts = EXCLUDED.attempts, yards = EXCLUDED.yards, \
                 touchdowns = EXCLUDED.touchdowns, longest = EXCLUDED.longest, \
                 longest_touchdown = EXCLUDED.longest_touchdown, \
                 two_point_attempts = EXCLUDED.two_point_attempts, \
                 two_point_conversions = EXCLUDED.two_point_conversions",
            );
            qb
        }
        BulkCommand::Receiving(rows) => {
            let mut qb = QueryBuilder::new(
                "INSERT INTO receiving_stats (player_id, game_date, receptions, yards, \
                 touchdowns, longest, longest_touchdown, two_point_attempts, \
                 two_point_conversions) ",
            );
            qb.push_values(rows, |mut b, row| {
                b.push_bind(row.player_id.clone())
                    .push_bind(row.game_date)
                    .push_bind(row.receptions)
                    .push_bind(row.yards)
                    .push_bind(row.touchdowns)
                    .push_bind(row.longest)
                    .push_bind(row.longest_touchdown)
                    .push_bind(row.two_point_attempts)
                    .push_bind(row.two_point_conversions);
            });
            qb.push(
                " ON CONFLICT (player_id, game_date) DO UPDATE SET \
                 receptions = EXCLUDED.receptions, yards = EXCLUDED.yards, \
                 touchdowns = EXCLUDED.touchdowns, longest = EXCLUDED.longest, \
                 longest_touchdown = EXCLUDED.longest_touchdown, \
                 two_point_attempts = EXCLUDED.two_point_attempts, \
                 two_point_conversions = EXCLUDED.two_point_conversions",
            );
            qb
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{PassingRow, PlayerRow};
    use chrono::NaiveDate;
    use sqlx::Execute;

    #[test]
    fn players_upsert_is_fully_parameterized() {
        let command = BulkCommand::Players(vec![
            PlayerRow {
                player_id: "p1".to_string(),
                name: "O'Brien".to_string(),
                team_abbr: "HOU".to_string(),
            },
            PlayerRow {
                player_id: "p2".to_string(),
                name: "Tom".to_string(),
                team_abbr: "NE".to_string(),
            },
        ]);

        let mut builder = build_upsert(&command);
        let query = builder.build();
        let sql = query.sql();

        assert!(sql.starts_with("INSERT INTO players"));
        assert!(sql.contains("ON CONFLICT (player_id)"));
        // Two rows of three columns, every value a placeholder. The
        // apostrophe in the name never reaches the command text.
        assert_eq!(sql.matches('$').count(), 6);
        assert!(!sql.contains("O'Brien"));
    }

    #[test]
    fn passing_upsert_binds_nine_columns_per_row() {
        let row = PassingRow {
            player_id: "p1".to_string(),
            game_date: NaiveDate::from_ymd_opt(2018, 8, 1).unwrap(),
            attempts: 30,
            completions: 20,
            yards: 250,
            touchdowns: 2,
            interceptions: 0,
            two_point_attempts: 0,
            two_point_conversions: 0,
        };
        let command = BulkCommand::Passing(vec![row]);

        let mut builder = build_upsert(&command);
        let query = builder.build();
        let sql = query.sql();

        assert!(sql.starts_with("INSERT INTO passing_stats"));
        assert!(sql.contains("ON CONFLICT (player_id, game_date)"));
        assert_eq!(sql.matches('$').count(), 9);
    }
}
