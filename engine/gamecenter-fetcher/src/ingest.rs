//! The crawl loop: fetch, normalize, serialize, persist.
//!
//! Strictly sequential. One fetch is in flight at a time and a game is
//! fully persisted before the cursor moves, so the cursor's
//! (date, game number) pair is the only state crossing game boundaries.
//! A single game's failure never stops the crawl; only exhausted
//! transport retries surface to the caller.

use crate::config::RetryConfig;
use crate::cursor::{GameKey, GameKeyCursor};
use crate::feed::{FeedError, FetchOutcome, GameFeed};
use crate::normalizer::{normalize, NormalizeError};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::time::Duration;
use stats_store::models::PlayerStats;
use stats_store::repository::StatsSink;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// What one crawl cycle accomplished
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Games fetched, normalized, and stored
    pub games_ingested: u64,

    /// Days rolled past (not-found keys, missing-key documents,
    /// malformed documents)
    pub days_scanned: u64,

    /// Player records written across all games
    pub players_upserted: u64,
}

/// Sequential ingestion pipeline over a game feed and a stats sink
pub struct Ingestor<F, S> {
    feed: F,
    sink: S,
    retry: RetryConfig,
}

impl<F: GameFeed, S: StatsSink> Ingestor<F, S> {
    pub fn new(feed: F, sink: S, retry: RetryConfig) -> Self {
        Self { feed, sink, retry }
    }

    /// Crawl from the cursor's position until it catches up with the
    /// live window. The cursor is left where the crawl stopped, so the
    /// next cycle resumes there.
    pub async fn run_crawl(&self, cursor: &mut GameKeyCursor) -> Result<CrawlSummary> {
        let mut summary = CrawlSummary::default();

        while !cursor.is_exhausted() {
            let key = cursor.current();
            let token = key.feed_token();

            let outcome = self
                .fetch_with_retry(&key)
                .await
                .with_context(|| format!("feed unreachable at game key {token}"))?;

            match outcome {
                FetchOutcome::NotFound => {
                    debug!("no game document for key {token}");
                    summary.days_scanned += 1;
                    cursor.advance(false);
                }
                FetchOutcome::Found(bytes) => match normalize(&bytes, &key) {
                    Ok(players) => {
                        self.persist_game(&token, &players, &mut summary).await;
                        cursor.advance(true);
                    }
                    Err(NormalizeError::KeyNotPresent(_)) => {
                        debug!("document for key {token} has no game entry");
                        summary.days_scanned += 1;
                        cursor.advance(false);
                    }
                    Err(err @ NormalizeError::MalformedFeed(_)) => {
                        error!("skipping game key {token}: {err}");
                        summary.days_scanned += 1;
                        cursor.advance(false);
                    }
                },
            }
        }

        Ok(summary)
    }

    /// Serialize and store one normalized game. Storage failures are
    /// logged and the crawl moves on; the commands for this game were
    /// built all-or-nothing, so nothing partial was handed over.
    async fn persist_game(
        &self,
        token: &str,
        players: &HashMap<String, PlayerStats>,
        summary: &mut CrawlSummary,
    ) {
        if players.is_empty() {
            debug!("game {token} parsed but carried no player stats");
            return;
        }

        let commands = match stats_store::batch::serialize(players) {
            Ok(commands) => commands,
            Err(err) => {
                error!("failed to serialize game {token}: {err}");
                return;
            }
        };

        match self.sink.save(&commands).await {
            Ok(rows) => {
                summary.games_ingested += 1;
                summary.players_upserted += players.len() as u64;
                info!("game {token}: stored {} players ({rows} rows)", players.len());
            }
            Err(err) => error!("failed to store game {token}: {err}"),
        }
    }

    /// Fetch one key, retrying transport-level failures with
    /// exponential backoff.
    async fn fetch_with_retry(&self, key: &GameKey) -> Result<FetchOutcome, FeedError> {
        let mut delay = Duration::from_secs(self.retry.initial_delay_secs);

        for attempt in 1..=self.retry.max_retries {
            match self.feed.fetch(key).await {
                Ok(outcome) => return Ok(outcome),
                Err(err) => {
                    if attempt == self.retry.max_retries {
                        return Err(err);
                    }

                    warn!(
                        "fetch attempt {attempt} for {} failed: {err}, retrying in {delay:?}",
                        key.feed_token()
                    );
                    sleep(delay).await;

                    // Exponential backoff
                    delay = Duration::from_secs(
                        (delay.as_secs() as f64 * self.retry.backoff_multiplier)
                            .min(self.retry.max_delay_secs as f64) as u64,
                    );
                }
            }
        }

        unreachable!()
    }
}
