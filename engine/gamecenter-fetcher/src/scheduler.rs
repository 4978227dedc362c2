//! Periodic trigger for the crawl.
//!
//! Owns the cursor across cycles: a cycle that catches up with the
//! live window leaves the cursor parked on tomorrow, and the next tick
//! resumes from there once the clock has moved. A failed cycle keeps
//! the cursor where it stopped and the next tick retries from that key.

use crate::config::FetcherConfig;
use crate::cursor::GameKeyCursor;
use crate::feed::GameCenterFeed;
use crate::ingest::Ingestor;
use anyhow::Result;
use std::time::Duration;
use stats_store::repository::StatsRepository;
use tokio::time::interval;
use tracing::{error, info};

/// Scheduler for the game-center fetcher service
pub struct FetcherScheduler {
    config: FetcherConfig,
    ingestor: Ingestor<GameCenterFeed, StatsRepository>,
    cursor: GameKeyCursor,
}

impl FetcherScheduler {
    /// Create a new scheduler: build the feed client, connect the
    /// repository, and position the cursor at the configured start date.
    pub async fn new(config: FetcherConfig) -> Result<Self> {
        let feed = GameCenterFeed::new(&config.feed)?;
        let repository = StatsRepository::connect(
            &config.database.url,
            config.database.max_connections,
        )
        .await?;
        let cursor = GameKeyCursor::new(config.crawl.start_date);
        let ingestor = Ingestor::new(feed, repository, config.crawl.retry.clone());

        Ok(Self { config, ingestor, cursor })
    }

    /// Run crawl cycles forever at the configured interval. The first
    /// cycle starts immediately.
    pub async fn start(&mut self) -> Result<()> {
        info!(
            "starting game-center crawl scheduler (every {}h from {})",
            self.config.crawl.interval_hours, self.config.crawl.start_date
        );

        let mut ticker = interval(Duration::from_secs(self.config.crawl.interval_hours * 3600));

        loop {
            ticker.tick().await;

            info!("crawl cycle starting at key {}", self.cursor.current().feed_token());
            match self.ingestor.run_crawl(&mut self.cursor).await {
                Ok(summary) => info!(
                    "crawl cycle complete: {} games ingested, {} players upserted, {} days scanned",
                    summary.games_ingested, summary.players_upserted, summary.days_scanned
                ),
                Err(e) => error!("crawl cycle failed: {e:#}"),
            }
        }
    }
}
