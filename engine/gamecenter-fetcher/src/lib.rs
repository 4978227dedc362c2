//! Game-Center Fetcher Service
//!
//! This service crawls the per-game statistics feed day by day,
//! normalizes the nested JSON into typed per-player records, and hands
//! them to the stats store as bulk commands. The crawl walks
//! (date, game number) keys: a found game advances the game number on
//! the same date, a miss rolls over to the next day, and the crawl
//! stops when it reaches tomorrow relative to the wall clock.

pub mod config;
pub mod cursor;
pub mod feed;
pub mod ingest;
pub mod normalizer;
pub mod scheduler;

pub use config::FetcherConfig;
pub use cursor::{GameKey, GameKeyCursor};
pub use feed::{FeedError, FetchOutcome, GameCenterFeed, GameFeed};
pub use ingest::{CrawlSummary, Ingestor};
pub use normalizer::{normalize, NormalizeError};
pub use scheduler::FetcherScheduler;
