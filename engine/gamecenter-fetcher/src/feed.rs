//! Game-center feed client.
//!
//! The feed serves one JSON document per game at
//! `{base}/{token}/{token}_gtd.json`. A 404 is not an error: it is how
//! the feed signals that a game number does not exist for a date, and
//! it drives the crawl's day rollover. Everything else that goes wrong
//! is a `FeedError`.

use crate::config::FeedConfig;
use crate::cursor::GameKey;
use anyhow::Context;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Outcome of fetching one game key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The feed served a document for this key
    Found(Vec<u8>),

    /// The feed has no resource for this key (expected; day rollover)
    NotFound,
}

/// Failures reaching the feed, distinct from the NotFound signal
#[derive(Error, Debug)]
pub enum FeedError {
    /// Network-level failure (connect, timeout, body read)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The feed answered with an unexpected HTTP status
    #[error("feed returned status {0}")]
    Status(StatusCode),
}

/// Source of raw game documents
#[async_trait::async_trait]
pub trait GameFeed: Send + Sync {
    async fn fetch(&self, key: &GameKey) -> Result<FetchOutcome, FeedError>;
}

/// HTTP implementation over the game-center endpoint
pub struct GameCenterFeed {
    client: Client,
    base_url: String,
}

impl GameCenterFeed {
    pub fn new(config: &FeedConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn document_url(&self, key: &GameKey) -> String {
        let token = key.feed_token();
        format!("{}/{}/{}_gtd.json", self.base_url, token, token)
    }
}

#[async_trait::async_trait]
impl GameFeed for GameCenterFeed {
    async fn fetch(&self, key: &GameKey) -> Result<FetchOutcome, FeedError> {
        let url = self.document_url(key);
        debug!("fetching game document: {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(FetchOutcome::NotFound);
        }
        if !response.status().is_success() {
            return Err(FeedError::Status(response.status()));
        }

        let bytes = response.bytes().await?;
        Ok(FetchOutcome::Found(bytes.to_vec()))
    }
}
