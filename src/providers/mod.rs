pub mod fallback;
pub mod live_score;
pub mod odds_api;
pub mod schedule_feed;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::Config;
use crate::models::Game;
use fallback::FallbackChain;
use live_score::LiveScoreClient;
use odds_api::OddsApiClient;
use schedule_feed::ScheduleFeedClient;

/// One upstream data source for games, odds, or scores.
///
/// A provider performs a single bounded-timeout fetch and maps its response
/// into canonical games, or fails. No retries here - resilience lives in
/// the [`FallbackChain`].
#[async_trait]
pub trait GameProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    async fn fetch_games(&self) -> Result<Vec<Game>>;
}

/// Chain used by the quote path: authoritative odds feed first, then the
/// score feed, then the public schedule mirror
pub fn odds_chain(config: &Config) -> FallbackChain {
    FallbackChain::new(vec![
        Arc::new(OddsApiClient::new(
            config.odds_api_key.clone(),
            config.http_timeout,
        )),
        Arc::new(LiveScoreClient::new(config.http_timeout)),
        Arc::new(ScheduleFeedClient::new(config.http_timeout)),
    ])
}

/// Chain used by the reconcile job: score-capable providers only
pub fn score_chain(config: &Config) -> FallbackChain {
    FallbackChain::new(vec![
        Arc::new(LiveScoreClient::new(config.http_timeout)),
        Arc::new(ScheduleFeedClient::new(config.http_timeout)),
    ])
}
