use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::models::Game;
use crate::normalize::{self, ProviderPayload, RawSchedule};
use crate::providers::GameProvider;

const SCHEDULE_URL: &str =
    "https://cdn.nba.com/static/json/staticData/scheduleLeagueV2.json";

/// Client for the public NBA schedule mirror - the fallback of last
/// resort when both the odds feed and the live scoreboard come up empty.
/// No API key required.
pub struct ScheduleFeedClient {
    client: reqwest::Client,
}

impl ScheduleFeedClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Fetch the full league schedule, flattened across game dates
    pub async fn fetch_schedule(&self) -> Result<Vec<Game>> {
        let response = self
            .client
            .get(SCHEDULE_URL)
            .send()
            .await
            .context("Failed to fetch schedule feed")?;

        if !response.status().is_success() {
            anyhow::bail!("Schedule feed returned error: {}", response.status());
        }

        let schedule: RawSchedule = response
            .json()
            .await
            .context("Failed to parse schedule feed response")?;

        Ok(normalize::normalize(ProviderPayload::Schedule(schedule)))
    }
}

#[async_trait]
impl GameProvider for ScheduleFeedClient {
    fn name(&self) -> &str {
        "schedule_feed"
    }

    async fn fetch_games(&self) -> Result<Vec<Game>> {
        self.fetch_schedule().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn test_fetch_schedule() {
        let client = ScheduleFeedClient::new(Duration::from_secs(10));
        let games = client.fetch_schedule().await.unwrap();
        assert!(!games.is_empty());
    }
}
