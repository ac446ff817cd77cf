use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::models::Game;
use crate::normalize::{self, ProviderPayload, RawOddsEvent};
use crate::providers::GameProvider;

const ODDS_API_BASE_URL: &str = "https://api.the-odds-api.com/v4";
const SPORT_KEY: &str = "basketball_nba";

/// Client for The Odds API - the authoritative, API-key-authenticated
/// source for bookmaker markets (moneyline, spread, total)
pub struct OddsApiClient {
    api_key: String,
    client: reqwest::Client,
}

impl OddsApiClient {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self {
            api_key,
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Fetch upcoming NBA games with odds from all three markets
    pub async fn fetch_odds(&self) -> Result<Vec<Game>> {
        let url = format!("{}/sports/{}/odds", ODDS_API_BASE_URL, SPORT_KEY);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", "us"),
                ("markets", "h2h,spreads,totals"),
                ("oddsFormat", "american"),
            ])
            .send()
            .await
            .context("Failed to fetch odds from The Odds API")?;

        if !response.status().is_success() {
            anyhow::bail!("Odds API returned error: {}", response.status());
        }

        let events: Vec<RawOddsEvent> = response
            .json()
            .await
            .context("Failed to parse Odds API response")?;

        Ok(normalize::normalize(ProviderPayload::OddsApi(events)))
    }

    /// Check how many API requests you have remaining
    pub async fn check_usage(&self) -> Result<()> {
        let url = format!("{}/sports", ODDS_API_BASE_URL);

        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        if let Some(remaining) = response.headers().get("x-requests-remaining") {
            println!("API requests remaining: {:?}", remaining);
        }

        if let Some(used) = response.headers().get("x-requests-used") {
            println!("API requests used: {:?}", used);
        }

        Ok(())
    }
}

#[async_trait]
impl GameProvider for OddsApiClient {
    fn name(&self) -> &str {
        "odds_api"
    }

    async fn fetch_games(&self) -> Result<Vec<Game>> {
        self.fetch_odds().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn test_fetch_odds() {
        dotenv::dotenv().ok();
        let api_key = std::env::var("ODDS_API_KEY").expect("ODDS_API_KEY not set");
        let client = OddsApiClient::new(api_key, Duration::from_secs(10));

        let games = client.fetch_odds().await.unwrap();
        assert!(!games.is_empty());
    }
}
