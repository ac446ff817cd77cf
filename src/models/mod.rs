use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a game currently sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Scheduled,
    Live,
    Final,
}

/// One scheduled/live/finished NBA contest, normalized from whichever
/// provider happened to answer. Transient view only - never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub home_team: String,
    pub away_team: String,
    pub start_time: Option<DateTime<Utc>>,
    pub status: GameStatus,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    /// Markets from the first available bookmaker, when the source had any
    pub odds: Option<OddsQuote>,
}

/// A single outcome within a spread/total market
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsOutcome {
    pub name: String,
    pub price: Option<i32>, // American odds format (e.g., -110, +150)
    pub point: Option<f64>,
}

/// Moneyline prices for both sides of a game
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoneylinePrices {
    pub home: Option<i32>,
    pub away: Option<i32>,
}

/// Market prices for one game, sourced from a single bookmaker.
/// At most one bookmaker is surfaced per game (first available wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsQuote {
    pub bookmaker: String,
    pub moneyline: MoneylinePrices,
    pub spread: Vec<OddsOutcome>,
    pub total: Vec<OddsOutcome>,
}

/// The three bet types a prediction can score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    Moneyline,
    Spread,
    Total,
}

impl Market {
    pub const ALL: [Market; 3] = [Market::Moneyline, Market::Spread, Market::Total];

    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Moneyline => "moneyline",
            Market::Spread => "spread",
            Market::Total => "total",
        }
    }

    pub fn parse(s: &str) -> Option<Market> {
        match s.to_lowercase().as_str() {
            "moneyline" => Some(Market::Moneyline),
            "spread" => Some(Market::Spread),
            "total" => Some(Market::Total),
            _ => None,
        }
    }
}

/// Outcome label on a ledger row. Starts Pending, labeled exactly once
/// by the reconcile job or a manual override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionResult {
    Pending,
    Success,
    Fail,
}

impl PredictionResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionResult::Pending => "pending",
            PredictionResult::Success => "success",
            PredictionResult::Fail => "fail",
        }
    }

    pub fn parse(s: &str) -> Option<PredictionResult> {
        match s.to_lowercase().as_str() {
            "pending" => Some(PredictionResult::Pending),
            "success" => Some(PredictionResult::Success),
            "fail" => Some(PredictionResult::Fail),
            _ => None,
        }
    }
}

/// A durable prediction ledger row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: i64,
    pub timestamp: String,
    pub home_team: String,
    pub away_team: String,
    pub market: Market,
    /// Label vocabulary depends on market: Home/Away for moneyline,
    /// Cover/No Cover for spread, Over/Under for total
    pub predicted_outcome: String,
    pub confidence: f64,
    pub result: PredictionResult,
}

/// One logged accuracy measurement per training run; append-only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccuracyRecord {
    pub id: i64,
    pub timestamp: String,
    pub metric_name: String,
    pub value: f64,
}

/// Per-market success-rate aggregate, computed on read
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MarketSummary {
    pub total: u64,
    pub successes: u64,
    pub rate: f64,
}
