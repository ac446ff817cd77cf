use std::time::Duration;

/// Runtime configuration, read once at startup from the environment
/// (with `.env` support via dotenv in the binaries).
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for The Odds API (the only authenticated upstream)
    pub odds_api_key: String,
    /// SQLite database URL for the prediction ledger
    pub database_url: String,
    /// Address the web server binds to
    pub bind_addr: String,
    /// Bounded timeout applied to every upstream fetch
    pub http_timeout: Duration,
    /// Path to the trained model file; missing file means the scoring
    /// model is unavailable, not an error
    pub model_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        let timeout_secs = std::env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        Self {
            odds_api_key: std::env::var("ODDS_API_KEY").unwrap_or_default(),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://nba_ai.db?mode=rwc".to_string()),
            bind_addr: std::env::var("BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8000".to_string()),
            http_timeout: Duration::from_secs(timeout_secs),
            model_path: std::env::var("MODEL_PATH")
                .unwrap_or_else(|_| "models/nba_model.json".to_string()),
        }
    }
}
