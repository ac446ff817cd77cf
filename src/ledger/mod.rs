//! Durable store of prediction rows and model-accuracy measurements.
//!
//! Append-only except for the single outcome-labeling mutation on the
//! `result` column. Every operation is a single SQL statement; there is
//! no multi-row transaction guarantee across append + reconcile.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use thiserror::Error;

use crate::models::{AccuracyRecord, Market, MarketSummary, PredictionRecord, PredictionResult};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("prediction {id} not found")]
    NotFound { id: i64 },
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Handle to the SQLite prediction ledger
#[derive(Clone)]
pub struct Ledger {
    pool: SqlitePool,
}

impl Ledger {
    /// Open the database and create tables if they don't exist yet.
    /// Table creation is idempotent; there are no migrations.
    pub async fn connect(database_url: &str) -> LedgerResult<Self> {
        // SQLite serializes writers anyway; a single connection also keeps
        // in-memory databases coherent across calls
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS predictions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                home_team TEXT NOT NULL,
                away_team TEXT NOT NULL,
                market TEXT NOT NULL,
                predicted_outcome TEXT NOT NULL,
                confidence REAL NOT NULL,
                result TEXT NOT NULL DEFAULT 'pending'
            )",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS model_accuracy (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                metric_name TEXT NOT NULL,
                value REAL NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    /// Append one prediction row. Identity and timestamp are assigned
    /// here; `result` always starts Pending. Returns the new id.
    pub async fn append(
        &self,
        home_team: &str,
        away_team: &str,
        market: Market,
        predicted_outcome: &str,
        confidence: f64,
    ) -> LedgerResult<i64> {
        let timestamp = Utc::now().to_rfc3339();
        let done = sqlx::query(
            "INSERT INTO predictions
                (timestamp, home_team, away_team, market, predicted_outcome, confidence, result)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&timestamp)
        .bind(home_team)
        .bind(away_team)
        .bind(market.as_str())
        .bind(predicted_outcome)
        .bind(confidence)
        .bind(PredictionResult::Pending.as_str())
        .execute(&self.pool)
        .await?;

        Ok(done.last_insert_rowid())
    }

    /// All predictions, most recent first
    pub async fn list(&self) -> LedgerResult<Vec<PredictionRecord>> {
        let rows = sqlx::query("SELECT * FROM predictions ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_prediction).collect())
    }

    /// Predictions still awaiting an outcome, oldest first
    pub async fn pending(&self) -> LedgerResult<Vec<PredictionRecord>> {
        let rows = sqlx::query("SELECT * FROM predictions WHERE result = 'pending' ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_prediction).collect())
    }

    /// Overwrite the result label on one row. Idempotent, and by design
    /// does not check the previous state - re-labeling an already-labeled
    /// row is allowed.
    pub async fn set_result(&self, id: i64, result: PredictionResult) -> LedgerResult<()> {
        let done = sqlx::query("UPDATE predictions SET result = ? WHERE id = ?")
            .bind(result.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if done.rows_affected() == 0 {
            return Err(LedgerError::NotFound { id });
        }
        Ok(())
    }

    /// Per-market success rate over all resolved (non-Pending) rows,
    /// computed on read. Markets with no resolved rows report 0.0.
    pub async fn success_rates(&self) -> LedgerResult<HashMap<Market, MarketSummary>> {
        let rows = sqlx::query(
            "SELECT market,
                    COUNT(*) AS total,
                    SUM(result = 'success') AS successes
             FROM predictions
             WHERE result != 'pending'
             GROUP BY market",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut summary: HashMap<Market, MarketSummary> = Market::ALL
            .iter()
            .map(|m| (*m, MarketSummary::default()))
            .collect();

        for row in &rows {
            let market: String = row.get("market");
            let Some(market) = Market::parse(&market) else {
                continue;
            };
            let total: i64 = row.get("total");
            let successes: i64 = row.get("successes");
            let rate = if total > 0 {
                successes as f64 / total as f64
            } else {
                0.0
            };
            summary.insert(
                market,
                MarketSummary {
                    total: total as u64,
                    successes: successes as u64,
                    rate,
                },
            );
        }

        Ok(summary)
    }

    /// Log one accuracy measurement for a training run
    pub async fn log_accuracy(&self, metric_name: &str, value: f64) -> LedgerResult<AccuracyRecord> {
        let timestamp = Utc::now().to_rfc3339();
        let done = sqlx::query(
            "INSERT INTO model_accuracy (timestamp, metric_name, value) VALUES (?, ?, ?)",
        )
        .bind(&timestamp)
        .bind(metric_name)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(AccuracyRecord {
            id: done.last_insert_rowid(),
            timestamp,
            metric_name: metric_name.to_string(),
            value,
        })
    }

    /// Accuracy history ordered by creation time (oldest first)
    pub async fn accuracy_history(&self) -> LedgerResult<Vec<AccuracyRecord>> {
        let rows = sqlx::query("SELECT * FROM model_accuracy ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| AccuracyRecord {
                id: row.get("id"),
                timestamp: row.get("timestamp"),
                metric_name: row.get("metric_name"),
                value: row.get("value"),
            })
            .collect())
    }
}

fn row_to_prediction(row: &sqlx::sqlite::SqliteRow) -> PredictionRecord {
    let market: String = row.get("market");
    let result: String = row.get("result");
    PredictionRecord {
        id: row.get("id"),
        timestamp: row.get("timestamp"),
        home_team: row.get("home_team"),
        away_team: row.get("away_team"),
        // Rows are only written through append(), so these always parse;
        // stay lenient anyway rather than panicking on a hand-edited db
        market: Market::parse(&market).unwrap_or(Market::Moneyline),
        predicted_outcome: row.get("predicted_outcome"),
        confidence: row.get("confidence"),
        result: PredictionResult::parse(&result).unwrap_or(PredictionResult::Pending),
    }
}
