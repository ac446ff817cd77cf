use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use nba_prediction_api::providers::fallback::FallbackChain;
use nba_prediction_api::{
    odds_chain, score_chain, Config, Game, Ledger, LedgerError, MarketSummary, ModelError,
    PredictionRecord, PredictionResult, ReconcileJob, ScoringModel,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

#[derive(Clone)]
struct AppState {
    ledger: Ledger,
    model: Arc<ScoringModel>,
    odds: Arc<FallbackChain>,
    reconcile_job: Arc<ReconcileJob>,
    /// Single-slot gate so overlapping reconcile triggers don't produce
    /// duplicate upstream fetch traffic
    reconcile_gate: Arc<Mutex<()>>,
}

type ApiError = (StatusCode, Json<Value>);

fn internal_error<E: std::fmt::Display>(e: E) -> ApiError {
    error!("request failed: {:#}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal server error" })),
    )
}

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteGame {
    home_team: String,
    away_team: String,
    logos: Logos,
    bookmaker: Option<String>,
    markets: QuoteMarkets,
    game_time: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct Logos {
    home: String,
    away: String,
}

#[derive(Serialize)]
struct QuoteMarkets {
    moneyline: MoneylineQuote,
    spread: Vec<nba_prediction_api::OddsOutcome>,
    total: Vec<nba_prediction_api::OddsOutcome>,
}

#[derive(Serialize)]
struct MoneylineQuote {
    home: Option<i32>,
    away: Option<i32>,
}

#[derive(Serialize)]
struct QuoteResponse {
    timestamp: DateTime<Utc>,
    games: Vec<QuoteGame>,
}

fn quote_game(game: Game) -> QuoteGame {
    use nba_prediction_api::normalize::teams;

    let logos = Logos {
        home: teams::logo_url(&game.home_team),
        away: teams::logo_url(&game.away_team),
    };

    let (bookmaker, markets) = match game.odds {
        Some(quote) => (
            Some(quote.bookmaker),
            QuoteMarkets {
                moneyline: MoneylineQuote {
                    home: quote.moneyline.home,
                    away: quote.moneyline.away,
                },
                spread: quote.spread,
                total: quote.total,
            },
        ),
        None => (
            None,
            QuoteMarkets {
                moneyline: MoneylineQuote {
                    home: None,
                    away: None,
                },
                spread: Vec::new(),
                total: Vec::new(),
            },
        ),
    };

    QuoteGame {
        home_team: game.home_team,
        away_team: game.away_team,
        logos,
        bookmaker,
        markets,
        game_time: game.start_time,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn root() -> Json<Value> {
    Json(json!({ "message": "NBA AI Backend Running" }))
}

/// Current games with first-bookmaker odds, via the fallback chain
async fn quotes(State(state): State<AppState>) -> Json<QuoteResponse> {
    let games = state.odds.resolve().await;
    Json(QuoteResponse {
        timestamp: Utc::now(),
        games: games.into_iter().map(quote_game).collect(),
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameRef {
    home_team: String,
    away_team: String,
}

#[derive(Serialize)]
struct ScoredMarket {
    prediction: String,
    confidence: f64,
}

/// Score one game across all three markets and append a ledger row per
/// market
async fn run_model(
    State(state): State<AppState>,
    Json(game): Json<GameRef>,
) -> Result<Json<Value>, ApiError> {
    let scored = match state.model.score(&game.home_team, &game.away_team) {
        Ok(scored) => scored,
        Err(ModelError::Unavailable) => {
            return Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "Model not loaded." })),
            ));
        }
    };

    let mut predictions = serde_json::Map::new();
    for p in scored {
        state
            .ledger
            .append(
                &game.home_team,
                &game.away_team,
                p.market,
                &p.outcome,
                p.confidence,
            )
            .await
            .map_err(internal_error)?;

        predictions.insert(
            p.market.as_str().to_string(),
            serde_json::to_value(ScoredMarket {
                prediction: p.outcome,
                confidence: p.confidence,
            })
            .map_err(internal_error)?,
        );
    }

    Ok(Json(json!({ "predictions": predictions })))
}

async fn history(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let rows: Vec<PredictionRecord> = state.ledger.list().await.map_err(internal_error)?;
    Ok(Json(json!({ "history": rows })))
}

#[derive(Deserialize)]
struct ResultUpdate {
    result: String,
}

async fn update_result(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<ResultUpdate>,
) -> Result<Json<Value>, ApiError> {
    let Some(result) = PredictionResult::parse(&update.result) else {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": format!("unknown result label: {}", update.result) })),
        ));
    };

    match state.ledger.set_result(id, result).await {
        Ok(()) => Ok(Json(
            json!({ "status": "ok", "id": id, "result": result.as_str() }),
        )),
        Err(LedgerError::NotFound { id }) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("prediction {id} not found") })),
        )),
        Err(e) => Err(internal_error(e)),
    }
}

async fn success_rates(
    State(state): State<AppState>,
) -> Result<Json<std::collections::HashMap<nba_prediction_api::Market, MarketSummary>>, ApiError> {
    let summary = state.ledger.success_rates().await.map_err(internal_error)?;
    Ok(Json(summary))
}

/// Fire-and-forget reconcile trigger. Acknowledges immediately; the job
/// itself runs in the background with at-most-one-in-flight semantics.
async fn auto_update(State(state): State<AppState>) -> Json<Value> {
    match state.reconcile_gate.clone().try_lock_owned() {
        Ok(permit) => {
            let job = state.reconcile_job.clone();
            tokio::spawn(async move {
                let _permit = permit;
                match job.reconcile().await {
                    Ok(updated) => info!(updated, "background result update complete"),
                    Err(e) => error!("background result update failed: {:#}", e),
                }
            });
            Json(json!({ "message": "Background result update started." }))
        }
        Err(_) => Json(json!({ "message": "Result update already running." })),
    }
}

/// Simulated training run: logs a synthetic accuracy measurement
async fn train(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let accuracy = nba_prediction_api::model::simulate_training_accuracy();
    let record = state
        .ledger
        .log_accuracy("overall_accuracy", accuracy)
        .await
        .map_err(internal_error)?;

    Ok(Json(json!({
        "message": "Model retrained successfully!",
        "timestamp": record.timestamp,
        "accuracy": accuracy,
    })))
}

/// Accuracy history for the frontend chart, oldest first
async fn accuracy_history(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let records = state
        .ledger
        .accuracy_history()
        .await
        .map_err(internal_error)?;

    let points: Vec<Value> = records
        .iter()
        .map(|r| json!({ "date": r.timestamp, "accuracy": r.value }))
        .collect();

    Ok(Json(json!(points)))
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();

    let ledger = Ledger::connect(&config.database_url).await?;
    let model = Arc::new(ScoringModel::load(&config.model_path));
    match model.path() {
        Some(path) => println!("Scoring model loaded from {}", path),
        None => println!("No scoring model found - /predict/model will report it as unavailable"),
    }

    let state = AppState {
        ledger: ledger.clone(),
        model,
        odds: Arc::new(odds_chain(&config)),
        reconcile_job: Arc::new(ReconcileJob::new(score_chain(&config), ledger)),
        reconcile_gate: Arc::new(Mutex::new(())),
    };

    // Allow the frontend to talk to us from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/predict/", get(quotes))
        .route("/predict/model", post(run_model))
        .route("/predict/history", get(history))
        .route("/predict/update_result/:id", post(update_result))
        .route("/predict/success_rates", get(success_rates))
        .route("/predict/auto_update", post(auto_update))
        .route("/train/", post(train))
        .route("/analytics/accuracy", get(accuracy_history))
        .layer(cors)
        .with_state(state);

    println!("Starting web server at http://{}", config.bind_addr);
    println!("Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
