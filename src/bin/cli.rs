use anyhow::Result;
use clap::{Parser, Subcommand};
use nba_prediction_api::providers::odds_api::OddsApiClient;
use nba_prediction_api::{
    odds_chain, score_chain, Config, Ledger, Market, PredictionResult, ReconcileJob,
};

#[derive(Parser)]
#[command(name = "nba-prediction-cli", about = "NBA prediction pipeline from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch current games and odds through the fallback chain
    Quote,
    /// Fetch current scores through the score-capable providers
    Scores,
    /// Run the reconcile job once and report how many rows were updated
    Reconcile,
    /// Print the prediction ledger, most recent first
    History,
    /// Print per-market success rates
    Rates,
    /// Check remaining Odds API request quota
    Usage,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Command::Quote => {
            let games = odds_chain(&config).resolve().await;
            if games.is_empty() {
                println!("No games available from any provider.");
                return Ok(());
            }
            println!("{} games:\n", games.len());
            for game in &games {
                let bookmaker = game
                    .odds
                    .as_ref()
                    .map(|q| q.bookmaker.as_str())
                    .unwrap_or("no odds");
                let time = game
                    .start_time
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "TBD".to_string());
                println!(
                    "{} @ {} | {} | {}",
                    game.away_team, game.home_team, time, bookmaker
                );
            }
        }
        Command::Scores => {
            let games = score_chain(&config).resolve().await;
            if games.is_empty() {
                println!("No games available from any provider.");
                return Ok(());
            }
            for game in &games {
                println!(
                    "{} @ {} | {:?} | {} - {}",
                    game.away_team,
                    game.home_team,
                    game.status,
                    game.away_score.map_or("-".to_string(), |s| s.to_string()),
                    game.home_score.map_or("-".to_string(), |s| s.to_string()),
                );
            }
        }
        Command::Reconcile => {
            let ledger = Ledger::connect(&config.database_url).await?;
            let job = ReconcileJob::new(score_chain(&config), ledger);
            let updated = job.reconcile().await?;
            println!("Reconcile complete: {} predictions updated", updated);
        }
        Command::History => {
            let ledger = Ledger::connect(&config.database_url).await?;
            let rows = ledger.list().await?;
            if rows.is_empty() {
                println!("No predictions recorded yet.");
                return Ok(());
            }
            for row in &rows {
                println!(
                    "#{} {} | {} @ {} | {} -> {} ({:.1}%) | {}",
                    row.id,
                    row.timestamp,
                    row.away_team,
                    row.home_team,
                    row.market.as_str(),
                    row.predicted_outcome,
                    row.confidence,
                    row.result.as_str(),
                );
            }
        }
        Command::Rates => {
            let ledger = Ledger::connect(&config.database_url).await?;
            let summary = ledger.success_rates().await?;
            for market in Market::ALL {
                let s = summary
                    .get(&market)
                    .copied()
                    .unwrap_or_default();
                println!(
                    "{:<10} {}/{} resolved as {} ({:.1}%)",
                    market.as_str(),
                    s.successes,
                    s.total,
                    PredictionResult::Success.as_str(),
                    s.rate * 100.0,
                );
            }
        }
        Command::Usage => {
            let client = OddsApiClient::new(config.odds_api_key.clone(), config.http_timeout);
            client.check_usage().await?;
        }
    }

    Ok(())
}
