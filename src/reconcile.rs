//! Labels pending predictions Success/Fail once their game goes Final.
//!
//! Safe to re-invoke at any time: only Pending rows are ever touched, so
//! overlapping or repeated runs cannot double-apply an outcome.

use std::collections::HashMap;

use anyhow::Result;
use tracing::{info, warn};

use crate::ledger::Ledger;
use crate::models::{GameStatus, PredictionResult};
use crate::providers::fallback::FallbackChain;

pub struct ReconcileJob {
    score_chain: FallbackChain,
    ledger: Ledger,
}

impl ReconcileJob {
    pub fn new(score_chain: FallbackChain, ledger: Ledger) -> Self {
        Self {
            score_chain,
            ledger,
        }
    }

    /// Fetch final scores, match them against pending predictions by
    /// team pair, and label each as success or fail. Returns the number
    /// of rows updated.
    pub async fn reconcile(&self) -> Result<u64> {
        let games = self.score_chain.resolve().await;

        // Only Final games with both scores settle anything
        let finals: HashMap<(String, String), (i64, i64)> = games
            .into_iter()
            .filter(|g| g.status == GameStatus::Final)
            .filter_map(|g| {
                let (hs, aws) = (g.home_score?, g.away_score?);
                Some(((g.home_team, g.away_team), (hs, aws)))
            })
            .collect();

        if finals.is_empty() {
            info!("no final games available, nothing to reconcile");
            return Ok(0);
        }

        let pending = self.ledger.pending().await?;
        let mut updated = 0u64;

        for prediction in pending {
            let key = (prediction.home_team.clone(), prediction.away_team.clone());
            let Some(&(home_score, away_score)) = finals.get(&key) else {
                // Game still in progress, or team naming drifted between
                // providers - leave the row pending
                continue;
            };

            let winner = if home_score > away_score { "Home" } else { "Away" };
            let result = if outcome_matches(&prediction.predicted_outcome, winner) {
                PredictionResult::Success
            } else {
                PredictionResult::Fail
            };

            if let Err(e) = self.ledger.set_result(prediction.id, result).await {
                warn!("failed to label prediction {}: {:#}", prediction.id, e);
                continue;
            }
            updated += 1;
        }

        info!(updated, "reconcile run complete");
        Ok(updated)
    }
}

/// Matching rule between a predicted outcome and the actual winner.
///
/// Exact label match, with one quirk carried over from the current
/// scoring: Cover and Over are treated as equivalent to a Home win. That
/// is a placeholder heuristic, not a market-aware rule - do not
/// generalize it.
pub fn outcome_matches(predicted: &str, winner: &str) -> bool {
    let predicted = predicted.to_lowercase();
    let winner_lower = winner.to_lowercase();
    predicted == winner_lower
        || ((predicted == "cover" || predicted == "over") && winner_lower == "home")
}
