pub mod config;
pub mod ledger;
pub mod model;
pub mod models;
pub mod normalize;
pub mod providers;
pub mod reconcile;

pub use config::Config;
pub use ledger::{Ledger, LedgerError};
pub use model::{ModelError, ScoringModel};
pub use models::*;
pub use providers::{odds_chain, score_chain, GameProvider};
pub use reconcile::ReconcileJob;
