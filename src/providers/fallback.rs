use std::sync::Arc;

use tracing::{info, warn};

use crate::models::Game;
use crate::providers::GameProvider;

/// Tries providers strictly in priority order until one yields a
/// non-empty successful result.
///
/// An empty-but-successful response triggers fallthrough exactly like a
/// failure does. Partial results are never aggregated across providers,
/// and nothing is cached between calls. An empty list from `resolve` is
/// a valid terminal state ("no games available"), not an error.
pub struct FallbackChain {
    providers: Vec<Arc<dyn GameProvider>>,
}

impl FallbackChain {
    pub fn new(providers: Vec<Arc<dyn GameProvider>>) -> Self {
        Self { providers }
    }

    pub async fn resolve(&self) -> Vec<Game> {
        for provider in &self.providers {
            match provider.fetch_games().await {
                Ok(games) if !games.is_empty() => {
                    info!(
                        provider = provider.name(),
                        games = games.len(),
                        "provider resolved"
                    );
                    return games;
                }
                Ok(_) => {
                    warn!(provider = provider.name(), "provider returned no games, trying next");
                }
                Err(e) => {
                    warn!(provider = provider.name(), "provider failed: {:#}, trying next", e);
                }
            }
        }

        warn!("all providers failed or returned empty");
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameStatus;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum StubBehavior {
        Games(usize),
        Empty,
        Fail,
    }

    struct StubProvider {
        name: &'static str,
        behavior: StubBehavior,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(name: &'static str, behavior: StubBehavior) -> Arc<Self> {
            Arc::new(Self {
                name,
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn dummy_game(n: usize) -> Game {
        Game {
            home_team: format!("Home {n}"),
            away_team: format!("Away {n}"),
            start_time: None,
            status: GameStatus::Scheduled,
            home_score: None,
            away_score: None,
            odds: None,
        }
    }

    #[async_trait]
    impl GameProvider for StubProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch_games(&self) -> Result<Vec<Game>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                StubBehavior::Games(n) => Ok((0..n).map(dummy_game).collect()),
                StubBehavior::Empty => Ok(Vec::new()),
                StubBehavior::Fail => anyhow::bail!("upstream unavailable"),
            }
        }
    }

    #[tokio::test]
    async fn test_first_nonempty_provider_wins() {
        let first = StubProvider::new("first", StubBehavior::Games(2));
        let second = StubProvider::new("second", StubBehavior::Games(5));
        let chain = FallbackChain::new(vec![first.clone(), second.clone()]);

        let games = chain.resolve().await;
        assert_eq!(games.len(), 2);
        assert_eq!(first.call_count(), 1);
        // Later providers must never be touched once one succeeds
        assert_eq!(second.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_success_falls_through_like_failure() {
        let empty = StubProvider::new("empty", StubBehavior::Empty);
        let failing = StubProvider::new("failing", StubBehavior::Fail);
        let last = StubProvider::new("last", StubBehavior::Games(1));
        let chain = FallbackChain::new(vec![empty.clone(), failing.clone(), last.clone()]);

        let games = chain.resolve().await;
        assert_eq!(games.len(), 1);
        assert_eq!(empty.call_count(), 1);
        assert_eq!(failing.call_count(), 1);
        assert_eq!(last.call_count(), 1);
    }

    #[tokio::test]
    async fn test_all_failed_or_empty_resolves_to_empty_list() {
        let failing = StubProvider::new("failing", StubBehavior::Fail);
        let empty = StubProvider::new("empty", StubBehavior::Empty);
        let chain = FallbackChain::new(vec![failing.clone(), empty.clone()]);

        // Valid terminal state, not an error
        let games = chain.resolve().await;
        assert!(games.is_empty());
    }

    #[tokio::test]
    async fn test_no_caching_between_calls() {
        let provider = StubProvider::new("only", StubBehavior::Games(1));
        let chain = FallbackChain::new(vec![provider.clone()]);

        chain.resolve().await;
        chain.resolve().await;
        assert_eq!(provider.call_count(), 2);
    }
}
