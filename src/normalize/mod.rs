//! Pure normalization of provider payloads into canonical [`Game`] values.
//!
//! All upstream schema knowledge lives in this module: each provider client
//! deserializes its response into one of the raw shapes below and hands it
//! to [`normalize`]. Malformed records are skipped, never fatal - one bad
//! game must not take down the whole batch.

pub mod teams;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::models::{Game, GameStatus, MoneylinePrices, OddsOutcome, OddsQuote};

// ---------------------------------------------------------------------------
// Raw shapes: The Odds API
// ---------------------------------------------------------------------------

/// Response from The Odds API for a single game
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOddsEvent {
    pub home_team: String,
    pub away_team: String,
    pub commence_time: Option<DateTime<Utc>>,
    pub bookmakers: Vec<RawBookmaker>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBookmaker {
    pub title: String,
    pub markets: Vec<RawMarket>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMarket {
    pub key: String,
    pub outcomes: Vec<RawOutcome>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOutcome {
    pub name: String,
    pub price: Option<i32>,
    pub point: Option<f64>,
}

// ---------------------------------------------------------------------------
// Raw shapes: NBA live scoreboard feed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawScoreboard {
    pub scoreboard: RawScoreboardInner,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawScoreboardInner {
    pub games: Vec<RawScoreboardGame>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawScoreboardGame {
    /// 1 = scheduled, 2 = live, 3 = final
    pub game_status: Option<i64>,
    pub game_status_text: String,
    #[serde(rename = "gameTimeUTC")]
    pub game_time_utc: String,
    pub home_team: RawFeedTeam,
    pub away_team: RawFeedTeam,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawFeedTeam {
    pub team_tricode: String,
    pub score: Option<i64>,
}

// ---------------------------------------------------------------------------
// Raw shapes: public schedule mirror feed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSchedule {
    pub league_schedule: RawLeagueSchedule,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawLeagueSchedule {
    pub game_dates: Vec<RawGameDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawGameDate {
    pub games: Vec<RawScheduleGame>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawScheduleGame {
    pub game_status_text: String,
    #[serde(rename = "gameDateTimeUTC")]
    pub game_date_time_utc: String,
    pub home_team: RawFeedTeam,
    pub away_team: RawFeedTeam,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// One deserialized upstream response, tagged by provider shape
#[derive(Debug, Clone)]
pub enum ProviderPayload {
    OddsApi(Vec<RawOddsEvent>),
    Scoreboard(RawScoreboard),
    Schedule(RawSchedule),
}

/// Map a provider payload into canonical games. Pure - no I/O, and never
/// fails: malformed records are dropped with a warning.
pub fn normalize(payload: ProviderPayload) -> Vec<Game> {
    match payload {
        ProviderPayload::OddsApi(events) => normalize_odds_events(events),
        ProviderPayload::Scoreboard(board) => normalize_scoreboard(board),
        ProviderPayload::Schedule(schedule) => normalize_schedule(schedule),
    }
}

fn normalize_odds_events(events: Vec<RawOddsEvent>) -> Vec<Game> {
    events
        .into_iter()
        .filter_map(|event| {
            if event.home_team.is_empty() || event.away_team.is_empty() {
                warn!("skipping odds event with missing team names");
                return None;
            }

            let odds = extract_first_bookmaker(&event);

            Some(Game {
                home_team: event.home_team,
                away_team: event.away_team,
                start_time: event.commence_time,
                status: GameStatus::Scheduled,
                home_score: None,
                away_score: None,
                odds,
            })
        })
        .collect()
}

/// Pull moneyline/spread/total markets from the first bookmaker only.
/// Missing markets become empty lists / absent prices, not errors.
fn extract_first_bookmaker(event: &RawOddsEvent) -> Option<OddsQuote> {
    let bookmaker = event.bookmakers.first()?;

    let market = |key: &str| -> &[RawOutcome] {
        bookmaker
            .markets
            .iter()
            .find(|m| m.key == key)
            .map(|m| m.outcomes.as_slice())
            .unwrap_or(&[])
    };

    let h2h = market("h2h");
    let moneyline = MoneylinePrices {
        home: h2h
            .iter()
            .find(|o| o.name == event.home_team)
            .and_then(|o| o.price),
        away: h2h
            .iter()
            .find(|o| o.name == event.away_team)
            .and_then(|o| o.price),
    };

    let to_outcomes = |raw: &[RawOutcome]| -> Vec<OddsOutcome> {
        raw.iter()
            .map(|o| OddsOutcome {
                name: o.name.clone(),
                price: o.price,
                point: o.point,
            })
            .collect()
    };

    Some(OddsQuote {
        bookmaker: bookmaker.title.clone(),
        moneyline,
        spread: to_outcomes(market("spreads")),
        total: to_outcomes(market("totals")),
    })
}

fn normalize_scoreboard(board: RawScoreboard) -> Vec<Game> {
    board
        .scoreboard
        .games
        .into_iter()
        .filter_map(|game| {
            if game.home_team.team_tricode.is_empty() || game.away_team.team_tricode.is_empty() {
                warn!("skipping scoreboard game with missing tricodes");
                return None;
            }

            let status = match game.game_status {
                Some(2) => GameStatus::Live,
                Some(3) => GameStatus::Final,
                Some(1) => GameStatus::Scheduled,
                // Numeric code missing or unrecognized: fall back to the text
                _ => parse_status_text(&game.game_status_text),
            };

            Some(build_score_game(
                &game.home_team,
                &game.away_team,
                &game.game_time_utc,
                status,
            ))
        })
        .collect()
}

fn normalize_schedule(schedule: RawSchedule) -> Vec<Game> {
    schedule
        .league_schedule
        .game_dates
        .into_iter()
        .flat_map(|date| date.games)
        .filter_map(|game| {
            if game.home_team.team_tricode.is_empty() || game.away_team.team_tricode.is_empty() {
                warn!("skipping schedule game with missing tricodes");
                return None;
            }

            let status = parse_status_text(&game.game_status_text);
            Some(build_score_game(
                &game.home_team,
                &game.away_team,
                &game.game_date_time_utc,
                status,
            ))
        })
        .collect()
}

fn build_score_game(
    home: &RawFeedTeam,
    away: &RawFeedTeam,
    start_time: &str,
    status: GameStatus,
) -> Game {
    // Scores are only meaningful once the game has started; the feeds
    // report 0-0 for scheduled games
    let (home_score, away_score) = match status {
        GameStatus::Scheduled => (None, None),
        _ => (home.score, away.score),
    };

    Game {
        home_team: teams::canonical_name(&home.team_tricode),
        away_team: teams::canonical_name(&away.team_tricode),
        start_time: parse_utc(start_time),
        status,
        home_score,
        away_score,
        odds: None,
    }
}

/// Lenient status-text mapping; anything unrecognized is Scheduled
fn parse_status_text(text: &str) -> GameStatus {
    let t = text.trim().to_lowercase();
    if t.starts_with("final") {
        GameStatus::Final
    } else if t.starts_with('q') || t.contains("qtr") || t.contains("half") || t == "ot" {
        GameStatus::Live
    } else {
        GameStatus::Scheduled
    }
}

fn parse_utc(s: &str) -> Option<DateTime<Utc>> {
    s.parse::<DateTime<Utc>>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn odds_event(home: &str, away: &str, bookmakers: Vec<RawBookmaker>) -> RawOddsEvent {
        RawOddsEvent {
            home_team: home.to_string(),
            away_team: away.to_string(),
            commence_time: Some(Utc::now()),
            bookmakers,
        }
    }

    #[test]
    fn test_first_bookmaker_wins() {
        let first = RawBookmaker {
            title: "DraftKings".to_string(),
            markets: vec![RawMarket {
                key: "h2h".to_string(),
                outcomes: vec![
                    RawOutcome {
                        name: "Boston Celtics".to_string(),
                        price: Some(-150),
                        point: None,
                    },
                    RawOutcome {
                        name: "Miami Heat".to_string(),
                        price: Some(130),
                        point: None,
                    },
                ],
            }],
        };
        let second = RawBookmaker {
            title: "FanDuel".to_string(),
            markets: vec![],
        };

        let games = normalize(ProviderPayload::OddsApi(vec![odds_event(
            "Boston Celtics",
            "Miami Heat",
            vec![first, second],
        )]));

        assert_eq!(games.len(), 1);
        let quote = games[0].odds.as_ref().unwrap();
        assert_eq!(quote.bookmaker, "DraftKings");
        assert_eq!(quote.moneyline.home, Some(-150));
        assert_eq!(quote.moneyline.away, Some(130));
    }

    #[test]
    fn test_missing_markets_yield_empty_lists() {
        let bookmaker = RawBookmaker {
            title: "DraftKings".to_string(),
            markets: vec![], // no h2h, no spreads, no totals
        };
        let games = normalize(ProviderPayload::OddsApi(vec![odds_event(
            "Boston Celtics",
            "Miami Heat",
            vec![bookmaker],
        )]));

        let quote = games[0].odds.as_ref().unwrap();
        assert_eq!(quote.moneyline.home, None);
        assert!(quote.spread.is_empty());
        assert!(quote.total.is_empty());
    }

    #[test]
    fn test_no_bookmakers_yields_no_quote() {
        let games = normalize(ProviderPayload::OddsApi(vec![odds_event(
            "Boston Celtics",
            "Miami Heat",
            vec![],
        )]));
        assert!(games[0].odds.is_none());
    }

    #[test]
    fn test_malformed_event_is_skipped_not_fatal() {
        let good = odds_event("Boston Celtics", "Miami Heat", vec![]);
        let bad = RawOddsEvent::default(); // empty team names
        let games = normalize(ProviderPayload::OddsApi(vec![bad, good]));
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].home_team, "Boston Celtics");
    }

    fn scoreboard_game(status: Option<i64>, text: &str, hs: i64, aws: i64) -> RawScoreboardGame {
        RawScoreboardGame {
            game_status: status,
            game_status_text: text.to_string(),
            game_time_utc: "2025-11-05T00:30:00Z".to_string(),
            home_team: RawFeedTeam {
                team_tricode: "BOS".to_string(),
                score: Some(hs),
            },
            away_team: RawFeedTeam {
                team_tricode: "MIA".to_string(),
                score: Some(aws),
            },
        }
    }

    #[test]
    fn test_scoreboard_status_codes() {
        let board = RawScoreboard {
            scoreboard: RawScoreboardInner {
                games: vec![
                    scoreboard_game(Some(1), "7:30 pm ET", 0, 0),
                    scoreboard_game(Some(2), "Q3 4:12", 61, 58),
                    scoreboard_game(Some(3), "Final", 110, 101),
                ],
            },
        };
        let games = normalize(ProviderPayload::Scoreboard(board));

        assert_eq!(games[0].status, GameStatus::Scheduled);
        assert_eq!(games[0].home_score, None);
        assert_eq!(games[1].status, GameStatus::Live);
        assert_eq!(games[2].status, GameStatus::Final);
        assert_eq!(games[2].home_score, Some(110));
        assert_eq!(games[2].away_score, Some(101));
    }

    #[test]
    fn test_tricodes_are_canonicalized() {
        let board = RawScoreboard {
            scoreboard: RawScoreboardInner {
                games: vec![scoreboard_game(Some(3), "Final", 99, 98)],
            },
        };
        let games = normalize(ProviderPayload::Scoreboard(board));
        assert_eq!(games[0].home_team, "Boston Celtics");
        assert_eq!(games[0].away_team, "Miami Heat");
    }

    #[test]
    fn test_unknown_status_defaults_to_scheduled() {
        assert_eq!(parse_status_text("PPD"), GameStatus::Scheduled);
        assert_eq!(parse_status_text("7:30 pm ET"), GameStatus::Scheduled);
        assert_eq!(parse_status_text(""), GameStatus::Scheduled);
        assert_eq!(parse_status_text("Final/OT"), GameStatus::Final);
        assert_eq!(parse_status_text("Halftime"), GameStatus::Live);
    }

    #[test]
    fn test_schedule_feed_flattens_game_dates() {
        let schedule = RawSchedule {
            league_schedule: RawLeagueSchedule {
                game_dates: vec![
                    RawGameDate {
                        games: vec![RawScheduleGame {
                            game_status_text: "Final".to_string(),
                            game_date_time_utc: "2025-11-05T00:30:00Z".to_string(),
                            home_team: RawFeedTeam {
                                team_tricode: "GSW".to_string(),
                                score: Some(120),
                            },
                            away_team: RawFeedTeam {
                                team_tricode: "LAL".to_string(),
                                score: Some(112),
                            },
                        }],
                    },
                    RawGameDate { games: vec![] },
                ],
            },
        };
        let games = normalize(ProviderPayload::Schedule(schedule));
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].home_team, "Golden State Warriors");
        assert_eq!(games[0].status, GameStatus::Final);
    }
}
