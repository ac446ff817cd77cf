//! Fixed lookup between canonical full team names and short codes.
//!
//! The odds provider speaks full names ("Boston Celtics") while the NBA
//! feeds speak tricodes ("BOS"). Everything downstream of normalization
//! uses the full name; the short code only feeds logo/display lookup.

const LOGO_BASE_URL: &str = "https://a.espncdn.com/i/teamlogos/nba/500";

/// (canonical full name, short code) for all 30 teams
const TEAMS: &[(&str, &str)] = &[
    ("Atlanta Hawks", "atl"),
    ("Boston Celtics", "bos"),
    ("Brooklyn Nets", "bkn"),
    ("Charlotte Hornets", "cha"),
    ("Chicago Bulls", "chi"),
    ("Cleveland Cavaliers", "cle"),
    ("Dallas Mavericks", "dal"),
    ("Denver Nuggets", "den"),
    ("Detroit Pistons", "det"),
    ("Golden State Warriors", "gsw"),
    ("Houston Rockets", "hou"),
    ("Indiana Pacers", "ind"),
    ("Los Angeles Clippers", "lac"),
    ("Los Angeles Lakers", "lal"),
    ("Memphis Grizzlies", "mem"),
    ("Miami Heat", "mia"),
    ("Milwaukee Bucks", "mil"),
    ("Minnesota Timberwolves", "min"),
    ("New Orleans Pelicans", "nop"),
    ("New York Knicks", "nyk"),
    ("Oklahoma City Thunder", "okc"),
    ("Orlando Magic", "orl"),
    ("Philadelphia 76ers", "phi"),
    ("Phoenix Suns", "phx"),
    ("Portland Trail Blazers", "por"),
    ("Sacramento Kings", "sac"),
    ("San Antonio Spurs", "sas"),
    ("Toronto Raptors", "tor"),
    ("Utah Jazz", "uta"),
    ("Washington Wizards", "was"),
];

/// Short code for a canonical full team name
pub fn code_for(full_name: &str) -> Option<&'static str> {
    TEAMS
        .iter()
        .find(|(name, _)| *name == full_name)
        .map(|(_, code)| *code)
}

/// Canonical full name for a provider tricode (case-insensitive)
pub fn full_name_for(code: &str) -> Option<&'static str> {
    TEAMS
        .iter()
        .find(|(_, c)| c.eq_ignore_ascii_case(code))
        .map(|(name, _)| *name)
}

/// Canonicalize a provider team identifier: tricodes are mapped to full
/// names, anything unrecognized passes through untouched
pub fn canonical_name(raw: &str) -> String {
    full_name_for(raw)
        .map(str::to_string)
        .unwrap_or_else(|| raw.to_string())
}

/// Logo URL for a team, or an empty string when the team is unmapped
pub fn logo_url(full_name: &str) -> String {
    match code_for(full_name) {
        Some(code) => format!("{}/{}.png", LOGO_BASE_URL, code),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_lookup_round_trip() {
        assert_eq!(code_for("Boston Celtics"), Some("bos"));
        assert_eq!(full_name_for("BOS"), Some("Boston Celtics"));
        assert_eq!(full_name_for("bos"), Some("Boston Celtics"));
    }

    #[test]
    fn test_unmapped_team_yields_empty_logo() {
        assert_eq!(logo_url("Seattle SuperSonics"), "");
        assert!(logo_url("Phoenix Suns").ends_with("/phx.png"));
    }

    #[test]
    fn test_canonical_name_passes_through_unknown() {
        assert_eq!(canonical_name("UTA"), "Utah Jazz");
        assert_eq!(canonical_name("Seattle SuperSonics"), "Seattle SuperSonics");
    }
}
