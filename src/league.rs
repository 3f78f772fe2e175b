use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::model::Fixture;

/// League tabs on the fixtures page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LeagueFilter {
    #[default]
    All,
    Saudi,
    ChampionsLeague,
    PremierLeague,
    LaLiga,
    SerieA,
    Bundesliga,
    /// A token this build does not know. Matches everything.
    Unknown(String),
}

impl LeagueFilter {
    pub fn token(&self) -> &str {
        match self {
            LeagueFilter::All => "all",
            LeagueFilter::Saudi => "saudi",
            LeagueFilter::ChampionsLeague => "ucl",
            LeagueFilter::PremierLeague => "epl",
            LeagueFilter::LaLiga => "laliga",
            LeagueFilter::SerieA => "seriea",
            LeagueFilter::Bundesliga => "bundesliga",
            LeagueFilter::Unknown(token) => token,
        }
    }

    /// Lowercase substrings any one of which puts a league in this tab.
    fn needles(&self) -> Option<&'static [&'static str]> {
        match self {
            LeagueFilter::Saudi => Some(&["saudi", "روشن"]),
            LeagueFilter::ChampionsLeague => Some(&["champions", "uefa"]),
            LeagueFilter::PremierLeague => Some(&["premier"]),
            LeagueFilter::LaLiga => Some(&["laliga", "la liga"]),
            LeagueFilter::SerieA => Some(&["serie a"]),
            LeagueFilter::Bundesliga => Some(&["bundesliga"]),
            LeagueFilter::All | LeagueFilter::Unknown(_) => None,
        }
    }

    pub fn matches(&self, fixture: &Fixture) -> bool {
        let Some(needles) = self.needles() else {
            if let LeagueFilter::Unknown(token) = self {
                debug!(token = %token, "unknown league token, not filtering");
            }
            return true;
        };
        let league = fixture.league.to_lowercase();
        needles.iter().any(|n| league.contains(n))
    }
}

impl FromStr for LeagueFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "all" | "" => LeagueFilter::All,
            "saudi" => LeagueFilter::Saudi,
            "ucl" => LeagueFilter::ChampionsLeague,
            "epl" => LeagueFilter::PremierLeague,
            "laliga" => LeagueFilter::LaLiga,
            "seriea" => LeagueFilter::SerieA,
            "bundesliga" => LeagueFilter::Bundesliga,
            other => LeagueFilter::Unknown(other.to_string()),
        })
    }
}

impl fmt::Display for LeagueFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl Serialize for LeagueFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for LeagueFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        let Ok(filter) = token.parse();
        Ok(filter)
    }
}

/// Token form of [`LeagueFilter::matches`].
pub fn matches_league_filter(fixture: &Fixture, token: &str) -> bool {
    let Ok(filter) = token.parse::<LeagueFilter>();
    filter.matches(fixture)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_league(league: &str) -> Fixture {
        Fixture { id: league.into(), league: league.into(), ..Default::default() }
    }

    #[test]
    fn all_matches_everything() {
        assert!(matches_league_filter(&in_league(""), "all"));
        assert!(matches_league_filter(&in_league("Eredivisie"), "all"));
    }

    #[test]
    fn tokens_match_by_substring() {
        assert!(matches_league_filter(&in_league("UEFA Champions League"), "ucl"));
        assert!(matches_league_filter(&in_league("دوري روشن السعودي"), "saudi"));
        assert!(matches_league_filter(&in_league("Saudi Pro League"), "saudi"));
        assert!(matches_league_filter(&in_league("La Liga"), "laliga"));
        assert!(matches_league_filter(&in_league("LALIGA"), "laliga"));
        assert!(matches_league_filter(&in_league("Serie A"), "seriea"));
        assert!(!matches_league_filter(&in_league("Serie B"), "seriea"));
        assert!(!matches_league_filter(&in_league("Bundesliga"), "epl"));
    }

    #[test]
    fn unknown_token_fails_open() {
        let filter: LeagueFilter = "ligue1".parse().unwrap();
        assert_eq!(filter, LeagueFilter::Unknown("ligue1".into()));
        assert!(filter.matches(&in_league("Bundesliga")));
    }

    #[test]
    fn serde_uses_tokens() {
        let f: LeagueFilter = serde_json::from_str("\"epl\"").unwrap();
        assert_eq!(f, LeagueFilter::PremierLeague);
        assert_eq!(serde_json::to_string(&LeagueFilter::SerieA).unwrap(), "\"seriea\"");
    }
}
