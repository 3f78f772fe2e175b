use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Match state. The stored value is only a hint; see `schedule::derive_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Live,
    Finished,
    #[default]
    #[serde(other)]
    Upcoming,
}

impl Status {
    /// Parse the bare status word kept in the `match-status:<id>` side record.
    pub fn from_word(word: &str) -> Option<Self> {
        match word.trim() {
            "live" => Some(Status::Live),
            "upcoming" => Some(Status::Upcoming),
            "finished" => Some(Status::Finished),
            _ => None,
        }
    }

    pub fn as_word(&self) -> &'static str {
        match self {
            Status::Live => "live",
            Status::Upcoming => "upcoming",
            Status::Finished => "finished",
        }
    }
}

/// The two hosted player providers a channel slug can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerServer {
    Panda,
    Starz,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

/// A scheduled or in-progress match, in the camelCase shape shared by the
/// document store and local storage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub league: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    /// Local kickoff `HH:MM`, still carrying the source's timezone skew.
    #[serde(default)]
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_top_match: Option<bool>,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,

    #[serde(default)]
    pub stream_url: String,
    /// Extra stream links merged in from the `match-streams:<id>` side record.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub backup_streams: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_iframe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_server: Option<PlayerServer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tv_channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stadium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpa_link: Option<String>,
}

impl Fixture {
    pub fn is_top_match(&self) -> bool {
        self.is_top_match.unwrap_or(false)
    }
}

/// Admin forms store an empty string when no date was picked; treat that
/// (and anything else unparsable) as "no date".
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_admin_record() {
        let json = serde_json::json!({
            "id": "Al Nassr-Al Hilal-2025-03-01-21:00",
            "homeTeam": "Al Nassr",
            "awayTeam": "Al Hilal",
            "league": "دوري روشن السعودي",
            "date": "2025-03-01",
            "time": "21:00",
            "status": "upcoming",
            "streamUrl": "",
            "channelSlug": "bein-3",
            "playerServer": "panda",
            "isTopMatch": true
        });
        let f: Fixture = serde_json::from_value(json).unwrap();
        assert_eq!(f.date, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(f.player_server, Some(PlayerServer::Panda));
        assert!(f.is_top_match());
        assert_eq!(f.score, None);
    }

    #[test]
    fn unknown_status_and_blank_date_fall_back() {
        let json = serde_json::json!({
            "id": "x",
            "homeTeam": "A",
            "awayTeam": "B",
            "date": "",
            "status": "postponed"
        });
        let f: Fixture = serde_json::from_value(json).unwrap();
        assert_eq!(f.status, Status::Upcoming);
        assert_eq!(f.date, None);
        assert!(!f.is_top_match());
    }

    #[test]
    fn status_serde_words() {
        assert_eq!(serde_json::to_value(Status::Finished).unwrap(), serde_json::json!("finished"));
        let parsed: Vec<Status> = serde_json::from_str(r#"["live", "finished", "upcoming", "halftime"]"#).unwrap();
        assert_eq!(parsed, vec![Status::Live, Status::Finished, Status::Upcoming, Status::Upcoming]);
    }

    #[test]
    fn status_words() {
        assert_eq!(Status::from_word(" live "), Some(Status::Live));
        assert_eq!(Status::from_word("done"), None);
        assert_eq!(Status::Finished.as_word(), "finished");
    }
}
