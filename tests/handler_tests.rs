use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Asia::Riyadh;

use match_board_lambda_rust::board::DayTab;
use match_board_lambda_rust::config::Config;
use match_board_lambda_rust::handler::{AdminAction, Request, process};
use match_board_lambda_rust::league::LeagueFilter;
use match_board_lambda_rust::store::FIXTURES_KEY;

fn now() -> DateTime<Utc> {
    Riyadh.with_ymd_and_hms(2025, 3, 1, 15, 0, 0).unwrap().with_timezone(&Utc)
}

#[test]
fn request_defaults() {
    let req: Request = serde_json::from_value(serde_json::json!({})).unwrap();
    assert_eq!(req.day, DayTab::Today);
    assert_eq!(req.league, LeagueFilter::All);
    assert!(req.fixtures.is_empty());
    assert!(req.storage.is_none());
    assert!(req.actions.is_empty());
}

#[test]
fn serde_day_and_actions() {
    let req: Request = serde_json::from_value(serde_json::json!({
        "day": "tomorrow",
        "league": "ucl",
        "actions": [
            { "type": "delete", "id": "a" },
            { "type": "set_top_match", "id": "b" },
            { "type": "upsert", "draft": { "homeTeam": "A", "awayTeam": "B", "league": "L", "time": "20:00" } }
        ]
    }))
    .unwrap();
    assert_eq!(req.day, DayTab::Tomorrow);
    assert_eq!(req.league, LeagueFilter::ChampionsLeague);
    assert!(matches!(req.actions[0], AdminAction::Delete { ref id } if id == "a"));
    assert!(matches!(req.actions[1], AdminAction::SetTopMatch { ref id } if id == "b"));
    assert!(matches!(req.actions[2], AdminAction::Upsert { editing: None, .. }));
}

#[test]
fn builds_board_from_inline_fixtures() {
    let req: Request = serde_json::from_value(serde_json::json!({
        "fixtures": [
            { "id": "hilal", "homeTeam": "Al Hilal", "awayTeam": "Al Taawon", "league": "Saudi Pro League", "time": "21:00" },
            { "id": "city", "homeTeam": "Manchester City", "awayTeam": "Brighton", "league": "Premier League", "time": "19:00" },
            { "id": "blank", "homeTeam": "X", "awayTeam": "Y", "league": "Premier League", "time": "" }
        ]
    }))
    .unwrap();
    let resp = process(req, &Config::default(), now());

    // Corrected kickoffs: city 16:00, hilal 18:00, both still ahead of 15:00.
    let ids: Vec<&str> = resp.board.entries.iter().map(|e| e.fixture.id.as_str()).collect();
    assert_eq!(ids, vec!["city", "hilal"]);
    assert_eq!(resp.board.featured.as_ref().map(|e| e.fixture.id.as_str()), Some("city"));
    assert!(resp.storage.is_none());
    assert!(resp.messages.is_empty());
}

#[test]
fn admin_actions_update_snapshot_and_board() {
    let req: Request = serde_json::from_value(serde_json::json!({
        "actions": [
            { "type": "upsert", "draft": {
                "homeTeam": "Al Nassr", "awayTeam": "Al Hilal", "league": "دوري روشن السعودي",
                "time": "21:00", "streams": ["https://cdn.example/a.m3u8"], "stadium": "KSU Stadium"
            } },
            { "type": "upsert", "draft": {
                "homeTeam": "Al Ahli", "awayTeam": "Al Fateh", "league": "دوري روشن السعودي", "time": "22:00"
            } },
            { "type": "set_top_match", "id": "Al Ahli-Al Fateh-2025-03-01-22:00" },
            { "type": "upsert", "draft": {
                "homeTeam": "A", "awayTeam": "B", "league": "L", "time": "20:00",
                "channelSlug": "sports-d1", "playerServer": "panda"
            } },
            { "type": "delete", "id": "missing" }
        ]
    }))
    .unwrap();
    let resp = process(req, &Config::default(), now());

    assert_eq!(resp.messages.len(), 5);
    assert!(resp.messages[3].starts_with("Action failed"), "messages were: {:?}", resp.messages);
    assert_eq!(resp.messages[4], "Nothing to delete for missing");

    let featured = resp.board.featured.expect("featured fixture");
    assert_eq!(featured.fixture.id, "Al Ahli-Al Fateh-2025-03-01-22:00");

    let nassr = resp
        .board
        .entries
        .iter()
        .find(|e| e.fixture.id == "Al Nassr-Al Hilal-2025-03-01-21:00")
        .expect("nassr listed");
    assert_eq!(nassr.fixture.stream_url, "https://cdn.example/a.m3u8");
    assert_eq!(nassr.fixture.stadium.as_deref(), Some("KSU Stadium"));

    let storage = resp.storage.expect("storage snapshot");
    assert!(storage.contains_key(FIXTURES_KEY));
    assert!(storage.contains_key("match-meta:Al Nassr-Al Hilal-2025-03-01-21:00"));
}

#[test]
fn storage_copy_wins_over_inline_duplicate() {
    let stored = serde_json::json!([
        { "id": "dup", "homeTeam": "Stored", "awayTeam": "Side", "league": "La Liga", "date": "2025-03-01", "time": "22:00" }
    ]);
    let req: Request = serde_json::from_value(serde_json::json!({
        "storage": { (FIXTURES_KEY): stored.to_string() },
        "fixtures": [ { "id": "dup", "homeTeam": "Inline", "awayTeam": "Side", "time": "22:00" } ]
    }))
    .unwrap();
    let resp = process(req, &Config::default(), now());
    assert_eq!(resp.board.entries.len(), 1);
    assert_eq!(resp.board.entries[0].fixture.home_team, "Stored");
    assert!(resp.storage.is_some());
}
