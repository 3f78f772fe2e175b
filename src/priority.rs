use crate::model::{Fixture, Status};

/// Base score per competition, first substring hit wins (case-insensitive).
const LEAGUE_TABLE: &[(&[&str], i32)] = &[
    (&["champions", "uefa"], 100),
    (&["laliga", "la liga"], 90),
    (&["premier"], 88),
    (&["serie a"], 84),
    (&["bundesliga"], 82),
    (&["saudi", "روشن"], 80),
];

pub const UNRANKED_LEAGUE: i32 = 60;

/// Clubs that lift a fixture when either side's name contains them.
const MARQUEE_CLUBS: &[(&str, i32)] = &[
    ("barcelona", 8),
    ("real madrid", 8),
    ("atletico", 6),
    ("manchester city", 6),
    ("al hilal", 4),
    ("al nassr", 4),
];

pub const LIVE_BONUS: i32 = 12;

/// Editorial pick: this matchup is always pushed to the top.
pub const SPECIAL_PAIRING: (&str, &str) = ("atletico", "barcelona");
pub const SPECIAL_PAIRING_BONUS: i32 = 25;

pub fn league_priority(league: &str) -> i32 {
    let league = league.to_lowercase();
    LEAGUE_TABLE
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| league.contains(n)))
        .map(|(_, score)| *score)
        .unwrap_or(UNRANKED_LEAGUE)
}

/// True when one side is each half of the special pairing, in either order.
pub fn is_special_pairing(fixture: &Fixture) -> bool {
    let home = fixture.home_team.to_lowercase();
    let away = fixture.away_team.to_lowercase();
    let (a, b) = SPECIAL_PAIRING;
    let has = |needle: &str| home.contains(needle) || away.contains(needle);
    has(a) && has(b)
}

/// Ordering score using the fixture's stored status.
pub fn compute_priority(fixture: &Fixture) -> i32 {
    priority_with_status(fixture, fixture.status)
}

/// Ordering score with the live bonus decided by `status` instead of the
/// stored value, so callers can score against a derived status.
pub fn priority_with_status(fixture: &Fixture, status: Status) -> i32 {
    let home = fixture.home_team.to_lowercase();
    let away = fixture.away_team.to_lowercase();

    let mut score = league_priority(&fixture.league);
    for (club, bonus) in MARQUEE_CLUBS {
        if home.contains(club) || away.contains(club) {
            score += bonus;
        }
    }
    if status == Status::Live {
        score += LIVE_BONUS;
    }
    if is_special_pairing(fixture) {
        score += SPECIAL_PAIRING_BONUS;
    }
    score
}
