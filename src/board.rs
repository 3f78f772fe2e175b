use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::league::LeagueFilter;
use crate::model::{Fixture, Status};
use crate::playback::{Playback, resolve_playback};
use crate::priority::{is_special_pairing, priority_with_status};
use crate::schedule::{BoardClock, compute_kickoff, derive_status};

/// Day tabs on the fixtures page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayTab {
    #[default]
    Today,
    Tomorrow,
}

impl DayTab {
    pub fn offset(&self) -> u32 {
        match self {
            DayTab::Today => 0,
            DayTab::Tomorrow => 1,
        }
    }
}

/// Everything the ordering needs about one fixture, computed once per run.
struct SortKey {
    live: bool,
    priority: i32,
    kickoff: Option<DateTime<Utc>>,
}

impl SortKey {
    fn of(fixture: &Fixture, day_offset: u32, clock: &BoardClock) -> Self {
        let status = derive_status(fixture, day_offset, clock);
        Self {
            live: status == Status::Live,
            priority: priority_with_status(fixture, status),
            kickoff: compute_kickoff(fixture, day_offset, clock),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        other
            .live
            .cmp(&self.live)
            .then_with(|| other.priority.cmp(&self.priority))
            .then_with(|| match (self.kickoff, other.kickoff) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    }
}

/// Indices of `fixtures` in board order. `sort_by` is stable, so equal keys
/// keep their input order.
fn ranked_indices(fixtures: &[Fixture], day_offset: u32, clock: &BoardClock) -> Vec<usize> {
    let keys: Vec<SortKey> = fixtures.iter().map(|f| SortKey::of(f, day_offset, clock)).collect();
    let mut order: Vec<usize> = (0..fixtures.len()).collect();
    order.sort_by(|&a, &b| keys[a].compare(&keys[b]));
    order
}

/// Live first, then priority descending, then kickoff ascending with
/// unscheduled fixtures last.
pub fn sort_fixtures(fixtures: &[Fixture], day_offset: u32, clock: &BoardClock) -> Vec<Fixture> {
    ranked_indices(fixtures, day_offset, clock)
        .into_iter()
        .map(|i| fixtures[i].clone())
        .collect()
}

/// Pick the fixture to headline the page.
///
/// 1. the fixture flagged as top match
/// 2. the special pairing
/// 3. the best-ranked fixture that is live or still to kick off
/// 4. the nearest future kickoff, ignoring priority
pub fn select_featured<'a>(fixtures: &'a [Fixture], day_offset: u32, clock: &BoardClock) -> Option<&'a Fixture> {
    if let Some(top) = fixtures.iter().find(|f| f.is_top_match()) {
        return Some(top);
    }
    if let Some(pairing) = fixtures.iter().find(|f| is_special_pairing(f)) {
        return Some(pairing);
    }

    // Unscheduled fixtures never headline, even when stored as live.
    let ranked = ranked_indices(fixtures, day_offset, clock)
        .into_iter()
        .map(|i| &fixtures[i])
        .find(|&f| {
            compute_kickoff(f, day_offset, clock)
                .is_some_and(|k| k > clock.now || derive_status(f, day_offset, clock) == Status::Live)
        });
    if ranked.is_some() {
        return ranked;
    }

    fixtures
        .iter()
        .filter_map(|f| {
            let kickoff = compute_kickoff(f, day_offset, clock)?;
            let until = kickoff - clock.now;
            (until > chrono::TimeDelta::zero()).then_some((f, until))
        })
        .min_by_key(|(_, until)| *until)
        .map(|(f, _)| f)
}

pub fn filter_fixtures(fixtures: &[Fixture], filter: &LeagueFilter) -> Vec<Fixture> {
    fixtures.iter().filter(|f| filter.matches(f)).cloned().collect()
}

/// Fixtures that belong on a day tab. Undated fixtures show under today.
pub fn fixtures_for_day(fixtures: &[Fixture], tab: DayTab, clock: &BoardClock) -> Vec<Fixture> {
    let target = clock.date_for_offset(tab.offset());
    fixtures
        .iter()
        .filter(|f| match (tab, f.date) {
            (DayTab::Today, None) => true,
            (_, Some(date)) => date == target,
            (DayTab::Tomorrow, None) => false,
        })
        .cloned()
        .collect()
}

/// A fixture earns a row once it has a kickoff, is live, or at least
/// carries some time text.
fn is_listable(fixture: &Fixture, day_offset: u32, clock: &BoardClock) -> bool {
    compute_kickoff(fixture, day_offset, clock).is_some()
        || fixture.status == Status::Live
        || !fixture.time.trim().is_empty()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// Time left until `target`, clamped at zero.
    pub fn until(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let total = (target - now).num_seconds().max(0);
        Self {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardEntry {
    /// The fixture with its status already derived.
    pub fixture: Fixture,
    pub priority: i32,
    pub kickoff: Option<DateTime<Utc>>,
    pub playback: Playback,
}

impl BoardEntry {
    fn new(fixture: Fixture, day_offset: u32, clock: &BoardClock) -> Self {
        let kickoff = compute_kickoff(&fixture, day_offset, clock);
        let priority = priority_with_status(&fixture, fixture.status);
        let playback = resolve_playback(&fixture);
        Self { fixture, priority, kickoff, playback }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub day: DayTab,
    pub league: LeagueFilter,
    pub entries: Vec<BoardEntry>,
    pub featured: Option<BoardEntry>,
    pub countdown: Option<Countdown>,
}

/// Full page computation: day partition, status derivation, ordering,
/// league filtering, then the featured pick from what is left.
#[instrument(level = "debug", skip(fixtures, clock), fields(total = fixtures.len()))]
pub fn build_board(fixtures: &[Fixture], day: DayTab, league: LeagueFilter, clock: &BoardClock) -> Board {
    let offset = day.offset();

    let adjusted: Vec<Fixture> = fixtures_for_day(fixtures, day, clock)
        .into_iter()
        .map(|mut f| {
            f.status = derive_status(&f, offset, clock);
            f
        })
        .collect();

    let listed: Vec<Fixture> = sort_fixtures(&adjusted, offset, clock)
        .into_iter()
        .filter(|f| league.matches(f) && is_listable(f, offset, clock))
        .collect();

    let featured = select_featured(&listed, offset, clock).map(|f| BoardEntry::new(f.clone(), offset, clock));
    let countdown = featured
        .as_ref()
        .and_then(|e| e.kickoff)
        .map(|k| Countdown::until(k, clock.now));

    debug!(listed = listed.len(), featured = ?featured.as_ref().map(|e| e.fixture.id.as_str()), "board built");

    let entries = listed.into_iter().map(|f| BoardEntry::new(f, offset, clock)).collect();
    Board { day, league, entries, featured, countdown }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta, TimeZone};
    use chrono_tz::Asia::Riyadh;

    fn clock() -> BoardClock {
        let now = Riyadh.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap().with_timezone(&Utc);
        BoardClock::new(now, Riyadh)
    }

    /// A fixture whose corrected kickoff is `from_now` away from the test clock.
    fn kicking_off(id: &str, from_now: TimeDelta, league: &str) -> Fixture {
        let local = (clock().now + from_now).with_timezone(&Riyadh) + TimeDelta::hours(3);
        Fixture {
            id: id.into(),
            home_team: format!("{id} home"),
            away_team: format!("{id} away"),
            league: league.into(),
            date: Some(local.date_naive()),
            time: local.format("%H:%M").to_string(),
            ..Default::default()
        }
    }

    fn ids(fixtures: &[Fixture]) -> Vec<&str> {
        fixtures.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn empty_input_is_fine() {
        let c = clock();
        assert!(sort_fixtures(&[], 0, &c).is_empty());
        assert!(select_featured(&[], 0, &c).is_none());
        assert!(filter_fixtures(&[], &LeagueFilter::All).is_empty());
        let board = build_board(&[], DayTab::Today, LeagueFilter::All, &c);
        assert!(board.entries.is_empty());
        assert!(board.featured.is_none());
        assert!(board.countdown.is_none());
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let c = clock();
        let a = Fixture { id: "a".into(), ..Default::default() };
        let b = Fixture { id: "b".into(), ..Default::default() };
        let d = Fixture { id: "d".into(), ..Default::default() };
        let sorted = sort_fixtures(&[b.clone(), a.clone(), d.clone()], 0, &c);
        assert_eq!(ids(&sorted), vec!["b", "a", "d"]);
    }

    #[test]
    fn unscheduled_sort_after_scheduled() {
        let c = clock();
        let none = Fixture { id: "none".into(), ..Default::default() };
        let late = kicking_off("late", TimeDelta::hours(5), "");
        let early = kicking_off("early", TimeDelta::hours(4), "");
        let sorted = sort_fixtures(&[none, late, early], 0, &c);
        assert_eq!(ids(&sorted), vec!["early", "late", "none"]);
    }

    #[test]
    fn featured_rule_three_prefers_priority() {
        let c = clock();
        let soon = kicking_off("soon", TimeDelta::minutes(10), "Eredivisie");
        let later = kicking_off("later", TimeDelta::hours(3), "Premier League");
        let fixtures = [soon, later];
        assert_eq!(select_featured(&fixtures, 0, &c).map(|f| f.id.as_str()), Some("later"));
    }

    #[test]
    fn unscheduled_live_fixture_is_not_featured() {
        let c = clock();
        let live_blank = Fixture { id: "live-blank".into(), status: Status::Live, ..Default::default() };
        let upcoming = kicking_off("upcoming", TimeDelta::hours(6), "Premier League");
        let fixtures = [live_blank, upcoming];
        assert_eq!(select_featured(&fixtures, 0, &c).map(|f| f.id.as_str()), Some("upcoming"));

        let board = build_board(&fixtures, DayTab::Today, LeagueFilter::All, &c);
        assert_eq!(board.featured.as_ref().map(|e| e.fixture.id.as_str()), Some("upcoming"));
        assert_eq!(board.countdown.map(|cd| cd.hours), Some(6));
    }

    #[test]
    fn nothing_left_to_feature() {
        let c = clock();
        let done = kicking_off("done", TimeDelta::hours(-4), "Premier League");
        assert!(select_featured(&[done], 0, &c).is_none());
    }

    #[test]
    fn day_partition() {
        let c = clock();
        let undated = Fixture { id: "undated".into(), ..Default::default() };
        let today = Fixture { id: "today".into(), date: NaiveDate::from_ymd_opt(2025, 3, 1), ..Default::default() };
        let tomorrow = Fixture { id: "tomorrow".into(), date: NaiveDate::from_ymd_opt(2025, 3, 2), ..Default::default() };
        let all = [undated, today, tomorrow];
        assert_eq!(ids(&fixtures_for_day(&all, DayTab::Today, &c)), vec!["undated", "today"]);
        assert_eq!(ids(&fixtures_for_day(&all, DayTab::Tomorrow, &c)), vec!["tomorrow"]);
    }

    #[test]
    fn countdown_clamps() {
        let now = clock().now;
        let cd = Countdown::until(now + TimeDelta::seconds(90_061), now);
        assert_eq!(cd, Countdown { days: 1, hours: 1, minutes: 1, seconds: 1 });
        let past = Countdown::until(now - TimeDelta::hours(1), now);
        assert_eq!(past, Countdown { days: 0, hours: 0, minutes: 0, seconds: 0 });
    }

    #[test]
    fn board_drops_rows_without_time() {
        let c = clock();
        let listed = kicking_off("listed", TimeDelta::hours(2), "La Liga");
        let blank = Fixture { id: "blank".into(), ..Default::default() };
        let live_blank = Fixture { id: "live-blank".into(), status: Status::Live, ..Default::default() };
        let board = build_board(&[listed, blank, live_blank], DayTab::Today, LeagueFilter::All, &c);
        let listed_ids: Vec<&str> = board.entries.iter().map(|e| e.fixture.id.as_str()).collect();
        assert_eq!(listed_ids, vec!["live-blank", "listed"]);
    }
}
