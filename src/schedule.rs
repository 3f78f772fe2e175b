use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::model::{Fixture, Status};

/// Admin forms show this when a kickoff is still unknown.
pub const PLACEHOLDER_TIME: &str = "–";

/// The fixture source writes kickoffs three hours ahead of the display zone.
pub const DEFAULT_KICKOFF_CORRECTION: TimeDelta = TimeDelta::hours(-3);
pub const DEFAULT_MATCH_LENGTH: TimeDelta = TimeDelta::hours(3);

/// The wall clock and calendar every board computation is evaluated against.
/// Built fresh for each evaluation; nothing in the core keeps one around.
#[derive(Debug, Clone, Copy)]
pub struct BoardClock {
    pub now: DateTime<Utc>,
    pub tz: Tz,
    pub correction: TimeDelta,
    pub match_length: TimeDelta,
}

impl BoardClock {
    pub fn new(now: DateTime<Utc>, tz: Tz) -> Self {
        Self { now, tz, correction: DEFAULT_KICKOFF_CORRECTION, match_length: DEFAULT_MATCH_LENGTH }
    }

    pub fn with_correction(mut self, correction: TimeDelta) -> Self {
        self.correction = correction;
        self
    }

    pub fn with_match_length(mut self, match_length: TimeDelta) -> Self {
        self.match_length = match_length;
        self
    }

    /// Calendar date of `now` in the board's zone.
    pub fn today(&self) -> NaiveDate {
        self.now.with_timezone(&self.tz).date_naive()
    }

    pub fn date_for_offset(&self, day_offset: u32) -> NaiveDate {
        let today = self.today();
        today.checked_add_days(Days::new(u64::from(day_offset))).unwrap_or(today)
    }
}

/// Parse `HH:MM` the lenient way: leading integers only, no range checks.
/// Out-of-range values roll over when the instant is built.
pub fn parse_kickoff_time(time: &str) -> Option<(i64, i64)> {
    let time = time.trim();
    if time.is_empty() || time == PLACEHOLDER_TIME {
        return None;
    }
    let mut parts = time.split(':');
    let hour = parse_leading_int(parts.next()?)?;
    let minute = parse_leading_int(parts.next()?)?;
    Some((hour, minute))
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Absolute kickoff instant for a fixture, after the source correction.
///
/// The fixture's own date wins; undated fixtures land on today plus
/// `day_offset`. Returns `None` when the time string is missing, the
/// placeholder, or has no numeric hour and minute.
pub fn compute_kickoff(fixture: &Fixture, day_offset: u32, clock: &BoardClock) -> Option<DateTime<Utc>> {
    let (hour, minute) = parse_kickoff_time(&fixture.time)?;
    let date = fixture.date.unwrap_or_else(|| clock.date_for_offset(day_offset));

    let local = date
        .and_time(NaiveTime::MIN)
        .checked_add_signed(TimeDelta::try_hours(hour)?)?
        .checked_add_signed(TimeDelta::try_minutes(minute)?)?
        .checked_add_signed(clock.correction)?;

    resolve_local(&clock.tz, local)
}

// A wall time skipped by a DST jump resolves to the next existing hour.
fn resolve_local(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(local + TimeDelta::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Live inside `[kickoff, kickoff + match_length]`, finished after it,
/// and otherwise whatever the admin stored.
pub fn derive_status(fixture: &Fixture, day_offset: u32, clock: &BoardClock) -> Status {
    let Some(start) = compute_kickoff(fixture, day_offset, clock) else {
        return fixture.status;
    };
    let end = start + clock.match_length;
    if clock.now >= start && clock.now <= end {
        Status::Live
    } else if clock.now > end {
        Status::Finished
    } else {
        fixture.status
    }
}
