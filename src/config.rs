use std::env;

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;

use crate::errors::ConfigError;
use crate::schedule::BoardClock;

pub const DEFAULT_TIMEZONE: &str = "Asia/Riyadh";

/// Deployment settings, read from the Lambda environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub timezone: Tz,
    pub kickoff_correction: TimeDelta,
    pub match_length: TimeDelta,
    pub fixtures_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Asia::Riyadh,
            kickoff_correction: crate::schedule::DEFAULT_KICKOFF_CORRECTION,
            match_length: crate::schedule::DEFAULT_MATCH_LENGTH,
            fixtures_url: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; unset or blank variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Config::default();

        if let Some(tz) = get("BOARD_TIMEZONE") {
            config.timezone = tz.parse::<Tz>().map_err(|_| ConfigError::Timezone(tz))?;
        }
        if let Some(minutes) = get("KICKOFF_CORRECTION_MINUTES") {
            config.kickoff_correction = TimeDelta::minutes(parse_minutes("KICKOFF_CORRECTION_MINUTES", minutes)?);
        }
        if let Some(minutes) = get("MATCH_DURATION_MINUTES") {
            let minutes = parse_minutes("MATCH_DURATION_MINUTES", minutes)?;
            if minutes <= 0 {
                return Err(ConfigError::NonPositiveDuration(minutes));
            }
            config.match_length = TimeDelta::minutes(minutes);
        }
        config.fixtures_url = get("FIXTURES_URL");
        Ok(config)
    }

    pub fn clock_at(&self, now: DateTime<Utc>) -> BoardClock {
        BoardClock::new(now, self.timezone)
            .with_correction(self.kickoff_correction)
            .with_match_length(self.match_length)
    }
}

// Bounded to a week so TimeDelta::minutes cannot overflow.
fn parse_minutes(name: &'static str, value: String) -> Result<i64, ConfigError> {
    match value.parse::<i64>() {
        Ok(m) if m.abs() <= 7 * 24 * 60 => Ok(m),
        _ => Err(ConfigError::NotAnInteger { name, value }),
    }
}
