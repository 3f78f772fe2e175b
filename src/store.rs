use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::board::DayTab;
use crate::errors::StoreError;
use crate::model::{Fixture, FixtureMeta, FixtureOverrides, PlayerServer, Status};
use crate::playback::{SmartSource, infer_server, smart_backup, validate_slug};
use crate::schedule::BoardClock;

pub const FIXTURES_KEY: &str = "custom-matches";

pub fn streams_key(id: &str) -> String {
    format!("match-streams:{id}")
}

pub fn status_key(id: &str) -> String {
    format!("match-status:{id}")
}

pub fn meta_key(id: &str) -> String {
    format!("match-meta:{id}")
}

/// String key/value storage with browser local-storage semantics: no
/// transactions, last write wins.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn from_snapshot<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self { entries: entries.into_iter().collect() }
    }

    pub fn into_snapshot(self) -> BTreeMap<String, String> {
        self.entries
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Admin form contents for creating or editing a fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FixtureDraft {
    pub home_team: String,
    pub away_team: String,
    pub league: String,
    pub time: String,
    /// Explicit date; when absent the fixture goes on `day`.
    pub date: Option<NaiveDate>,
    pub day: DayTab,
    pub status: Status,
    pub streams: Vec<String>,
    pub channel_slug: Option<String>,
    /// Free-form slug typed outside the catalogues; skips validation.
    pub other_slug: Option<String>,
    pub player_server: Option<PlayerServer>,
    pub smart_source: Option<SmartSource>,
    pub backup_iframe: Option<String>,
    pub home_logo: Option<String>,
    pub away_logo: Option<String>,
    pub cpa_link: Option<String>,
    pub tv_channel: Option<String>,
    pub commentator: Option<String>,
    pub stadium: Option<String>,
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

fn required(value: &str, field: &'static str) -> Result<String, StoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::MissingField(field));
    }
    Ok(value.to_string())
}

/// Identifier of a fixture: its identity-bearing fields joined by `-`.
pub fn fixture_id(home: &str, away: &str, date: NaiveDate, time: &str) -> String {
    format!("{}-{}-{}-{}", home.trim(), away.trim(), date.format("%Y-%m-%d"), time.trim())
}

/// Fixtures plus their side records, merged on read.
#[derive(Debug, Clone, Default)]
pub struct FixtureStore<S> {
    kv: S,
}

impl<S: KeyValueStore> FixtureStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn into_inner(self) -> S {
        self.kv
    }

    fn read_list(&self) -> Result<Vec<Fixture>, StoreError> {
        match self.kv.get(FIXTURES_KEY) {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|source| StoreError::Corrupt { key: FIXTURES_KEY.to_string(), source }),
        }
    }

    fn write_list(&mut self, list: &[Fixture]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(list).map_err(|source| StoreError::Encode { what: "fixture list", source })?;
        self.kv.set(FIXTURES_KEY, raw);
        Ok(())
    }

    /// Side records for one fixture. Unreadable records count as absent.
    pub fn overrides(&self, id: &str) -> FixtureOverrides {
        let streams = self
            .kv
            .get(&streams_key(id))
            .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).ok())
            .unwrap_or_default();
        let status = self.kv.get(&status_key(id)).and_then(|raw| Status::from_word(&raw));
        let meta = self
            .kv
            .get(&meta_key(id))
            .and_then(|raw| serde_json::from_str::<FixtureMeta>(&raw).ok());
        FixtureOverrides { streams, status, meta }
    }

    /// Every stored fixture with its side records folded in.
    #[instrument(level = "info", skip(self))]
    pub fn load(&self) -> Vec<Fixture> {
        let list = match self.read_list() {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable fixture list");
                return Vec::new();
            }
        };
        list.into_iter()
            .map(|f| {
                let overrides = self.overrides(&f.id);
                overrides.apply(f)
            })
            .collect()
    }

    fn write_side_records(&mut self, id: &str, draft: &FixtureDraft) -> Result<(), StoreError> {
        let streams: Vec<&str> = draft.streams.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
        let streams = serde_json::to_string(&streams).map_err(|source| StoreError::Encode { what: "stream list", source })?;
        let meta = FixtureMeta {
            tv_channel: trimmed(&draft.tv_channel),
            commentator: trimmed(&draft.commentator),
            stadium: trimmed(&draft.stadium),
        };
        let meta = serde_json::to_string(&meta).map_err(|source| StoreError::Encode { what: "fixture meta", source })?;
        self.kv.set(&streams_key(id), streams);
        self.kv.set(&status_key(id), draft.status.as_word().to_string());
        self.kv.set(&meta_key(id), meta);
        Ok(())
    }

    fn remove_side_records(&mut self, id: &str) {
        self.kv.remove(&streams_key(id));
        self.kv.remove(&status_key(id));
        self.kv.remove(&meta_key(id));
    }

    /// Create a fixture, or replace `editing` with it.
    ///
    /// Identity follows home, away, date and time; an edit that changes any
    /// of them retires the old record and its side records.
    #[instrument(level = "info", skip(self, draft, clock), fields(home = %draft.home_team, away = %draft.away_team))]
    pub fn upsert(&mut self, draft: &FixtureDraft, editing: Option<&str>, clock: &BoardClock) -> Result<Fixture, StoreError> {
        let home_team = required(&draft.home_team, "homeTeam")?;
        let away_team = required(&draft.away_team, "awayTeam")?;
        let league = required(&draft.league, "league")?;
        let time = required(&draft.time, "time")?;

        let (channel_slug, player_server) = match trimmed(&draft.other_slug) {
            Some(other) => {
                let server = infer_server(&other);
                (Some(other), Some(server))
            }
            None => {
                let slug = trimmed(&draft.channel_slug);
                if let (Some(slug), Some(server)) = (slug.as_deref(), draft.player_server) {
                    if !validate_slug(server, slug) {
                        let server = match server {
                            PlayerServer::Panda => "panda",
                            PlayerServer::Starz => "starz",
                        };
                        return Err(StoreError::SlugMismatch { slug: slug.to_string(), server });
                    }
                }
                (slug, draft.player_server)
            }
        };

        let date = draft.date.unwrap_or_else(|| clock.date_for_offset(draft.day.offset()));
        let id = fixture_id(&home_team, &away_team, date, &time);

        let mut list = self.read_list()?;
        let retired = editing.unwrap_or(id.as_str()).to_string();
        let previous = list.iter().find(|f| f.id == retired).cloned();
        list.retain(|f| f.id != retired && f.id != id);

        let backup_iframe = smart_backup(channel_slug.as_deref(), draft.smart_source, draft.backup_iframe.as_deref());
        let fixture = Fixture {
            id: id.clone(),
            home_team,
            away_team,
            league,
            date: Some(date),
            time,
            // The flag only survives an edit that keeps the same identity.
            is_top_match: previous.filter(|p| p.id == id).and_then(|p| p.is_top_match),
            status: draft.status,
            channel_slug,
            backup_iframe,
            player_server,
            home_logo: trimmed(&draft.home_logo),
            away_logo: trimmed(&draft.away_logo),
            cpa_link: trimmed(&draft.cpa_link),
            ..Default::default()
        };
        list.push(fixture.clone());
        self.write_list(&list)?;
        self.write_side_records(&id, draft)?;
        if retired != id {
            self.remove_side_records(&retired);
        }

        info!(id = %id, retired = %retired, "Saved fixture");
        Ok(fixture)
    }

    /// Remove a fixture and every side record. Returns whether it was listed.
    #[instrument(level = "info", skip(self))]
    pub fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut list = self.read_list()?;
        let before = list.len();
        list.retain(|f| f.id != id);
        let existed = list.len() != before;
        self.write_list(&list)?;
        self.remove_side_records(id);
        info!(existed, "Deleted fixture");
        Ok(existed)
    }

    /// Make `id` the top match of its date, clearing the flag on every
    /// other fixture that shares the date. Undated fixtures count as today.
    #[instrument(level = "info", skip(self, clock))]
    pub fn set_top_match(&mut self, id: &str, clock: &BoardClock) -> Result<(), StoreError> {
        let mut list = self.read_list()?;
        let today = clock.today();
        let target_date = list
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.date.unwrap_or(today))
            .ok_or_else(|| StoreError::UnknownFixture(id.to_string()))?;
        for fixture in list.iter_mut() {
            if fixture.date.unwrap_or(today) == target_date {
                fixture.is_top_match = Some(fixture.id == id);
            }
        }
        self.write_list(&list)
    }
}
