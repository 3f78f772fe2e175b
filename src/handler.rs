use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::board::{Board, DayTab, build_board};
use crate::config::Config;
use crate::document_store::DocumentStore;
use crate::league::LeagueFilter;
use crate::model::Fixture;
use crate::store::{FixtureDraft, FixtureStore, MemoryStore};

/// An admin edit to replay against the storage snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdminAction {
    Upsert {
        draft: FixtureDraft,
        #[serde(default)]
        editing: Option<String>,
    },
    Delete {
        id: String,
    },
    SetTopMatch {
        id: String,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub day: DayTab,
    #[serde(default)]
    pub league: LeagueFilter,
    #[serde(default)]
    pub fixtures: Vec<Fixture>,
    /// Local-storage snapshot holding admin-curated fixtures.
    #[serde(default)]
    pub storage: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub actions: Vec<AdminAction>,
    /// Document store to read from; falls back to `FIXTURES_URL`.
    #[serde(default)]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub board: Board,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<BTreeMap<String, String>>,
    pub messages: Vec<String>,
}

#[instrument(skip(event))]
pub async fn handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    let config = Config::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;
    let payload = event.payload;

    // ureq blocks, so the whole run goes to the blocking pool.
    let response = tokio::task::spawn_blocking(move || process(payload, &config, Utc::now())).await?;
    Ok(response)
}

/// Apply admin actions, gather fixtures from every source and build the board.
pub fn process(request: Request, config: &Config, now: DateTime<Utc>) -> Response {
    let clock = config.clock_at(now);
    let remote = request
        .source_url
        .as_deref()
        .or(config.fixtures_url.as_deref())
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(DocumentStore::new);

    let keep_storage = request.storage.is_some() || !request.actions.is_empty();
    let mut store = FixtureStore::new(MemoryStore::from_snapshot(request.storage.unwrap_or_default()));
    let mut messages: Vec<String> = Vec::new();

    for action in request.actions {
        let outcome = match action {
            AdminAction::Upsert { draft, editing } => store.upsert(&draft, editing.as_deref(), &clock).map(|fixture| {
                if let Some(remote) = &remote {
                    if let Err(e) = remote.upsert(&fixture) {
                        warn!(error = %e, id = %fixture.id, "Remote write failed; kept local copy");
                        return format!("Saved {} locally; remote write failed: {}", fixture.id, e);
                    }
                }
                format!("Saved {}", fixture.id)
            }),
            AdminAction::Delete { id } => store.delete(&id).map(|existed| {
                if existed { format!("Deleted {id}") } else { format!("Nothing to delete for {id}") }
            }),
            AdminAction::SetTopMatch { id } => store.set_top_match(&id, &clock).map(|()| format!("Top match set to {id}")),
        };
        match outcome {
            Ok(msg) => {
                info!(message = %msg, "Applied admin action");
                messages.push(msg);
            }
            Err(e) => {
                error!(error = %e, "Admin action failed");
                messages.push(format!("Action failed: {e}"));
            }
        }
    }

    // Local edits first: they are the freshest copy of a fixture.
    let mut seen: HashSet<String> = HashSet::new();
    let fixtures: Vec<Fixture> = store
        .load()
        .into_iter()
        .chain(request.fixtures)
        .chain(remote.iter().flat_map(DocumentStore::fetch_fixtures))
        .filter(|f| seen.insert(f.id.clone()))
        .collect();

    let board = build_board(&fixtures, request.day, request.league, &clock);
    info!(
        fixtures = fixtures.len(),
        listed = board.entries.len(),
        featured = ?board.featured.as_ref().map(|e| e.fixture.id.as_str()),
        "Built board"
    );

    let storage = keep_storage.then(|| store.into_inner().into_snapshot());
    Response { board, storage, messages }
}
