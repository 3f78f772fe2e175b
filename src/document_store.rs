use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, info_span, instrument, warn};

use crate::errors::StoreError;
use crate::model::Fixture;

/// Client for the shared `matches` collection.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MatchesBody {
    List(Vec<Value>),
    Wrapped { documents: Vec<Value> },
}

impl DocumentStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    fn collection_url(&self) -> String {
        format!("{}/matches", self.base_url)
    }

    /// Fetch every fixture document. Any failure is logged and reads as an
    /// empty collection so the board still renders.
    #[instrument(level = "info", skip(self), fields(url = %self.collection_url()))]
    pub fn fetch_fixtures(&self) -> Vec<Fixture> {
        let url = self.collection_url();
        let response = {
            let _span = info_span!("document_store_fetch").entered();
            ureq::get(&url).call()
        };
        let body = match response {
            Ok(response) => {
                let mut body_reader = response.into_body();
                match body_reader.read_to_string() {
                    Ok(body) => body,
                    Err(e) => {
                        error!(error = %e, "Failed to read document store response body");
                        return Vec::new();
                    }
                }
            }
            Err(e) => {
                error!(error = %e, url = %url, "Document store request failed");
                return Vec::new();
            }
        };
        let fixtures = Self::from_json(&body);
        info!(count = fixtures.len(), "Fetched fixtures from document store");
        fixtures
    }

    /// Parse a collection body: a bare array or `{ "documents": [...] }`.
    /// Documents that do not decode as fixtures are skipped.
    pub fn from_json(body: &str) -> Vec<Fixture> {
        let documents = match serde_json::from_str::<MatchesBody>(body) {
            Ok(MatchesBody::List(docs)) | Ok(MatchesBody::Wrapped { documents: docs }) => docs,
            Err(e) => {
                error!(error = %e, "Document store body is not a fixture collection");
                return Vec::new();
            }
        };
        documents
            .into_iter()
            .filter_map(|doc| match serde_json::from_value::<Fixture>(doc) {
                Ok(fixture) if !fixture.id.trim().is_empty() => Some(fixture),
                Ok(_) => {
                    warn!("Skipping fixture document without id");
                    None
                }
                Err(e) => {
                    warn!(error = %e, "Skipping undecodable fixture document");
                    None
                }
            })
            .collect()
    }

    /// Write a fixture document under its id. The store merges fields and
    /// the last writer wins.
    #[instrument(level = "info", skip(self, fixture), fields(id = %fixture.id))]
    pub fn upsert(&self, fixture: &Fixture) -> Result<(), StoreError> {
        let url = format!("{}/{}", self.collection_url(), encode_segment(&fixture.id));
        let payload = serde_json::to_value(fixture).map_err(|source| StoreError::Encode { what: "fixture document", source })?;
        match ureq::put(&url).send_json(payload) {
            Ok(resp) => {
                info!(status = resp.status().as_u16(), "Wrote fixture document");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to write fixture document");
                Err(StoreError::Remote(e.to_string()))
            }
        }
    }
}

// Fixture ids carry spaces, colons and Arabic team names.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}
