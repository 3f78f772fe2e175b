use serde::{Deserialize, Serialize};

use crate::model::fixture::{Fixture, Status};

/// Presentational metadata kept in the `match-meta:<id>` side record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tv_channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stadium: Option<String>,
}

/// Everything stored beside a fixture under its id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureOverrides {
    pub streams: Vec<String>,
    pub status: Option<Status>,
    pub meta: Option<FixtureMeta>,
}

impl FixtureOverrides {
    /// Fold the side records into the fixture. Present values win.
    pub fn apply(self, mut fixture: Fixture) -> Fixture {
        let mut streams = self.streams.into_iter().filter(|s| !s.trim().is_empty());
        if let Some(first) = streams.next() {
            fixture.stream_url = first;
            fixture.backup_streams = streams.collect();
        }
        if let Some(status) = self.status {
            fixture.status = status;
        }
        if let Some(meta) = self.meta {
            if meta.tv_channel.is_some() {
                fixture.tv_channel = meta.tv_channel;
            }
            if meta.commentator.is_some() {
                fixture.commentator = meta.commentator;
            }
            if meta.stadium.is_some() {
                fixture.stadium = meta.stadium;
            }
        }
        fixture
    }
}
