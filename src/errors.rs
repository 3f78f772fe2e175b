use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown timezone {0:?}")]
    Timezone(String),
    #[error("{name} must be an integer, got {value:?}")]
    NotAnInteger { name: &'static str, value: String },
    #[error("MATCH_DURATION_MINUTES must be positive, got {0}")]
    NonPositiveDuration(i64),
}

/// Failures of admin edits and remote writes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("channel slug {slug:?} is not offered by the {server} player")]
    SlugMismatch { slug: String, server: &'static str },
    #[error("no fixture with id {0:?}")]
    UnknownFixture(String),
    #[error("stored value under {key:?} is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("document store request failed: {0}")]
    Remote(String),
}
