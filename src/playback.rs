use serde::{Deserialize, Serialize};

use crate::model::{Fixture, PlayerServer};

pub const PANDA_PLAYER_BASE: &str = "https://p4.pandalive.live/albaplayer/";
pub const STARZ_PLAYER_BASE: &str = "https://a.yallashoot2026.com/albaplayer/";

/// How a fixture should be played, first usable source wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "source", rename_all = "snake_case")]
pub enum Playback {
    /// Third-party page to load in an iframe.
    Embed(String),
    /// Raw stream URLs for the in-page player, primary first.
    Streams(Vec<String>),
    Unavailable,
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

pub fn player_base(server: Option<PlayerServer>) -> &'static str {
    match server {
        Some(PlayerServer::Starz) => STARZ_PLAYER_BASE,
        _ => PANDA_PLAYER_BASE,
    }
}

pub fn resolve_playback(fixture: &Fixture) -> Playback {
    if let Some(iframe) = non_blank(fixture.backup_iframe.as_deref()) {
        return Playback::Embed(iframe.to_string());
    }
    if let Some(slug) = non_blank(fixture.channel_slug.as_deref()) {
        return Playback::Embed(format!("{}{}/", player_base(fixture.player_server), slug));
    }
    let streams: Vec<String> = std::iter::once(fixture.stream_url.as_str())
        .chain(fixture.backup_streams.iter().map(String::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if streams.is_empty() {
        Playback::Unavailable
    } else {
        Playback::Streams(streams)
    }
}

pub fn panda_slugs() -> Vec<String> {
    (1..=10)
        .map(|i| format!("bein-{i}"))
        .chain((1..=8).map(|i| format!("ssc-{i}")))
        .chain(["on-time", "mbc-action"].map(String::from))
        .collect()
}

pub fn starz_slugs() -> Vec<String> {
    (1..=4).map(|i| format!("sports-d{i}")).collect()
}

pub fn validate_slug(server: PlayerServer, slug: &str) -> bool {
    let catalogue = match server {
        PlayerServer::Panda => panda_slugs(),
        PlayerServer::Starz => starz_slugs(),
    };
    catalogue.iter().any(|s| s == slug)
}

/// Server for a free-form slug typed outside the catalogues.
pub fn infer_server(slug: &str) -> PlayerServer {
    if slug.starts_with("sports-d") { PlayerServer::Starz } else { PlayerServer::Panda }
}

/// Mirror sites that carry beIN channels under their own URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmartSource {
    Yalla,
    Panda,
}

/// Pick the iframe override: a mirror URL when a beIN slug and a mirror are
/// given, otherwise the explicit backup iframe.
pub fn smart_backup(slug: Option<&str>, source: Option<SmartSource>, explicit: Option<&str>) -> Option<String> {
    let channel = slug
        .and_then(|s| s.strip_prefix("bein-"))
        .filter(|n| !n.is_empty());
    match (source, channel) {
        (Some(SmartSource::Yalla), Some(n)) => Some(format!("https://yalla-live.io/ch/bein-sports-{n}/")),
        (Some(SmartSource::Panda), Some(n)) => Some(format!("https://pandastream.net/live/bein-{n}/")),
        _ => non_blank(explicit).map(str::to_string),
    }
}
