use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    #[serde(rename = "youtube")]
    YouTube,
    #[serde(rename = "twitchVod")]
    TwitchVod,
    #[serde(rename = "twitchLive")]
    TwitchLive,
}

/// Live view of the page's video. Recomputed on every read, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub title: String,
    pub current_time: f64,
    pub duration: f64,
    pub platform: PlatformKind,
}
