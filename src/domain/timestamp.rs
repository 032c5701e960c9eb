use serde::{Deserialize, Serialize};

/// Deepest nesting level a timestamp can carry (0 = chapter).
pub const MAX_LEVEL: u8 = 3;

/// A single time-coded annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timestamp {
    /// Offset into the video in whole seconds.
    pub time: u64,
    /// Nesting depth, `0..=MAX_LEVEL`.
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub description: String,
    /// Set when the source notation was bracketed with the VOD marker.
    #[serde(default, rename = "isVodTS")]
    pub is_vod_ts: bool,
}

impl Timestamp {
    #[must_use]
    pub fn new(time: u64, level: u8, description: impl Into<String>) -> Self {
        Self {
            time,
            level: level.min(MAX_LEVEL),
            description: description.into(),
            is_vod_ts: false,
        }
    }

    #[must_use]
    pub const fn vod(mut self) -> Self {
        self.is_vod_ts = true;
        self
    }
}

/// Stable sort by `time`; entries sharing a time keep their discovery order.
pub fn sort_by_time(timestamps: &mut [Timestamp]) {
    timestamps.sort_by_key(|timestamp| timestamp.time);
}

/// Published state of the session cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub timestamps: Vec<Timestamp>,
    pub video_key: String,
    /// Bumped on every cache write.
    pub revision: u64,
}
