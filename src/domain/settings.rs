use serde::{Deserialize, Serialize};

/// Process-wide display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(rename = "onlyVodTS")]
    pub only_vod_ts: bool,
    #[serde(alias = "displayMarker")]
    pub show_marker: bool,
    pub user_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            only_vod_ts: false,
            show_marker: true,
            user_filter: String::new(),
        }
    }
}

/// Partial update sent by `updateSettings`; absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, rename = "onlyVodTS")]
    pub only_vod_ts: Option<bool>,
    #[serde(default, alias = "displayMarker")]
    pub show_marker: Option<bool>,
    #[serde(default)]
    pub user_filter: Option<String>,
}

impl Settings {
    /// Merges `patch` into these settings and reports whether anything changed.
    pub fn apply(&mut self, patch: SettingsPatch) -> bool {
        let before = self.clone();
        if let Some(only_vod_ts) = patch.only_vod_ts {
            self.only_vod_ts = only_vod_ts;
        }
        if let Some(show_marker) = patch.show_marker {
            self.show_marker = show_marker;
        }
        if let Some(user_filter) = patch.user_filter {
            self.user_filter = user_filter.trim().to_owned();
        }
        *self != before
    }
}
