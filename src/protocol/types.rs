use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::domain::{Settings, SettingsPatch, Timestamp};
use crate::session::TimestampView;

/// One command, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    GetTimestamps,
    SetTimestamps {
        #[serde(default)]
        timestamps: Vec<Timestamp>,
    },
    #[serde(rename_all = "camelCase")]
    AddTimestamp {
        #[serde(default)]
        description: String,
        #[serde(default)]
        offset: i64,
    },
    SeekTo {
        time: f64,
    },
    #[serde(rename_all = "camelCase")]
    EditTimestamp {
        time: u64,
        new_description: String,
    },
    ReloadTimestamps,
    UpdateSettings {
        #[serde(default)]
        settings: SettingsPatch,
    },
    GetUserList,
    ExportTimestamps,
    PasteTimestamps {
        text: String,
    },
    GetSettings,
}

impl Request {
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Request::GetTimestamps => "getTimestamps",
            Request::SetTimestamps { .. } => "setTimestamps",
            Request::AddTimestamp { .. } => "addTimestamp",
            Request::SeekTo { .. } => "seekTo",
            Request::EditTimestamp { .. } => "editTimestamp",
            Request::ReloadTimestamps => "reloadTimestamps",
            Request::UpdateSettings { .. } => "updateSettings",
            Request::GetUserList => "getUserList",
            Request::ExportTimestamps => "exportTimestamps",
            Request::PasteTimestamps { .. } => "pasteTimestamps",
            Request::GetSettings => "getSettings",
        }
    }
}

/// Reply shapes, serialized without a tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Timestamps(TimestampView),
    Success { success: bool },
    Failure { success: bool, error: String },
    Pasted { success: bool, count: usize },
    Users { users: Vec<String> },
    Text { text: String },
    Settings { settings: Settings },
    Error { error: String },
}

impl Response {
    #[must_use]
    pub const fn success() -> Self {
        Response::Success { success: true }
    }

    #[must_use]
    pub fn failure(error: impl Display) -> Self {
        Response::Failure {
            success: false,
            error: error.to_string(),
        }
    }

    #[must_use]
    pub fn error(error: impl Display) -> Self {
        Response::Error {
            error: error.to_string(),
        }
    }
}
