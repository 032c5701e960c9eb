use serde::Deserialize;

use crate::domain::{Settings, SettingsPatch};
use crate::loader::RetryPolicy;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// Initial display settings; the same keys `updateSettings` accepts.
    pub settings: Option<SettingsPatch>,
    pub loader: Option<LoaderConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoaderConfig {
    pub max_attempts: Option<u32>,
    pub interval_ms: Option<u64>,
}

/// Settings and retry policy the session starts with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuntimeConfig {
    pub settings: Settings,
    pub retry: RetryPolicy,
}
