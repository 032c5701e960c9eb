//! Plain data carried between the parser, the session cache and the wire.
mod settings;
mod timestamp;
mod video;

pub use settings::{Settings, SettingsPatch};
pub use timestamp::{MAX_LEVEL, Snapshot, Timestamp, sort_by_time};
pub use video::{PlatformKind, VideoInfo};
