use crate::domain::{PlatformKind, VideoInfo};
use crate::page::HostPage;
use crate::parser::parse_clock;

pub(super) const DOMAIN: &str = "twitch.tv";
pub(super) const TITLE: &str = "[data-a-target=\"stream-title\"]";
pub(super) const CHAT_REPLAY: &str = "[data-a-target=\"chat-message-text\"]";
pub(super) const SEEKBAR: &str = "[data-a-target=\"player-seekbar\"]";
pub(super) const LIVE_CLOCK: &str = ".live-time";

/// `/videos/<id>` is a VOD; every other channel path is live.
pub(super) fn is_vod_path(path: &str) -> bool {
    let mut segments = path.split('/').filter(|segment| !segment.is_empty());
    segments.next() == Some("videos") && segments.next().is_some()
}

pub(super) fn vod_info(page: &dyn HostPage) -> VideoInfo {
    let (current_time, duration) = super::media_times(page);
    VideoInfo {
        title: super::title_of(page, TITLE),
        current_time,
        duration,
        platform: PlatformKind::TwitchVod,
    }
}

/// Live streams have no seekable media; the uptime clock stands in for `current_time`.
pub(super) fn live_info(page: &dyn HostPage) -> VideoInfo {
    let uptime = page
        .text(LIVE_CLOCK)
        .and_then(|clock| parse_clock(&clock))
        .unwrap_or(0);
    VideoInfo {
        title: super::title_of(page, TITLE),
        current_time: uptime as f64,
        duration: 0.0,
        platform: PlatformKind::TwitchLive,
    }
}
