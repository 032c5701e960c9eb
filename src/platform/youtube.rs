use crate::domain::{PlatformKind, VideoInfo};
use crate::page::HostPage;

pub(super) const DOMAIN: &str = "youtube.com";
pub(super) const TITLE: &str = "h1.ytd-watch-metadata yt-formatted-string";
pub(super) const COMMENTS: &str = "#content-text";
pub(super) const PROGRESS_BAR: &str = ".ytp-progress-bar";

pub(super) fn video_info(page: &dyn HostPage) -> VideoInfo {
    let (current_time, duration) = super::media_times(page);
    VideoInfo {
        title: super::title_of(page, TITLE),
        current_time,
        duration,
        platform: PlatformKind::YouTube,
    }
}
