//! Per-platform readers of the host page.
//!
//! The platform is detected once per read from the page URL; every read after
//! that goes through the selected variant.
mod twitch;
mod youtube;

use url::Url;

use crate::domain::VideoInfo;
use crate::error::SessionError;
use crate::page::HostPage;

/// Title reported when the heading element is missing.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformAdapter {
    YouTube,
    TwitchVod,
    TwitchLive,
}

impl PlatformAdapter {
    /// Picks the adapter for a page URL.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedPage` for URLs outside YouTube and Twitch.
    pub fn detect(location: &str) -> Result<Self, SessionError> {
        let unsupported = || SessionError::UnsupportedPage {
            location: location.to_owned(),
        };
        let url = Url::parse(location).map_err(|_err| unsupported())?;
        let host = url.host_str().ok_or_else(unsupported)?;
        if matches_domain(host, youtube::DOMAIN) {
            return Ok(PlatformAdapter::YouTube);
        }
        if matches_domain(host, twitch::DOMAIN) {
            return Ok(if twitch::is_vod_path(url.path()) {
                PlatformAdapter::TwitchVod
            } else {
                PlatformAdapter::TwitchLive
            });
        }
        Err(unsupported())
    }

    #[must_use]
    pub fn video_info(self, page: &dyn HostPage) -> VideoInfo {
        match self {
            PlatformAdapter::YouTube => youtube::video_info(page),
            PlatformAdapter::TwitchVod => twitch::vod_info(page),
            PlatformAdapter::TwitchLive => twitch::live_info(page),
        }
    }

    #[must_use]
    pub const fn title_selector(self) -> &'static str {
        match self {
            PlatformAdapter::YouTube => youtube::TITLE,
            PlatformAdapter::TwitchVod | PlatformAdapter::TwitchLive => twitch::TITLE,
        }
    }

    /// Elements whose text may hold timestamps; `None` when the platform has no comment source.
    #[must_use]
    pub const fn comment_selector(self) -> Option<&'static str> {
        match self {
            PlatformAdapter::YouTube => Some(youtube::COMMENTS),
            PlatformAdapter::TwitchVod => Some(twitch::CHAT_REPLAY),
            PlatformAdapter::TwitchLive => None,
        }
    }

    #[must_use]
    pub const fn progress_bar_selector(self) -> Option<&'static str> {
        match self {
            PlatformAdapter::YouTube => Some(youtube::PROGRESS_BAR),
            PlatformAdapter::TwitchVod => Some(twitch::SEEKBAR),
            PlatformAdapter::TwitchLive => None,
        }
    }

    #[must_use]
    pub const fn live_clock_selector(self) -> Option<&'static str> {
        match self {
            PlatformAdapter::TwitchLive => Some(twitch::LIVE_CLOCK),
            PlatformAdapter::YouTube | PlatformAdapter::TwitchVod => None,
        }
    }

    /// Text of every comment currently on the page.
    #[must_use]
    pub fn comment_texts(self, page: &dyn HostPage) -> Vec<String> {
        self.comment_selector()
            .map(|selector| page.texts(selector))
            .unwrap_or_default()
    }
}

/// Detects the platform and reads the current `VideoInfo`.
///
/// # Errors
///
/// Returns `UnsupportedPage` when the page is not a supported video page.
pub fn read_video_info(page: &dyn HostPage) -> Result<(PlatformAdapter, VideoInfo), SessionError> {
    let adapter = PlatformAdapter::detect(&page.location())?;
    Ok((adapter, adapter.video_info(page)))
}

fn matches_domain(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn title_of(page: &dyn HostPage, selector: &str) -> String {
    page.text(selector)
        .map(|title| title.trim().to_owned())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_owned())
}

/// `(current_time, duration)` of the media element, zero when absent or not yet loaded.
fn media_times(page: &dyn HostPage) -> (f64, f64) {
    page.media().map_or((0.0, 0.0), |media| {
        (finite_or_zero(media.current_time), finite_or_zero(media.duration))
    })
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
