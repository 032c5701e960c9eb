//! Progress-bar markers projected from the filtered timestamp view.
use std::time::Duration;

use crate::domain::{Settings, Timestamp};
use crate::page::HostPage;
use crate::parser::user_of;
use crate::platform::PlatformAdapter;

/// Marker positions are expressed in basis points of the video duration.
pub const FULL_SCALE_BP: u16 = 10_000;

/// The view of the cache selected by the current settings. Never mutates the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampFilter {
    only_vod_ts: bool,
    user: Option<String>,
}

impl TimestampFilter {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let user = settings.user_filter.trim();
        Self {
            only_vod_ts: settings.only_vod_ts,
            user: (!user.is_empty()).then(|| user.to_lowercase()),
        }
    }

    /// Only the `onlyVodTS` half of the settings; used to list users.
    #[must_use]
    pub const fn vod_only(settings: &Settings) -> Self {
        Self {
            only_vod_ts: settings.only_vod_ts,
            user: None,
        }
    }

    #[must_use]
    pub fn accepts(&self, timestamp: &Timestamp) -> bool {
        if self.only_vod_ts && !timestamp.is_vod_ts {
            return false;
        }
        match self.user.as_deref() {
            Some(wanted) => user_of(&timestamp.description)
                .is_some_and(|user| user.to_lowercase() == wanted),
            None => true,
        }
    }

    #[must_use]
    pub fn apply(&self, timestamps: &[Timestamp]) -> Vec<Timestamp> {
        timestamps
            .iter()
            .filter(|timestamp| self.accepts(timestamp))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Chapter,
    Section,
}

/// Which edge the tooltip hangs from, keeping it on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipAnchor {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSpec {
    pub time: u64,
    pub kind: MarkerKind,
    /// Offset along the bar, `0..=FULL_SCALE_BP`.
    pub position_bp: u16,
    pub tooltip: String,
    pub anchor: TooltipAnchor,
}

impl MarkerSpec {
    /// Builds the marker for `timestamp`, or `None` when it cannot be drawn
    /// (levels deeper than 1, unknown duration, past the end).
    #[must_use]
    pub fn project(timestamp: &Timestamp, duration: f64) -> Option<Self> {
        let kind = match timestamp.level {
            0 => MarkerKind::Chapter,
            1 => MarkerKind::Section,
            _ => return None,
        };
        let duration_ms = Duration::try_from_secs_f64(duration).ok()?.as_millis();
        if duration_ms == 0 {
            return None;
        }
        let time_ms = u128::from(timestamp.time).saturating_mul(1000);
        if time_ms > duration_ms {
            return None;
        }
        let position = time_ms
            .saturating_mul(u128::from(FULL_SCALE_BP))
            .checked_div(duration_ms)?;
        let anchor = if time_ms.saturating_mul(2) < duration_ms {
            TooltipAnchor::Left
        } else {
            TooltipAnchor::Right
        };
        Some(Self {
            time: timestamp.time,
            kind,
            position_bp: u16::try_from(position).unwrap_or(FULL_SCALE_BP),
            tooltip: timestamp.description.clone(),
            anchor,
        })
    }
}

/// Replaces the markers on the page with the filtered view of `timestamps`.
///
/// Returns how many markers were mounted.
pub fn render(
    page: &dyn HostPage,
    adapter: PlatformAdapter,
    duration: f64,
    settings: &Settings,
    timestamps: &[Timestamp],
) -> usize {
    remove(page);
    if !settings.show_marker {
        return 0;
    }
    let Some(container) = adapter.progress_bar_selector() else {
        return 0;
    };
    if !page.contains(container) {
        tracing::debug!("No progress bar on page; skipping markers");
        return 0;
    }

    let filter = TimestampFilter::from_settings(settings);
    let mut mounted = 0usize;
    for timestamp in timestamps.iter().filter(|timestamp| filter.accepts(timestamp)) {
        if let Some(marker) = MarkerSpec::project(timestamp, duration) {
            page.mount_marker(container, &marker);
            mounted = mounted.saturating_add(1);
        }
    }
    tracing::debug!("Mounted {} marker(s)", mounted);
    mounted
}

/// Strips every marker. Idempotent.
pub fn remove(page: &dyn HostPage) {
    page.clear_markers();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{MediaState, StaticPage};

    fn youtube_page() -> StaticPage {
        let page = StaticPage::new("https://www.youtube.com/watch?v=abc");
        page.set_text(".ytp-progress-bar", "");
        page.set_media(Some(MediaState {
            current_time: 0.0,
            duration: 100.0,
        }));
        page
    }

    #[test]
    fn projects_position_and_anchor() -> Result<(), String> {
        let early = MarkerSpec::project(&Timestamp::new(25, 0, "early"), 100.0)
            .ok_or_else(|| "Expected marker".to_owned())?;
        let late = MarkerSpec::project(&Timestamp::new(75, 1, "late"), 100.0)
            .ok_or_else(|| "Expected marker".to_owned())?;
        assert_eq!(early.position_bp, 2500);
        assert_eq!(early.anchor, TooltipAnchor::Left);
        assert_eq!(early.kind, MarkerKind::Chapter);
        assert_eq!(late.position_bp, 7500);
        assert_eq!(late.anchor, TooltipAnchor::Right);
        assert_eq!(late.kind, MarkerKind::Section);
        Ok(())
    }

    #[test]
    fn skips_deep_levels_and_unknown_duration() {
        assert!(MarkerSpec::project(&Timestamp::new(10, 2, "deep"), 100.0).is_none());
        assert!(MarkerSpec::project(&Timestamp::new(10, 0, "live"), 0.0).is_none());
        assert!(MarkerSpec::project(&Timestamp::new(10, 0, "nan"), f64::NAN).is_none());
        assert!(MarkerSpec::project(&Timestamp::new(101, 0, "past"), 100.0).is_none());
    }

    #[test]
    fn render_applies_filter_and_replaces_previous_markers() {
        let page = youtube_page();
        let timestamps = vec![
            Timestamp::new(10, 0, "alice: one").vod(),
            Timestamp::new(20, 0, "bob: two"),
            Timestamp::new(30, 1, "Alice: three").vod(),
        ];
        let settings = Settings {
            user_filter: "ALICE".to_owned(),
            ..Settings::default()
        };

        let first = render(&page, PlatformAdapter::YouTube, 100.0, &settings, &timestamps);
        let second = render(&page, PlatformAdapter::YouTube, 100.0, &settings, &timestamps);
        assert_eq!(first, 2);
        assert_eq!(second, 2);
        assert_eq!(page.markers().len(), 2);

        let vod_only = Settings {
            only_vod_ts: true,
            ..Settings::default()
        };
        render(&page, PlatformAdapter::YouTube, 100.0, &vod_only, &timestamps);
        let times: Vec<u64> = page.markers().iter().map(|mounted| mounted.marker.time).collect();
        assert_eq!(times, vec![10, 30]);
    }

    #[test]
    fn hidden_markers_still_clear_the_bar() {
        let page = youtube_page();
        let timestamps = vec![Timestamp::new(10, 0, "one")];
        render(&page, PlatformAdapter::YouTube, 100.0, &Settings::default(), &timestamps);
        let hidden = Settings {
            show_marker: false,
            ..Settings::default()
        };
        let mounted = render(&page, PlatformAdapter::YouTube, 100.0, &hidden, &timestamps);
        assert_eq!(mounted, 0);
        assert!(page.markers().is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let page = youtube_page();
        remove(&page);
        remove(&page);
        assert!(page.markers().is_empty());
    }

    #[test]
    fn no_progress_bar_means_no_markers() {
        let page = StaticPage::new("https://www.youtube.com/watch?v=abc");
        let timestamps = vec![Timestamp::new(10, 0, "one")];
        let mounted = render(&page, PlatformAdapter::YouTube, 100.0, &Settings::default(), &timestamps);
        assert_eq!(mounted, 0);
    }
}
