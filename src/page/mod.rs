//! The host page and its video element, seen as a read/write capability.
mod fixture;

use serde::{Deserialize, Serialize};

use crate::overlay::MarkerSpec;

pub use fixture::{MountedMarker, PageFixture, StaticPage, load_fixture};

/// Playback position of the page's media element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaState {
    pub current_time: f64,
    pub duration: f64,
}

/// Everything the engine needs from a live page.
///
/// Reads are synchronous and cheap; callers poll them every second.
pub trait HostPage: Send + Sync {
    /// Full URL of the page.
    fn location(&self) -> String;

    /// Text content of the first element matching `selector`.
    fn text(&self, selector: &str) -> Option<String>;

    /// Text content of every element matching `selector`, in document order.
    fn texts(&self, selector: &str) -> Vec<String>;

    fn contains(&self, selector: &str) -> bool {
        self.text(selector).is_some()
    }

    /// `None` when the page has no media element.
    fn media(&self) -> Option<MediaState>;

    /// Moves playback to `time` seconds. Returns false without a media element.
    fn seek(&self, time: f64) -> bool;

    /// Injects a marker into the element matching `container`.
    fn mount_marker(&self, container: &str, marker: &MarkerSpec);

    /// Removes every injected marker. Safe to call when none exist.
    fn clear_markers(&self);
}
