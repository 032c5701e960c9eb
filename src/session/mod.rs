//! The owned session: page handle, timestamp cache, settings and the refresh loop.
//!
//! Reads follow a two-channel contract. `get_timestamps` answers immediately
//! from whatever is cached and, when the cache is empty, starts a background
//! refresh. The refreshed value is never handed to that caller; it is published
//! on the `subscribe` channel and returned by later reads.
mod cache;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::domain::{Settings, SettingsPatch, Snapshot, Timestamp, VideoInfo, sort_by_time};
use crate::error::SessionError;
use crate::loader::{RetryPolicy, wait_for_content_ready};
use crate::overlay::{self, TimestampFilter};
use crate::page::HostPage;
use crate::parser::{self, parse_comment, split_level, user_of};
use crate::platform::{PlatformAdapter, read_video_info};

pub use cache::SessionCache;

/// Answer to a timestamp read: the filtered view plus live video info.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampView {
    pub timestamps: Vec<Timestamp>,
    pub video_info: VideoInfo,
}

#[derive(Debug)]
struct SessionState {
    cache: SessionCache,
    settings: Settings,
}

struct Shared {
    page: Arc<dyn HostPage>,
    state: Mutex<SessionState>,
    updates: watch::Sender<Snapshot>,
    retry: RetryPolicy,
    cancel: CancellationToken,
    refreshing: AtomicBool,
}

/// Session object handed to the dispatcher by reference.
#[derive(Clone)]
pub struct Session {
    shared: Arc<Shared>,
}

impl Session {
    #[must_use]
    pub fn new(page: Arc<dyn HostPage>, settings: Settings, retry: RetryPolicy) -> Self {
        let (updates, _) = watch::channel(Snapshot::default());
        Self {
            shared: Arc::new(Shared {
                page,
                state: Mutex::new(SessionState {
                    cache: SessionCache::new(),
                    settings,
                }),
                updates,
                retry,
                cancel: CancellationToken::new(),
                refreshing: AtomicBool::new(false),
            }),
        }
    }

    #[must_use]
    pub fn page(&self) -> &dyn HostPage {
        self.shared.page.as_ref()
    }

    /// Receives a snapshot after every cache write, including background refreshes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.updates.subscribe()
    }

    /// Current cache contents, unfiltered.
    ///
    /// # Errors
    ///
    /// Returns `StatePoisoned` if a previous writer panicked.
    pub fn snapshot(&self) -> Result<Snapshot, SessionError> {
        Ok(self.shared.lock()?.cache.snapshot())
    }

    /// # Errors
    ///
    /// Returns `StatePoisoned` if a previous writer panicked.
    pub fn settings(&self) -> Result<Settings, SessionError> {
        Ok(self.shared.lock()?.settings.clone())
    }

    /// Immediate read of the filtered cache.
    ///
    /// Navigation to another video clears the cache and the overlay first. An
    /// empty cache starts a background refresh whose result only later reads see.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedPage` off video pages and `StatePoisoned` on a poisoned lock.
    pub fn get_timestamps(&self) -> Result<TimestampView, SessionError> {
        let (adapter, video_info) = read_video_info(self.page())?;
        let (timestamps, needs_refresh) = {
            let mut state = self.shared.lock()?;
            self.shared.follow_navigation(&mut state, &video_info);
            let filter = TimestampFilter::from_settings(&state.settings);
            (
                filter.apply(state.cache.timestamps()),
                state.cache.is_empty(),
            )
        };
        if needs_refresh && adapter.comment_selector().is_some() {
            self.spawn_refresh(adapter);
        }
        Ok(TimestampView {
            timestamps,
            video_info,
        })
    }

    /// Replaces the cache with `timestamps` (pasted input) and redraws.
    ///
    /// # Errors
    ///
    /// Returns `StatePoisoned` on a poisoned lock.
    pub fn set_timestamps(&self, timestamps: Vec<Timestamp>) -> Result<usize, SessionError> {
        let video_key = read_video_info(self.page()).ok().map(|(_, info)| info.title);
        let mut state = self.shared.lock()?;
        let key = video_key.unwrap_or_else(|| state.cache.video_key().to_owned());
        let count = timestamps.len();
        state.cache.replace(timestamps, &key);
        tracing::debug!("Cache replaced with {} timestamp(s)", count);
        self.shared.redraw(&state);
        self.shared.publish(&state);
        Ok(count)
    }

    /// Parses pasted text in the copy format and stores the result.
    ///
    /// # Errors
    ///
    /// Returns `StatePoisoned` on a poisoned lock.
    pub fn paste(&self, text: &str) -> Result<usize, SessionError> {
        self.set_timestamps(parser::import_text(text))
    }

    /// Adds a timestamp at the current playback position shifted by `offset` seconds.
    ///
    /// Leading level markers in `description` set the level. The time is clamped at zero.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveMedia` when there is no playback position to read.
    pub fn add_timestamp(&self, description: &str, offset: i64) -> Result<Timestamp, SessionError> {
        let (adapter, video_info) =
            read_video_info(self.page()).map_err(|_err| SessionError::NoActiveMedia)?;
        if !has_playback_position(adapter, self.page()) {
            return Err(SessionError::NoActiveMedia);
        }
        let base = video_info.current_time.floor() as i64;
        let time = u64::try_from(base.saturating_add(offset).max(0)).unwrap_or(0);
        let (level, description) = split_level(description);
        let timestamp = Timestamp {
            time,
            level,
            description,
            is_vod_ts: false,
        };

        let mut state = self.shared.lock()?;
        self.shared.follow_navigation(&mut state, &video_info);
        state.cache.insert(timestamp.clone());
        tracing::debug!("Added timestamp at {}s", time);
        self.shared.redraw(&state);
        self.shared.publish(&state);
        Ok(timestamp)
    }

    /// # Errors
    ///
    /// Returns `NotFound` when no entry has `time`.
    pub fn edit_timestamp(&self, time: u64, new_description: &str) -> Result<(), SessionError> {
        let mut state = self.shared.lock()?;
        state.cache.edit(time, new_description)?;
        tracing::debug!("Edited timestamp at {}s", time);
        self.shared.redraw(&state);
        self.shared.publish(&state);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `NoActiveMedia` when the page has no media element.
    pub fn seek_to(&self, time: f64) -> Result<(), SessionError> {
        if self.page().seek(time) {
            Ok(())
        } else {
            Err(SessionError::NoActiveMedia)
        }
    }

    /// Clears the cache and overlay, then waits for a fresh parse of the comments.
    ///
    /// # Errors
    ///
    /// Returns `ContentNotFound` when no comments showed up; the cache stays empty.
    pub async fn reload(&self) -> Result<usize, SessionError> {
        let (adapter, video_info) = read_video_info(self.page())?;
        {
            let mut state = self.shared.lock()?;
            state.cache.reset(&video_info.title);
            overlay::remove(self.page());
            self.shared.publish(&state);
        }
        self.shared.refresh(adapter).await
    }

    /// Merges `patch` into the settings and redraws or removes the overlay.
    ///
    /// # Errors
    ///
    /// Returns `StatePoisoned` on a poisoned lock.
    pub fn update_settings(&self, patch: SettingsPatch) -> Result<Settings, SessionError> {
        let mut state = self.shared.lock()?;
        if state.settings.apply(patch) {
            tracing::debug!("Settings updated: {:?}", state.settings);
        }
        if state.settings.show_marker {
            self.shared.redraw(&state);
        } else {
            overlay::remove(self.page());
        }
        Ok(state.settings.clone())
    }

    /// Distinct `name:` prefixes across the cache, honouring `onlyVodTS`.
    ///
    /// Names are compared without case, like the user filter. The earliest
    /// spelling in the cache wins.
    ///
    /// # Errors
    ///
    /// Returns `StatePoisoned` on a poisoned lock.
    pub fn user_list(&self) -> Result<Vec<String>, SessionError> {
        let state = self.shared.lock()?;
        let filter = TimestampFilter::vod_only(&state.settings);
        let mut users: BTreeMap<String, &str> = BTreeMap::new();
        for name in state
            .cache
            .timestamps()
            .iter()
            .filter(|timestamp| filter.accepts(timestamp))
            .filter_map(|timestamp| user_of(&timestamp.description))
        {
            users.entry(name.to_lowercase()).or_insert(name);
        }
        Ok(users.into_values().map(str::to_owned).collect())
    }

    /// The filtered view rendered in the copy format.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedPage` off video pages.
    pub fn export_text(&self) -> Result<String, SessionError> {
        let view = self.get_timestamps()?;
        Ok(parser::export_text(
            &view.video_info.title,
            &self.page().location(),
            &view.timestamps,
        ))
    }

    /// Stops any wait still in progress.
    pub fn shutdown(&self) {
        self.shared.cancel.cancel();
    }

    fn spawn_refresh(&self, adapter: PlatformAdapter) {
        if self.shared.refreshing.swap(true, Ordering::AcqRel) {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime; skipping comment refresh");
            self.shared.refreshing.store(false, Ordering::Release);
            return;
        };
        let shared = Arc::clone(&self.shared);
        handle.spawn(async move {
            if let Err(err) = shared.refresh(adapter).await {
                tracing::warn!("Background refresh failed: {}", err);
            }
            shared.refreshing.store(false, Ordering::Release);
        });
    }
}

impl Shared {
    fn lock(&self) -> Result<MutexGuard<'_, SessionState>, SessionError> {
        self.state.lock().map_err(|_err| SessionError::StatePoisoned)
    }

    /// Waits for comments, parses them and replaces the cache.
    ///
    /// Later requests never cancel this. When it lands it overwrites the cache
    /// wholesale, including entries added or edited after it started. Only
    /// `shutdown` stops it.
    async fn refresh(&self, adapter: PlatformAdapter) -> Result<usize, SessionError> {
        wait_for_content_ready(
            self.page.as_ref(),
            adapter.comment_selector(),
            self.retry,
            &self.cancel,
        )
        .await?;

        let (adapter, video_info) = read_video_info(self.page.as_ref())?;
        let mut timestamps: Vec<Timestamp> = adapter
            .comment_texts(self.page.as_ref())
            .iter()
            .flat_map(|comment| parse_comment(comment))
            .collect();
        sort_by_time(&mut timestamps);
        let count = timestamps.len();

        let mut state = self.lock()?;
        state.cache.replace(timestamps, &video_info.title);
        self.redraw(&state);
        self.publish(&state);
        tracing::info!(
            "Loaded {} timestamp(s) for '{}'",
            count,
            video_info.title
        );
        Ok(count)
    }

    fn follow_navigation(&self, state: &mut SessionState, video_info: &VideoInfo) {
        if state.cache.video_key() == video_info.title {
            return;
        }
        if !state.cache.video_key().is_empty() {
            tracing::info!(
                "Video changed from '{}' to '{}'; clearing timestamps",
                state.cache.video_key(),
                video_info.title
            );
        }
        state.cache.reset(&video_info.title);
        overlay::remove(self.page.as_ref());
        self.publish(state);
    }

    fn redraw(&self, state: &SessionState) {
        match read_video_info(self.page.as_ref()) {
            Ok((adapter, video_info)) => {
                overlay::render(
                    self.page.as_ref(),
                    adapter,
                    video_info.duration,
                    &state.settings,
                    state.cache.timestamps(),
                );
            }
            Err(err) => {
                tracing::debug!("Skipping markers: {}", err);
                overlay::remove(self.page.as_ref());
            }
        }
    }

    fn publish(&self, state: &SessionState) {
        self.updates.send_replace(state.cache.snapshot());
    }
}

/// Live pages need the uptime clock; every other page needs a media element.
fn has_playback_position(adapter: PlatformAdapter, page: &dyn HostPage) -> bool {
    match adapter.live_clock_selector() {
        Some(clock) => page.contains(clock),
        None => page.media().is_some(),
    }
}
