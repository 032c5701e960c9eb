use crate::domain::{MAX_LEVEL, Snapshot, Timestamp, sort_by_time};
use crate::error::SessionError;

/// Parsed timestamps plus the identity of the video they belong to.
///
/// Every write leaves `timestamps` sorted by time and bumps `revision`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCache {
    timestamps: Vec<Timestamp>,
    video_key: String,
    revision: u64,
}

impl SessionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    #[must_use]
    pub fn video_key(&self) -> &str {
        &self.video_key
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Drops every entry and rebinds the cache to `video_key`.
    pub fn reset(&mut self, video_key: &str) {
        self.timestamps.clear();
        video_key.clone_into(&mut self.video_key);
        self.bump();
    }

    /// Replaces the cache wholesale.
    pub fn replace(&mut self, mut timestamps: Vec<Timestamp>, video_key: &str) {
        for timestamp in &mut timestamps {
            timestamp.level = timestamp.level.min(MAX_LEVEL);
        }
        sort_by_time(&mut timestamps);
        self.timestamps = timestamps;
        video_key.clone_into(&mut self.video_key);
        self.bump();
    }

    pub fn insert(&mut self, timestamp: Timestamp) {
        self.timestamps.push(timestamp);
        sort_by_time(&mut self.timestamps);
        self.bump();
    }

    /// Rewrites the description of the first entry at `time`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no entry has that time; the cache is left untouched.
    pub fn edit(&mut self, time: u64, description: &str) -> Result<(), SessionError> {
        let entry = self
            .timestamps
            .iter_mut()
            .find(|timestamp| timestamp.time == time)
            .ok_or(SessionError::NotFound { time })?;
        description.trim().clone_into(&mut entry.description);
        self.bump();
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            timestamps: self.timestamps.clone(),
            video_key: self.video_key.clone(),
            revision: self.revision,
        }
    }

    const fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
