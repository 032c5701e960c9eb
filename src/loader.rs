//! Bounded-retry wait for comment content to show up on the page.
use std::num::NonZeroU32;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::SessionError;
use crate::page::HostPage;

const DEFAULT_MAX_ATTEMPTS: u32 = 10;
const DEFAULT_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: NonZeroU32,
    pub interval: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: NonZeroU32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: NonZeroU32::new(DEFAULT_MAX_ATTEMPTS).unwrap_or(NonZeroU32::MIN),
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }
}

/// Polls `selector` until at least one element is present.
///
/// The first poll is immediate; `policy.interval` separates the following ones.
///
/// # Errors
///
/// Returns `ContentNotFound` once `policy.max_attempts` polls came up empty, or
/// when `selector` is `None` (the platform has no comment source). Returns
/// `Cancelled` when `cancel` fires while waiting.
pub async fn wait_for_content_ready(
    page: &dyn HostPage,
    selector: Option<&str>,
    policy: RetryPolicy,
    cancel: &CancellationToken,
) -> Result<(), SessionError> {
    let Some(selector) = selector else {
        return Err(SessionError::ContentNotFound { attempts: 0 });
    };
    let max_attempts = policy.max_attempts.get();
    let mut attempt: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }
        attempt = attempt.saturating_add(1);
        if page.contains(selector) {
            tracing::debug!("Comments present after {} attempt(s)", attempt);
            return Ok(());
        }
        if attempt >= max_attempts {
            return Err(SessionError::ContentNotFound {
                attempts: max_attempts,
            });
        }
        tokio::select! {
            () = cancel.cancelled() => return Err(SessionError::Cancelled),
            () = tokio::time::sleep(policy.interval) => {}
        }
    }
}
