use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Comments not found after {attempts} attempts.")]
    ContentNotFound { attempts: u32 },
    #[error("No active media element on the page.")]
    NoActiveMedia,
    #[error("No timestamp at {time}s.")]
    NotFound { time: u64 },
    #[error("Unsupported page '{location}'. Open a YouTube or Twitch video.")]
    UnsupportedPage { location: String },
    #[error("Waiting for comments was cancelled.")]
    Cancelled,
    #[error("Session state lock poisoned.")]
    StatePoisoned,
}
