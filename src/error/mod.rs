mod app;
mod config;
mod protocol;
mod session;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use protocol::ProtocolError;
pub use session::SessionError;
pub use validation::ValidationError;
