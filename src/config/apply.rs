use std::num::NonZeroU32;
use std::time::Duration;

use crate::args::ServeArgs;
use crate::error::{AppError, AppResult, ConfigError};
use crate::loader::RetryPolicy;

use super::types::{ConfigFile, RuntimeConfig};

/// Resolves the runtime configuration. Command-line values win over the file.
///
/// # Errors
///
/// Returns an error when a retry field is zero.
pub fn apply_config(args: &ServeArgs, config: Option<&ConfigFile>) -> AppResult<RuntimeConfig> {
    let mut runtime = RuntimeConfig::default();

    if let Some(patch) = config.and_then(|file| file.settings.clone()) {
        runtime.settings.apply(patch);
    }

    let loader = config.and_then(|file| file.loader.as_ref());
    let max_attempts = args
        .max_attempts
        .or_else(|| loader.and_then(|section| section.max_attempts));
    let interval_ms = args
        .interval_ms
        .or_else(|| loader.and_then(|section| section.interval_ms));

    let mut retry = RetryPolicy::default();
    if let Some(value) = max_attempts {
        retry.max_attempts = NonZeroU32::new(value).ok_or_else(|| {
            AppError::config(ConfigError::FieldMustBePositive {
                field: "max_attempts",
            })
        })?;
    }
    if let Some(value) = interval_ms {
        if value == 0 {
            return Err(AppError::config(ConfigError::FieldMustBePositive {
                field: "interval_ms",
            }));
        }
        retry.interval = Duration::from_millis(value);
    }
    runtime.retry = retry;

    Ok(runtime)
}
