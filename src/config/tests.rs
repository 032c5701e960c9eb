use super::{apply_config, load_config_file, types::ConfigFile};
use std::num::NonZeroU32;
use std::time::Duration;
use tempfile::tempdir;

use crate::args::ServeArgs;
use crate::error::{AppError, ConfigError};

fn write_config(name: &str, content: &str) -> Result<(tempfile::TempDir, ConfigFile), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join(name);
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;
    let config = load_config_file(&path).map_err(|err| format!("load failed: {}", err))?;
    Ok((dir, config))
}

#[test]
fn parse_toml_config_with_settings_and_loader() -> Result<(), String> {
    let content = r#"
[settings]
onlyVodTS = true
displayMarker = false
userFilter = " alice "

[loader]
max_attempts = 4
interval_ms = 250
"#;
    let (_dir, config) = write_config("timestamper.toml", content)?;
    let runtime = apply_config(&ServeArgs::default(), Some(&config))
        .map_err(|err| format!("apply failed: {}", err))?;

    if !runtime.settings.only_vod_ts || runtime.settings.show_marker {
        return Err(format!("Unexpected settings: {:?}", runtime.settings));
    }
    if runtime.settings.user_filter != "alice" {
        return Err(format!("Unexpected user filter: {}", runtime.settings.user_filter));
    }
    if runtime.retry.max_attempts.get() != 4 {
        return Err("Unexpected max_attempts".to_owned());
    }
    if runtime.retry.interval != Duration::from_millis(250) {
        return Err("Unexpected interval".to_owned());
    }
    Ok(())
}

#[test]
fn parse_json_config_with_partial_settings() -> Result<(), String> {
    let content = r#"{ "settings": { "onlyVodTS": true } }"#;
    let (_dir, config) = write_config("timestamper.json", content)?;
    let runtime = apply_config(&ServeArgs::default(), Some(&config))
        .map_err(|err| format!("apply failed: {}", err))?;
    if !runtime.settings.only_vod_ts || !runtime.settings.show_marker {
        return Err(format!("Unexpected settings: {:?}", runtime.settings));
    }
    if runtime.retry.max_attempts.get() != 10 {
        return Err("Expected default max_attempts".to_owned());
    }
    if runtime.retry.interval != Duration::from_millis(1000) {
        return Err("Expected default interval".to_owned());
    }
    Ok(())
}

#[test]
fn cli_overrides_win_over_config() -> Result<(), String> {
    let content = "[loader]\nmax_attempts = 4\ninterval_ms = 250\n";
    let (_dir, config) = write_config("timestamper.toml", content)?;
    let args = ServeArgs {
        max_attempts: Some(2),
        ..ServeArgs::default()
    };
    let runtime =
        apply_config(&args, Some(&config)).map_err(|err| format!("apply failed: {}", err))?;
    if runtime.retry.max_attempts != NonZeroU32::MIN.saturating_add(1) {
        return Err(format!("Unexpected max_attempts: {}", runtime.retry.max_attempts));
    }
    if runtime.retry.interval != Duration::from_millis(250) {
        return Err("Config interval should survive".to_owned());
    }
    Ok(())
}

#[test]
fn zero_retry_values_are_rejected() -> Result<(), String> {
    for (content, field) in [
        ("[loader]\nmax_attempts = 0\n", "max_attempts"),
        ("[loader]\ninterval_ms = 0\n", "interval_ms"),
    ] {
        let (_dir, config) = write_config("timestamper.toml", content)?;
        match apply_config(&ServeArgs::default(), Some(&config)) {
            Err(AppError::Config(ConfigError::FieldMustBePositive { field: actual }))
                if actual == field => {}
            other => return Err(format!("Unexpected result for {}: {:?}", field, other)),
        }
    }
    Ok(())
}

#[test]
fn missing_config_uses_defaults() -> Result<(), String> {
    let runtime = apply_config(&ServeArgs::default(), None)
        .map_err(|err| format!("apply failed: {}", err))?;
    if runtime != super::types::RuntimeConfig::default() {
        return Err(format!("Unexpected runtime config: {:?}", runtime));
    }
    Ok(())
}

#[test]
fn unsupported_extension_is_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("timestamper.yaml");
    std::fs::write(&path, "settings: {}").map_err(|err| format!("write failed: {}", err))?;
    match load_config_file(&path) {
        Err(AppError::Config(ConfigError::UnsupportedExtension { ext })) if ext == "yaml" => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other.map(|_| ()))),
    }
}

#[test]
fn invalid_toml_reports_parse_error() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("timestamper.toml");
    std::fs::write(&path, "[loader\nmax_attempts = ").map_err(|err| format!("write failed: {}", err))?;
    match load_config_file(&path) {
        Err(AppError::Config(ConfigError::ParseToml { .. })) => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other.map(|_| ()))),
    }
}
