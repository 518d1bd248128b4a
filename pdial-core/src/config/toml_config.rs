//! TOML settings file I/O
//!
//! The dialer works entirely with built-in defaults; a settings file at
//! `/etc/pdial/config.toml` can override individual fields (alternate
//! peers directory, different tunnel interface names, longer grace
//! period). Missing file means defaults, a malformed file is an error.

use crate::config::DialerSettings;
use crate::error::{ConfigError, DialerError};
use std::path::Path;
use tracing::debug;

/// Default location of the settings file
pub const SETTINGS_PATH: &str = "/etc/pdial/config.toml";

/// Load settings from a TOML file
pub fn settings_from_file(path: &Path) -> Result<DialerSettings, DialerError> {
    let contents = std::fs::read_to_string(path).map_err(|_| {
        DialerError::Config(ConfigError::LoadFailed {
            path: path.display().to_string(),
        })
    })?;

    let settings: DialerSettings = toml::from_str(&contents)?;

    settings.validate().map_err(|message| {
        DialerError::Config(ConfigError::ValidationError { message })
    })?;

    Ok(settings)
}

/// Save settings to a TOML file, creating parent directories as needed
pub fn settings_to_file(settings: &DialerSettings, path: &Path) -> Result<(), DialerError> {
    let contents = toml::to_string_pretty(settings)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            DialerError::Config(ConfigError::IoError {
                message: format!("Failed to create settings directory: {}", e),
            })
        })?;
    }

    std::fs::write(path, contents).map_err(|e| {
        DialerError::Config(ConfigError::IoError {
            message: format!("Failed to write settings file: {}", e),
        })
    })?;

    Ok(())
}

/// Load settings from the default path, falling back to defaults when the
/// file does not exist
pub fn load_settings() -> Result<DialerSettings, DialerError> {
    let path = Path::new(SETTINGS_PATH);
    if path.is_file() {
        debug!("Loading settings from {}", path.display());
        settings_from_file(path)
    } else {
        debug!("No settings file at {}, using defaults", path.display());
        Ok(DialerSettings::default())
    }
}
