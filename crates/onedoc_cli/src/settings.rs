//! Optional settings file.
//!
//! A `settings.json` next to the working directory can pre-set any of
//! the server options; command-line flags win over it, and it wins over
//! built-in defaults. A missing file is fine, a malformed one is a
//! startup error.

use onedoc_server::ServerConfig;
use serde::Deserialize;
use std::io;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default settings file location.
pub const DEFAULT_SETTINGS_PATH: &str = "./settings.json";

/// Errors raised while loading the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file exists but could not be read.
    #[error("could not read settings file: {0}")]
    Io(#[from] io::Error),

    /// The file is not valid settings JSON.
    #[error("could not parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings file contents. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Port to listen on.
    pub port: Option<u16>,
    /// Address to bind.
    pub bind: Option<IpAddr>,
    /// Store directory.
    pub data_dir: Option<PathBuf>,
    /// Backup interval, in seconds.
    pub backup_interval_secs: Option<u64>,
    /// Backup retention cap.
    pub max_backups: Option<usize>,
    /// Per-request time bound, in seconds.
    pub request_timeout_secs: Option<u64>,
}

impl Settings {
    /// Loads settings from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Applies these settings over a configuration.
    #[must_use]
    pub fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(port) = self.port {
            config.bind_addr.set_port(port);
        }
        if let Some(bind) = self.bind {
            config.bind_addr.set_ip(bind);
        }
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(secs) = self.backup_interval_secs {
            config.backup_interval = Duration::from_secs(secs);
        }
        if let Some(max_backups) = self.max_backups {
            config.max_backups = max_backups;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let settings = Settings::load(&temp.path().join("settings.json")).unwrap();
        assert!(settings.port.is_none());
        assert!(settings.data_dir.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn settings_apply_over_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"port": 9000, "dataDir": "/srv/onedoc", "maxBackups": 42}"#,
        )
        .unwrap();

        let config = Settings::load(&path)
            .unwrap()
            .apply(ServerConfig::default());
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.data_dir, PathBuf::from("/srv/onedoc"));
        assert_eq!(config.max_backups, 42);
        // Untouched fields keep their defaults.
        assert_eq!(config.backup_interval, Duration::from_secs(3600));
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, r#"{"port": 9000, "legacyOption": true}"#).unwrap();
        assert_eq!(Settings::load(&path).unwrap().port, Some(9000));
    }
}
