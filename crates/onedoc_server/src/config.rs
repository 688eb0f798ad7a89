//! Server configuration.

use onedoc_store::BackupPolicy;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the document server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Directory holding the store file, backups, and conflict
    /// archives.
    pub data_dir: PathBuf,
    /// Minimum age of the stored document before a save snapshots it.
    pub backup_interval: Duration,
    /// Maximum number of backup files kept; oldest evicted first.
    pub max_backups: usize,
    /// Per-request time bound.
    pub request_timeout: Duration,
}

impl ServerConfig {
    /// Creates a configuration with defaults for everything but the
    /// bind address.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            data_dir: PathBuf::from("./data"),
            backup_interval: onedoc_store::DEFAULT_BACKUP_INTERVAL,
            max_backups: onedoc_store::DEFAULT_MAX_BACKUPS,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Sets the backup interval.
    #[must_use]
    pub fn with_backup_interval(mut self, interval: Duration) -> Self {
        self.backup_interval = interval;
        self
    }

    /// Sets the backup retention cap.
    #[must_use]
    pub fn with_max_backups(mut self, max_backups: usize) -> Self {
        self.max_backups = max_backups;
        self
    }

    /// Sets the per-request time bound.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Returns the backup policy implied by this configuration.
    #[must_use]
    pub fn backup_policy(&self) -> BackupPolicy {
        BackupPolicy::new(self.backup_interval, self.max_backups)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 4300)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 4300);
        assert_eq!(config.max_backups, 500);
        assert_eq!(config.backup_interval, Duration::from_secs(3600));
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::default()
            .with_data_dir("/tmp/docs")
            .with_backup_interval(Duration::from_secs(60))
            .with_max_backups(10)
            .with_request_timeout(Duration::from_secs(5));

        assert_eq!(config.data_dir, PathBuf::from("/tmp/docs"));
        assert_eq!(config.backup_policy().max_backups, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
