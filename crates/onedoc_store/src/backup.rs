//! Backup eligibility policy.

use chrono::{DateTime, Utc};
use onedoc_protocol::parse_ts;
use std::time::Duration;

/// Default spacing between backup snapshots.
pub const DEFAULT_BACKUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Default maximum number of retained backup files.
pub const DEFAULT_MAX_BACKUPS: usize = 500;

/// Decides when the prior store content is due for a backup snapshot.
///
/// Backups are taken when the stored document's timestamp has aged past
/// the interval, bounding backup volume independently of write
/// frequency.
#[derive(Debug, Clone, Copy)]
pub struct BackupPolicy {
    /// Minimum age of the stored document before a snapshot is taken.
    pub interval: Duration,
    /// Maximum number of backup files kept; oldest are evicted first.
    pub max_backups: usize,
}

impl BackupPolicy {
    /// Creates a policy with the given interval and retention cap.
    #[must_use]
    pub fn new(interval: Duration, max_backups: usize) -> Self {
        Self {
            interval,
            max_backups,
        }
    }

    /// Returns true when `prev_ts` is old enough, relative to `now`,
    /// that the content it stamps should be snapshotted.
    ///
    /// An unparseable timestamp never qualifies: without an age there
    /// is nothing to measure the interval against.
    #[must_use]
    pub fn should_backup(&self, prev_ts: &str, now: DateTime<Utc>) -> bool {
        let Some(prev) = parse_ts(prev_ts) else {
            return false;
        };
        match (now - prev).to_std() {
            Ok(age) => age > self.interval,
            // `prev` lies in the future; nothing to snapshot yet.
            Err(_) => false,
        }
    }
}

impl Default for BackupPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BACKUP_INTERVAL, DEFAULT_MAX_BACKUPS)
    }
}
