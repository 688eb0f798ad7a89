//! Store directory layout and locking.

use crate::error::{StoreError, StoreResult};
use fs2::FileExt;
use onedoc_protocol::DocVersion;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// File names within the store directory.
const DATA_FILE: &str = "data.json";
const LOCK_FILE: &str = "LOCK";
const BACKUPS_DIR: &str = "backups";
const CONFLICTS_DIR: &str = "conflicts";

/// Manages the store directory structure and file locking.
///
/// Holding a `StoreDir` means holding an exclusive advisory lock on the
/// directory: a second process opening the same store gets
/// [`StoreError::Locked`]. The lock is released when the value is
/// dropped.
#[derive(Debug)]
pub struct StoreDir {
    /// Root directory path.
    path: PathBuf,
    /// Lock file handle (held for exclusive access).
    _lock_file: File,
}

impl StoreDir {
    /// Opens or creates a store directory and acquires its lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the path is
    /// not a directory, or another process holds the lock.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        if !path.is_dir() {
            return Err(StoreError::InvalidPath(format!(
                "not a directory: {}",
                path.display()
            )));
        }

        let lock_path = path.join(LOCK_FILE);
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(StoreError::Locked);
        }

        fs::create_dir_all(path.join(BACKUPS_DIR))?;
        fs::create_dir_all(path.join(CONFLICTS_DIR))?;

        Ok(Self {
            path: path.to_path_buf(),
            _lock_file: lock_file,
        })
    }

    /// Returns the store directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path to the primary document file.
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.path.join(DATA_FILE)
    }

    /// Returns the backups directory.
    #[must_use]
    pub fn backups_dir(&self) -> PathBuf {
        self.path.join(BACKUPS_DIR)
    }

    /// Returns the conflicts directory.
    #[must_use]
    pub fn conflicts_dir(&self) -> PathBuf {
        self.path.join(CONFLICTS_DIR)
    }

    /// Returns the backup file path for a snapshot of the given
    /// timestamp. Colons and spaces are replaced so the name stays
    /// portable across file systems.
    #[must_use]
    pub fn backup_path(&self, ts: &str) -> PathBuf {
        let name = format!("{}_{}", ts.replace(':', "-").replace(' ', "_"), DATA_FILE);
        self.backups_dir().join(name)
    }

    /// Returns the conflict archive path for the given superseded
    /// version.
    #[must_use]
    pub fn conflict_path(&self, version: &DocVersion) -> PathBuf {
        let name = format!("{}_{}", version.file_stem(), DATA_FILE);
        self.conflicts_dir().join(name)
    }
}
