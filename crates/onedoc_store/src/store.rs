//! The document store: load, commit, archive, backup.

use crate::dir::StoreDir;
use crate::error::StoreResult;
use onedoc_protocol::{DocVersion, StoredFile};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// A successful read of the primary file.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    /// The parsed and normalized store content.
    pub stored: StoredFile,
    /// The raw bytes as found on disk, kept for archiving.
    pub raw: String,
    /// True when the file carried no `dataVersion` and one was
    /// synthesized for this read.
    pub version_synthesized: bool,
}

/// The single-document store.
///
/// Every operation re-reads the primary file; nothing is cached across
/// requests. The store file is the sole source of truth.
#[derive(Debug)]
pub struct DocumentStore {
    dir: StoreDir,
}

impl DocumentStore {
    /// Opens the store at the given directory, acquiring its lock.
    pub fn open(path: &Path) -> StoreResult<Self> {
        Ok(Self {
            dir: StoreDir::open(path)?,
        })
    }

    /// Returns the store directory.
    #[must_use]
    pub fn dir(&self) -> &StoreDir {
        &self.dir
    }

    /// Reads the primary file without writing anything.
    ///
    /// Returns `None` when the file is absent, unreadable, or does not
    /// parse into a usable document — all treated as "no prior state".
    pub fn read(&self) -> StoreResult<Option<LoadedFile>> {
        let path = self.dir.data_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "primary file unreadable, treating as empty store");
                return Ok(None);
            }
        };

        match StoredFile::parse_lenient(&raw) {
            Some((stored, version_synthesized)) => Ok(Some(LoadedFile {
                stored,
                raw,
                version_synthesized,
            })),
            None => {
                warn!(path = %path.display(), "primary file unparseable, treating as empty store");
                Ok(None)
            }
        }
    }

    /// Loads the store, bootstrapping an empty document when no usable
    /// prior state exists.
    ///
    /// The synthesized empty state is persisted through the
    /// write-if-changed commit, so the bootstrap is idempotent: a
    /// second load finds the file present and writes nothing. The
    /// returned boolean reports whether the bootstrap ran.
    pub fn load_or_init(&self) -> StoreResult<(StoredFile, bool)> {
        match self.read()? {
            Some(loaded) => Ok((loaded.stored, false)),
            None => {
                let stored = StoredFile::empty();
                self.commit(&stored)?;
                info!(version = %stored.data_version, "bootstrapped empty document store");
                Ok((stored.normalized(), true))
            }
        }
    }

    /// Commits new content to the primary file.
    ///
    /// Returns true when bytes were written; identical content is left
    /// untouched so no-op saves do not disturb mtimes or file watchers.
    pub fn commit(&self, stored: &StoredFile) -> StoreResult<bool> {
        let serialized = stored.to_json()?;
        self.write_if_changed(&self.dir.data_path(), &serialized)
    }

    /// Archives the losing side of a version conflict under the
    /// superseded version. Conflict files are never pruned.
    pub fn write_conflict(&self, version: &DocVersion, content: &str) -> StoreResult<bool> {
        self.write_if_changed(&self.dir.conflict_path(version), content)
    }

    /// Writes a backup snapshot named after the superseded timestamp,
    /// then prunes the backup directory down to `max_backups`.
    pub fn write_backup(&self, content: &str, ts: &str, max_backups: usize) -> StoreResult<()> {
        self.write_if_changed(&self.dir.backup_path(ts), content)?;
        let pruned = self.prune_backups(max_backups)?;
        if pruned > 0 {
            debug!(pruned, "evicted oldest backups over retention cap");
        }
        Ok(())
    }

    /// Deletes the oldest backup files until at most `max_backups`
    /// remain. Returns the number deleted.
    ///
    /// Backup names start with the snapshot timestamp, so name order is
    /// age order.
    pub fn prune_backups(&self, max_backups: usize) -> StoreResult<usize> {
        let mut files: Vec<_> = fs::read_dir(self.dir.backups_dir())?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        files.sort();

        let excess = files.len().saturating_sub(max_backups);
        for path in files.into_iter().take(excess) {
            fs::remove_file(&path)?;
        }
        Ok(excess)
    }

    /// Lists backup file names, oldest first.
    pub fn backup_files(&self) -> StoreResult<Vec<String>> {
        let mut names: Vec<String> = fs::read_dir(self.dir.backups_dir())?
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        Ok(names)
    }

    fn write_if_changed(&self, path: &Path, content: &str) -> StoreResult<bool> {
        match fs::read_to_string(path) {
            Ok(existing) if existing == content => return Ok(false),
            Ok(_) | Err(_) => {}
        }

        // Write-then-rename keeps a crash from leaving a torn file.
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, path)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onedoc_protocol::{Document, EPOCH_TS};
    use std::time::SystemTime;
    use tempfile::tempdir;

    fn open_store(temp: &tempfile::TempDir) -> DocumentStore {
        DocumentStore::open(&temp.path().join("store")).unwrap()
    }

    fn mtime(path: &Path) -> SystemTime {
        fs::metadata(path).unwrap().modified().unwrap()
    }

    #[test]
    fn read_missing_file_is_none() {
        let temp = tempdir().unwrap();
        let store = open_store(&temp);
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn read_garbage_is_none() {
        let temp = tempdir().unwrap();
        let store = open_store(&temp);
        fs::write(store.dir().data_path(), "{{{not json").unwrap();
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn bootstrap_is_idempotent() {
        let temp = tempdir().unwrap();
        let store = open_store(&temp);

        let (first, created) = store.load_or_init().unwrap();
        assert!(created);
        assert_eq!(first.data.ts(), Some(EPOCH_TS));

        let stamp = mtime(&store.dir().data_path());
        let (second, created) = store.load_or_init().unwrap();
        assert!(!created);
        assert_eq!(second.data_version, first.data_version);
        assert_eq!(second.data.ts(), Some(EPOCH_TS));
        // Second load must not rewrite the file.
        assert_eq!(mtime(&store.dir().data_path()), stamp);
    }

    #[test]
    fn bootstrap_does_not_persist_ts_default() {
        let temp = tempdir().unwrap();
        let store = open_store(&temp);
        store.load_or_init().unwrap();

        let raw = fs::read_to_string(store.dir().data_path()).unwrap();
        assert!(!raw.contains(EPOCH_TS));
    }

    #[test]
    fn commit_skips_identical_content() {
        let temp = tempdir().unwrap();
        let store = open_store(&temp);

        let mut data = Document::new();
        data.set_ts("2024-05-01T10:00:00.000Z");
        let stored = StoredFile::new(data, DocVersion::new("v1"));

        assert!(store.commit(&stored).unwrap());
        assert!(!store.commit(&stored).unwrap());
    }

    #[test]
    fn commit_then_read_round_trips() {
        let temp = tempdir().unwrap();
        let store = open_store(&temp);

        let mut data = Document::new();
        data.set_ts("2024-05-01T10:00:00.000Z");
        data.insert("tasks", serde_json::json!([{"id": 1, "done": false}]));
        let stored = StoredFile::new(data, DocVersion::new("v1"));
        store.commit(&stored).unwrap();

        let loaded = store.read().unwrap().unwrap();
        assert_eq!(loaded.stored, stored);
        assert!(!loaded.version_synthesized);
    }

    #[test]
    fn version_synthesized_for_versionless_file() {
        let temp = tempdir().unwrap();
        let store = open_store(&temp);
        fs::write(store.dir().data_path(), r#"{"data":{"n":1}}"#).unwrap();

        let loaded = store.read().unwrap().unwrap();
        assert!(loaded.version_synthesized);
    }

    #[test]
    fn conflict_archive_is_written_once() {
        let temp = tempdir().unwrap();
        let store = open_store(&temp);
        let version = DocVersion::new("ab-cd");

        assert!(store.write_conflict(&version, "content").unwrap());
        assert!(!store.write_conflict(&version, "content").unwrap());

        let archived = fs::read_to_string(store.dir().conflict_path(&version)).unwrap();
        assert_eq!(archived, "content");
    }

    #[test]
    fn backup_rotation_keeps_most_recent() {
        let temp = tempdir().unwrap();
        let store = open_store(&temp);

        // Write 7 backups against a cap of 5; names sort by timestamp.
        for hour in 0..7 {
            let ts = format!("2024-05-01 0{hour}:00:00");
            store
                .write_backup(&format!("content {hour}"), &ts, 5)
                .unwrap();
        }

        let names = store.backup_files().unwrap();
        assert_eq!(names.len(), 5);
        assert_eq!(names[0], "2024-05-01_02-00-00_data.json");
        assert_eq!(names[4], "2024-05-01_06-00-00_data.json");
    }

    #[test]
    fn prune_reports_deleted_count() {
        let temp = tempdir().unwrap();
        let store = open_store(&temp);

        for hour in 0..4 {
            let ts = format!("2024-05-01 0{hour}:00:00");
            store.write_backup("x", &ts, usize::MAX).unwrap();
        }
        assert_eq!(store.prune_backups(1).unwrap(), 3);
        assert_eq!(store.backup_files().unwrap().len(), 1);
    }
}
