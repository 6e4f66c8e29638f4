//! Per-domain subdomain snapshots.
//!
//! Each monitored domain has at most one committed snapshot
//! (`snapshots/<domain>.txt`): the sorted set of subdomain names seen at the
//! last successful scan, one per line. Fresh lookup results are first written
//! to a staging file (`snapshots/<domain>.staging`) and only renamed over the
//! committed snapshot after notifications for the run have been attempted.
//! Both writes go through a temp file and `rename`, so a crash at any point
//! leaves the previous committed snapshot intact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{SNAPSHOT_DIR, SNAPSHOT_EXTENSION, STAGING_EXTENSION};
use crate::domain::SubdomainSet;
use crate::error_handling::SnapshotError;

/// Handle to the snapshot directory of one state directory.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Creates a handle to the snapshot store under `state_dir`. The
    /// directory itself is created lazily on first stage.
    pub fn new(state_dir: &Path) -> Self {
        Self {
            dir: state_dir.join(SNAPSHOT_DIR),
        }
    }

    fn snapshot_path(&self, domain: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", domain, SNAPSHOT_EXTENSION))
    }

    fn staging_path(&self, domain: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", domain, STAGING_EXTENSION))
    }

    /// Whether a committed snapshot exists for `domain`.
    pub fn exists(&self, domain: &str) -> bool {
        self.snapshot_path(domain).exists()
    }

    /// Whether a staged (uncommitted) snapshot exists for `domain`.
    pub fn has_staged(&self, domain: &str) -> bool {
        self.staging_path(domain).exists()
    }

    /// Loads the committed snapshot for `domain`.
    ///
    /// A missing file means the domain has never been scanned and yields an
    /// empty set, which is distinct from a read failure (an `Err`).
    pub fn load(&self, domain: &str) -> Result<SubdomainSet, SnapshotError> {
        read_set(&self.snapshot_path(domain))
    }

    /// Loads the staged snapshot for `domain`.
    ///
    /// # Errors
    ///
    /// Unlike [`load`](Self::load), a missing staging file is an error
    /// ([`SnapshotError::NothingStaged`]): callers only read staged data they
    /// have just written.
    pub fn load_staged(&self, domain: &str) -> Result<SubdomainSet, SnapshotError> {
        let path = self.staging_path(domain);
        if !path.exists() {
            return Err(SnapshotError::NothingStaged(domain.to_string()));
        }
        read_set(&path)
    }

    /// Writes `set` as the staged snapshot for `domain`, replacing any
    /// previous staged data. The committed snapshot is untouched.
    pub fn stage(&self, domain: &str, set: &SubdomainSet) -> Result<(), SnapshotError> {
        fs::create_dir_all(&self.dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        for host in set {
            writeln!(tmp, "{}", host)?;
        }
        tmp.persist(self.staging_path(domain))?;
        Ok(())
    }

    /// Promotes the staged snapshot to the committed snapshot via `rename`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::NothingStaged`] if no staged snapshot exists.
    pub fn commit(&self, domain: &str) -> Result<(), SnapshotError> {
        match fs::rename(self.staging_path(domain), self.snapshot_path(domain)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SnapshotError::NothingStaged(domain.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Drops the staged snapshot for `domain` without touching the committed
    /// one. Missing staging is not an error.
    pub fn discard_staged(&self, domain: &str) -> Result<(), SnapshotError> {
        remove_if_present(&self.staging_path(domain))
    }

    /// Deletes the committed and staged snapshots for `domain`, if present.
    pub fn delete(&self, domain: &str) -> Result<(), SnapshotError> {
        remove_if_present(&self.snapshot_path(domain))?;
        self.discard_staged(domain)
    }

    /// Removes every staged snapshot in the store, returning how many were
    /// swept. Staged files found outside a running scan are leftovers from an
    /// interrupted run; the data is re-fetchable, so they are simply dropped.
    pub fn sweep_staged(&self) -> Result<usize, SnapshotError> {
        let mut swept = 0;
        for entry in read_dir_or_empty(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(STAGING_EXTENSION) {
                remove_if_present(&path)?;
                swept += 1;
            }
        }
        Ok(swept)
    }

    /// Deletes every snapshot (committed and staged) in the store.
    pub fn purge_all(&self) -> Result<(), SnapshotError> {
        for entry in read_dir_or_empty(&self.dir)? {
            let path = entry?.path();
            let ext = path.extension().and_then(|e| e.to_str());
            if ext == Some(SNAPSHOT_EXTENSION) || ext == Some(STAGING_EXTENSION) {
                remove_if_present(&path)?;
            }
        }
        Ok(())
    }
}

fn read_set(path: &Path) -> Result<SubdomainSet, SnapshotError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SubdomainSet::new()),
        Err(e) => Err(e.into()),
    }
}

fn remove_if_present(path: &Path) -> Result<(), SnapshotError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// `read_dir` that treats a missing directory as empty.
fn read_dir_or_empty(dir: &Path) -> Result<Vec<Result<fs::DirEntry, std::io::Error>>, SnapshotError> {
    match fs::read_dir(dir) {
        Ok(entries) => Ok(entries.collect()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, SnapshotStore) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = SnapshotStore::new(dir.path());
        (dir, store)
    }

    fn set(hosts: &[&str]) -> SubdomainSet {
        hosts.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn test_load_missing_is_empty() {
        let (_dir, store) = test_store();
        assert!(!store.exists("example.com"));
        assert_eq!(store.load("example.com").unwrap(), SubdomainSet::new());
    }

    #[test]
    fn test_stage_then_commit_round_trip() {
        let (_dir, store) = test_store();
        let hosts = set(&["api.example.com", "www.example.com"]);
        store.stage("example.com", &hosts).unwrap();
        store.commit("example.com").unwrap();
        assert_eq!(store.load("example.com").unwrap(), hosts);
    }

    #[test]
    fn test_staged_data_is_not_visible_until_commit() {
        let (_dir, store) = test_store();
        store
            .stage("example.com", &set(&["new.example.com"]))
            .unwrap();
        // Committed view still empty
        assert_eq!(store.load("example.com").unwrap(), SubdomainSet::new());
        assert!(store.has_staged("example.com"));
        assert_eq!(
            store.load_staged("example.com").unwrap(),
            set(&["new.example.com"])
        );
    }

    #[test]
    fn test_commit_replaces_previous_snapshot() {
        let (_dir, store) = test_store();
        store.stage("example.com", &set(&["a.example.com"])).unwrap();
        store.commit("example.com").unwrap();
        store
            .stage("example.com", &set(&["a.example.com", "b.example.com"]))
            .unwrap();
        store.commit("example.com").unwrap();
        assert_eq!(
            store.load("example.com").unwrap(),
            set(&["a.example.com", "b.example.com"])
        );
        assert!(!store.has_staged("example.com"));
    }

    #[test]
    fn test_commit_without_stage_fails() {
        let (_dir, store) = test_store();
        let err = store.commit("example.com").unwrap_err();
        assert!(matches!(err, SnapshotError::NothingStaged(_)));
    }

    #[test]
    fn test_snapshot_file_is_sorted() {
        let (dir, store) = test_store();
        store
            .stage("example.com", &set(&["zz.example.com", "aa.example.com"]))
            .unwrap();
        store.commit("example.com").unwrap();
        let content =
            fs::read_to_string(dir.path().join("snapshots").join("example.com.txt")).unwrap();
        assert_eq!(content, "aa.example.com\nzz.example.com\n");
    }

    #[test]
    fn test_discard_staged_keeps_committed() {
        let (_dir, store) = test_store();
        store.stage("example.com", &set(&["a.example.com"])).unwrap();
        store.commit("example.com").unwrap();
        store.stage("example.com", &set(&["b.example.com"])).unwrap();
        store.discard_staged("example.com").unwrap();
        assert!(!store.has_staged("example.com"));
        assert_eq!(store.load("example.com").unwrap(), set(&["a.example.com"]));
        // Discarding when nothing is staged is a no-op
        store.discard_staged("example.com").unwrap();
    }

    #[test]
    fn test_delete_removes_both_files() {
        let (_dir, store) = test_store();
        store.stage("example.com", &set(&["a.example.com"])).unwrap();
        store.commit("example.com").unwrap();
        store.stage("example.com", &set(&["b.example.com"])).unwrap();
        store.delete("example.com").unwrap();
        assert!(!store.exists("example.com"));
        assert!(!store.has_staged("example.com"));
        // Deleting again is a no-op
        store.delete("example.com").unwrap();
    }

    #[test]
    fn test_sweep_staged_leaves_committed_snapshots() {
        let (_dir, store) = test_store();
        store.stage("example.com", &set(&["a.example.com"])).unwrap();
        store.commit("example.com").unwrap();
        store.stage("example.org", &set(&["b.example.org"])).unwrap();
        store.stage("example.net", &set(&["c.example.net"])).unwrap();

        let swept = store.sweep_staged().unwrap();
        assert_eq!(swept, 2);
        assert!(store.exists("example.com"));
        assert!(!store.has_staged("example.org"));
        assert!(!store.has_staged("example.net"));
    }

    #[test]
    fn test_sweep_on_missing_dir_is_empty() {
        let (_dir, store) = test_store();
        assert_eq!(store.sweep_staged().unwrap(), 0);
    }

    #[test]
    fn test_purge_all() {
        let (_dir, store) = test_store();
        store.stage("example.com", &set(&["a.example.com"])).unwrap();
        store.commit("example.com").unwrap();
        store.stage("example.org", &set(&["b.example.org"])).unwrap();
        store.purge_all().unwrap();
        assert!(!store.exists("example.com"));
        assert!(!store.has_staged("example.org"));
    }
}
