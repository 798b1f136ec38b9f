//! # File I/O Module
//!
//! Low-level file operations shared by the project store and preferences:
//! - **Atomic writes**: Write to `.tmp`, fsync, rename over the target
//! - **Optional reads**: A missing file is `None`, not an error
//! - **File locking**: One writer process per store file
//!
//! Lock files sit next to the locked file with a `.lock` suffix and hold
//! JSON metadata about the holder.
//!
//! ## Example
//!
//! ```rust,no_run
//! use stair_core::file_io::{write_atomic, FileLock};
//! use std::path::Path;
//!
//! let path = Path::new("stair_projects.json");
//! let lock = FileLock::acquire(path)?;
//! write_atomic(path, "[]")?;
//! drop(lock);
//! # Ok::<(), stair_core::errors::StairError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{StairError, StairResult};

/// Lock file metadata stored in `.lock` files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create lock info for the current process
    pub fn current() -> Self {
        LockInfo {
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// Exclusive lock on a file, released when dropped.
///
/// Holds an OS-level lock (via fs2) on the `.lock` file and writes
/// [`LockInfo`] into it so other processes can report who holds it. The OS
/// lock decides ownership; metadata left behind by a process that died is
/// simply overwritten.
#[derive(Debug)]
pub struct FileLock {
    lock_path: PathBuf,
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock for `path`.
    ///
    /// Returns `StairError::FileLocked` when another handle holds the OS lock.
    pub fn acquire(path: &Path) -> StairResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::current();

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| StairError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(match read_lock_info(&lock_path) {
                Some(holder) => StairError::file_locked(
                    path.display().to_string(),
                    format!("pid {} ({})", holder.pid, holder.machine),
                    holder.locked_at.to_rfc3339(),
                ),
                None => StairError::file_locked(path.display().to_string(), "another process", "unknown"),
            });
        }

        // Only truncate once the lock is ours
        lock_file
            .set_len(0)
            .map_err(|e| StairError::file_error("truncate lock", lock_path.display().to_string(), e.to_string()))?;

        let lock_json = serde_json::to_string_pretty(&info).map_err(|e| StairError::Serialization {
            reason: e.to_string(),
        })?;

        lock_file
            .write_all(lock_json.as_bytes())
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| StairError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        log::debug!("Acquired lock {}", lock_path.display());

        Ok(FileLock {
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check whether `path` is locked without acquiring the lock.
    ///
    /// Returns the holder's `LockInfo` while its OS lock is held.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        let handle = OpenOptions::new().read(true).open(&lock_path).ok()?;
        if handle.try_lock_exclusive().is_ok() {
            let _ = handle.unlock();
            return None;
        }
        read_lock_info(&lock_path)
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Leave metadata written by a later holder alone
        if read_lock_info(&self.lock_path).as_ref() == Some(&self.info) {
            let _ = fs::remove_file(&self.lock_path);
        }
        // OS lock is released when _lock_file is dropped
    }
}

fn read_lock_info(lock_path: &Path) -> Option<LockInfo> {
    let contents = fs::read_to_string(lock_path).ok()?;
    serde_json::from_str(&contents).ok()
}

fn lock_path_for(path: &Path) -> PathBuf {
    sibling_with_suffix(path, "lock")
}

fn temp_path_for(path: &Path) -> PathBuf {
    sibling_with_suffix(path, "tmp")
}

/// `dir/name.ext` -> `dir/name.ext.<suffix>`
fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

/// Write `contents` to `path` atomically.
///
/// 1. Write to a sibling `.tmp` file
/// 2. Sync to disk (fsync)
/// 3. Rename over `path`
///
/// An interrupted or failed write leaves the previous file intact. Missing
/// parent directories are created.
pub fn write_atomic(path: &Path, contents: &str) -> StairResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| StairError::file_error("create directory", parent.display().to_string(), e.to_string()))?;
    }

    let tmp_path = temp_path_for(path);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| StairError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    let written = tmp_file
        .write_all(contents.as_bytes())
        .and_then(|_| tmp_file.sync_all());
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(StairError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()));
    }
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        StairError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Read `path` to a string, or `None` if it does not exist.
pub fn read_optional(path: &Path) -> StairResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StairError::file_error("read", path.display().to_string(), e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sibling_paths() {
        let path = Path::new("/data/stair_projects.json");
        assert_eq!(lock_path_for(path), Path::new("/data/stair_projects.json.lock"));
        assert_eq!(temp_path_for(path), Path::new("/data/stair_projects.json.tmp"));
    }

    #[test]
    fn test_write_atomic_creates_no_tmp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("projects.json");

        write_atomic(&path, "{}").unwrap();

        assert!(path.exists());
        assert!(!temp_path_for(&path).exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_write_atomic_replaces_whole_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("projects.json");

        write_atomic(&path, "a much longer first version").unwrap();
        write_atomic(&path, "short").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn test_write_atomic_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("projects.json");

        write_atomic(&path, "[]").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_atomic_failure_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("projects.json");
        write_atomic(&path, "original").unwrap();

        // A directory where the temp file should go makes the write fail
        fs::create_dir(temp_path_for(&path)).unwrap();
        let err = write_atomic(&path, "replacement").unwrap_err();

        assert_eq!(err.error_code(), "FILE_ERROR");
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn test_read_optional() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.json");
        assert_eq!(read_optional(&path).unwrap(), None);

        fs::write(&path, "hello").unwrap();
        assert_eq!(read_optional(&path).unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::current();
        assert_eq!(info.pid, std::process::id());
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("projects.json");

        let lock = FileLock::acquire(&path).unwrap();
        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);
        assert!(!lock_path.exists());
    }

    #[test]
    fn test_held_lock_rejects_second_acquire() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("projects.json");

        let first = FileLock::acquire(&path).unwrap();
        assert_eq!(FileLock::check(&path), Some(first.info.clone()));

        let err = FileLock::acquire(&path).unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");
        assert!(err.to_string().contains(&format!("pid {}", std::process::id())));

        drop(first);
        assert!(FileLock::check(&path).is_none());
        assert!(FileLock::acquire(&path).is_ok());
    }

    #[test]
    fn test_leftover_metadata_without_os_lock_is_taken_over() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("projects.json");

        // A crashed holder leaves metadata but no OS lock
        let dead = LockInfo {
            machine: "unknown".to_string(),
            pid: 999_999,
            locked_at: Utc::now(),
        };
        fs::write(lock_path_for(&path), serde_json::to_string(&dead).unwrap()).unwrap();

        assert!(FileLock::check(&path).is_none());
        let lock = FileLock::acquire(&path).unwrap();
        assert_eq!(lock.info.pid, std::process::id());

        let on_disk: LockInfo = serde_json::from_str(&fs::read_to_string(lock_path_for(&path)).unwrap()).unwrap();
        assert_eq!(on_disk, lock.info);
    }

    #[test]
    fn test_drop_keeps_metadata_of_another_holder() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("projects.json");
        let lock_path = lock_path_for(&path);

        let lock = FileLock::acquire(&path).unwrap();
        let other = LockInfo {
            machine: "other-host".to_string(),
            pid: 4242,
            locked_at: Utc::now(),
        };
        fs::write(&lock_path, serde_json::to_string(&other).unwrap()).unwrap();

        drop(lock);
        assert!(lock_path.exists());
        let on_disk: LockInfo = serde_json::from_str(&fs::read_to_string(&lock_path).unwrap()).unwrap();
        assert_eq!(on_disk, other);
    }
}
