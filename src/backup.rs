//! First-write backups per collection, with recursive restore.
//!
//! Each collection (an animation folder) owns a `backups/` root. The first
//! time a file is about to be mutated its pristine content is copied there;
//! the backup is never overwritten afterwards, so it always holds the
//! pre-any-edit original no matter how many batches have run since. Restore
//! walks the backup root recursively and copies everything back, reporting a
//! per-file outcome and continuing past individual failures.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Directory name of a collection's backup root.
pub const BACKUP_DIR: &str = "backups";

/// Error type for backup operations.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Restore was requested for a collection with no backups at all.
    #[error("no backups found under {0}")]
    NoBackupsFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Per-file restore result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestoreStatus {
    Restored,
    Error,
}

/// Outcome of restoring one backed-up file.
#[derive(Debug, Clone, Serialize)]
pub struct RestoreOutcome {
    /// Path relative to the collection root.
    pub path: String,
    pub status: RestoreStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The backup root of a collection.
pub fn backup_root(collection: &Path) -> PathBuf {
    collection.join(BACKUP_DIR)
}

/// Ensure a backup exists for `relative_path` within `collection`.
///
/// Copies the live file into the backup root only when no backup is present
/// yet; later calls are no-ops, even if the live file has changed in
/// between.
pub fn ensure_backup(collection: &Path, relative_path: &Path) -> Result<(), BackupError> {
    let backup_path = backup_root(collection).join(relative_path);
    if backup_path.exists() {
        return Ok(());
    }

    if let Some(parent) = backup_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(collection.join(relative_path), &backup_path)?;
    Ok(())
}

/// Restore every backed-up file of a collection onto its live counterpart.
///
/// Walks the backup root recursively (nested subfolders included), creating
/// intermediate live directories as needed. A file that fails to copy gets
/// an `error` outcome and the restore continues; a collection with no backup
/// root, or an empty one, fails the whole call with
/// [`BackupError::NoBackupsFound`].
pub fn restore_all(collection: &Path) -> Result<Vec<RestoreOutcome>, BackupError> {
    let root = backup_root(collection);
    if !root.is_dir() {
        return Err(BackupError::NoBackupsFound(root));
    }

    let mut outcomes = Vec::new();
    restore_dir(&root, collection, Path::new(""), &mut outcomes)?;

    if outcomes.is_empty() {
        return Err(BackupError::NoBackupsFound(root));
    }
    Ok(outcomes)
}

fn restore_dir(
    backup_dir: &Path,
    collection: &Path,
    relative: &Path,
    outcomes: &mut Vec<RestoreOutcome>,
) -> Result<(), BackupError> {
    let mut entries: Vec<fs::DirEntry> =
        fs::read_dir(backup_dir)?.collect::<Result<_, io::Error>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let rel = relative.join(entry.file_name());
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            restore_dir(&entry.path(), collection, &rel, outcomes)?;
            continue;
        }

        let live = collection.join(&rel);
        let result = live
            .parent()
            .map(fs::create_dir_all)
            .transpose()
            .and_then(|_| fs::copy(entry.path(), &live));

        outcomes.push(match result {
            Ok(_) => RestoreOutcome {
                path: rel.display().to_string(),
                status: RestoreStatus::Restored,
                message: None,
            },
            Err(e) => RestoreOutcome {
                path: rel.display().to_string(),
                status: RestoreStatus::Error,
                message: Some(e.to_string()),
            },
        });
    }
    Ok(())
}
