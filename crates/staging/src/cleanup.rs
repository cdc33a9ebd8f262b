//! Race-tolerant recursive deletion

use csip_errors::{Error, StorageError};
use std::io::ErrorKind;
use std::path::Path;
use walkdir::WalkDir;

/// Recursively delete `path` on the blocking pool
///
/// A missing path is a successful no-op.
///
/// # Errors
///
/// Returns an error if any entry could not be removed.
pub async fn release(path: &Path) -> Result<(), Error> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || remove_tree(&path))
        .await
        .map_err(|e| Error::internal(format!("cleanup task failed: {e}")))?
}

/// Recursively delete `root`, ignoring entries that vanish concurrently
///
/// Succeeds only if nothing is left afterwards.
///
/// # Errors
///
/// Returns [`StorageError::CleanupIncomplete`] listing what could not be
/// removed.
pub fn remove_tree(root: &Path) -> Result<(), Error> {
    let metadata = match std::fs::symlink_metadata(root) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(StorageError::from_io_with_path(&e, root).into()),
    };

    if !metadata.is_dir() {
        return ignore_missing(std::fs::remove_file(root))
            .map_err(|e| StorageError::from_io_with_path(&e, root).into());
    }

    let mut failures = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                if e.io_error().map(std::io::Error::kind) != Some(ErrorKind::NotFound) {
                    failures.push(e.to_string());
                }
                continue;
            }
        };
        let result = if entry.file_type().is_dir() {
            std::fs::remove_dir(entry.path())
        } else {
            std::fs::remove_file(entry.path())
        };
        if let Err(e) = ignore_missing(result) {
            failures.push(format!("{}: {e}", entry.path().display()));
        }
    }

    if failures.is_empty() && !root.exists() {
        Ok(())
    } else {
        if failures.is_empty() {
            failures.push("root still present".to_string());
        }
        Err(StorageError::CleanupIncomplete {
            path: root.display().to_string(),
            message: failures.join("; "),
        }
        .into())
    }
}

fn ignore_missing(result: std::io::Result<()>) -> std::io::Result<()> {
    match result {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
