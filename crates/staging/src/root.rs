//! A single staging root and its cleanup guard

use crate::cleanup::{release, remove_tree};
use crate::manager::create_unique_dir;
use csip_errors::Error;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// An exclusively owned staging directory tree
///
/// Dropping an unreleased root deletes it synchronously, so every exit path
/// of the owning scope cleans up, including early `?` returns and panics.
#[derive(Debug)]
pub struct StagingRoot {
    path: PathBuf,
    staging_id: Uuid,
    released: bool,
}

impl StagingRoot {
    pub(crate) fn new(path: PathBuf, staging_id: Uuid) -> Self {
        Self {
            path,
            staging_id,
            released: false,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn staging_id(&self) -> Uuid {
        self.staging_id
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Create a uniquely named child directory, removed with the root
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn subdir(&self, prefix: &str) -> Result<PathBuf, Error> {
        create_unique_dir(&self.path, prefix, Uuid::new_v4()).await
    }

    /// Recursively delete the root
    ///
    /// Calling this again after success is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if some entry could not be removed; the drop guard
    /// stays armed in that case.
    pub async fn release(&mut self) -> Result<(), Error> {
        if self.released {
            return Ok(());
        }
        release(&self.path).await?;
        self.released = true;
        tracing::debug!(path = %self.path.display(), "released staging root");
        Ok(())
    }
}

impl Drop for StagingRoot {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        // Synchronous so cleanup also happens without a running runtime
        if let Err(e) = remove_tree(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "staging cleanup failed");
        } else {
            tracing::debug!(path = %self.path.display(), "released staging root on drop");
        }
    }
}
