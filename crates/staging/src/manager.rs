//! Staging root creation

use crate::root::StagingRoot;
use csip_errors::{Error, StorageError};
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Creates staging roots under a base directory
#[derive(Debug, Clone)]
pub struct StagingManager {
    /// Base path for staging roots
    base_path: PathBuf,
}

impl StagingManager {
    /// Create a new staging manager
    ///
    /// # Errors
    ///
    /// Returns an error if the staging base directory cannot be created
    pub async fn new(base_path: PathBuf) -> Result<Self, Error> {
        fs::create_dir_all(&base_path)
            .await
            .map_err(|e| StorageError::StagingFailed {
                path: base_path.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(Self { base_path })
    }

    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Create a new, empty, uniquely named staging root
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or its
    /// permissions cannot be restricted.
    pub async fn acquire(&self, prefix: &str) -> Result<StagingRoot, Error> {
        let staging_id = Uuid::new_v4();
        let path = create_unique_dir(&self.base_path, prefix, staging_id).await?;
        tracing::debug!(path = %path.display(), "acquired staging root");
        Ok(StagingRoot::new(path, staging_id))
    }
}

/// Create `<parent>/<prefix>-<id>` with owner-only permissions
pub(crate) async fn create_unique_dir(
    parent: &Path,
    prefix: &str,
    id: Uuid,
) -> Result<PathBuf, Error> {
    let path = parent.join(format!("{prefix}-{id}"));

    // create_dir, not create_dir_all: an existing directory is a collision
    fs::create_dir(&path)
        .await
        .map_err(|e| StorageError::StagingFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    // Set restrictive permissions on Unix systems
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o700);
        fs::set_permissions(&path, permissions)
            .await
            .map_err(|e| StorageError::StagingFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
    }

    Ok(path)
}
