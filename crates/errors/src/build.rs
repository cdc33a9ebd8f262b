//! Package build error types
//!
//! These indicate a structural inconsistency while serializing a package
//! model, and are treated as defects rather than bad input.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum BuildError {
    #[error("build failed: {message}")]
    Failed { message: String },

    #[error("referenced file unreadable: {path}: {message}")]
    UnreadableFile { path: String, message: String },

    #[error("package has no schemas")]
    NoSchemas,

    #[error("duplicate entry in package: {entry}")]
    DuplicateEntry { entry: String },

    #[error("manifest serialization failed: {message}")]
    ManifestWrite { message: String },

    #[error("manifest {path} does not contain {marker}")]
    ManifestPatchTargetMissing { path: String, marker: String },

    #[error("resource not found: {name}")]
    ResourceNotFound { name: String },

    #[error("metadata synthesis failed: {message}")]
    MetadataSynthesis { message: String },
}

impl UserFacingError for BuildError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ManifestPatchTargetMissing { .. } => {
                Some("The manifest writer output changed; the type patch no longer applies.")
            }
            Self::ResourceNotFound { .. } => {
                Some("Check the schema override directory in the configuration.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Failed { .. } => "build.failed",
            Self::UnreadableFile { .. } => "build.unreadable_file",
            Self::NoSchemas => "build.no_schemas",
            Self::DuplicateEntry { .. } => "build.duplicate_entry",
            Self::ManifestWrite { .. } => "build.manifest_write",
            Self::ManifestPatchTargetMissing { .. } => "build.manifest_patch_target_missing",
            Self::ResourceNotFound { .. } => "build.resource_not_found",
            Self::MetadataSynthesis { .. } => "build.metadata_synthesis",
        };
        Some(code)
    }
}
