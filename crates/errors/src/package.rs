//! Package-format error types
//!
//! Raised when an input archive does not parse as a valid information
//! package of the expected type and profile.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum PackageError {
    #[error("invalid archive: {message}")]
    InvalidArchive { message: String },

    #[error("archive entry escapes the extraction directory: {entry}")]
    PathTraversal { entry: String },

    #[error("missing manifest: {path}")]
    MissingManifest { path: String },

    #[error("invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("missing manifest attribute: {attribute}")]
    MissingAttribute { attribute: String },

    #[error("unexpected package type: expected {expected}, found {found}")]
    UnexpectedType { expected: String, found: String },

    #[error("unknown package type: {value}")]
    UnknownType { value: String },

    #[error("referenced file missing from package: {href}")]
    MissingFile { href: String },
}

impl UserFacingError for PackageError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnexpectedType { .. } => {
                Some("Use the converter that matches the input package type.")
            }
            Self::InvalidArchive { .. } | Self::PathTraversal { .. } => {
                Some("Re-export the package as a plain zip archive.")
            }
            _ => Some("Validate the input package against the E-ARK profile."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InvalidArchive { .. } => "package.invalid_archive",
            Self::PathTraversal { .. } => "package.path_traversal",
            Self::MissingManifest { .. } => "package.missing_manifest",
            Self::InvalidManifest { .. } => "package.invalid_manifest",
            Self::MissingAttribute { .. } => "package.missing_attribute",
            Self::UnexpectedType { .. } => "package.unexpected_type",
            Self::UnknownType { .. } => "package.unknown_type",
            Self::MissingFile { .. } => "package.missing_file",
        };
        Some(code)
    }
}
