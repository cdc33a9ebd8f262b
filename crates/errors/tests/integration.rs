//! Integration tests for error types

#[cfg(test)]
mod tests {
    use csip_errors::*;

    #[test]
    fn test_error_conversion() {
        let pkg_err = PackageError::MissingManifest {
            path: "pkg/METS.xml".into(),
        };
        let err: Error = pkg_err.into();
        assert!(matches!(err, Error::Package(_)));
        assert_eq!(err.category(), ErrorCategory::PackageFormat);
    }

    #[test]
    fn test_error_display() {
        let err = StorageError::DiskFull {
            path: "/tmp/staging".into(),
        };
        assert_eq!(err.to_string(), "disk full: /tmp/staging");
    }

    #[test]
    fn test_error_clone() {
        let err = BuildError::NoSchemas;
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let err: Error = io_err.into();
        assert!(err.is_io());
        assert_eq!(err.user_code(), Some("error.io"));
    }

    #[test]
    fn test_io_with_path_maps_kind() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let storage_err = StorageError::from_io_with_path(&io_err, std::path::Path::new("/x"));
        assert!(matches!(storage_err, StorageError::PathNotFound { .. }));
    }

    #[test]
    fn test_patch_failure_is_internal() {
        let err: Error = BuildError::ManifestPatchTargetMissing {
            path: "METS.xml".into(),
            marker: "csip:OAISPACKAGETYPE=\"AIP\"".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(!err.is_retryable());
        assert!(err.user_hint().is_some());
    }
}
