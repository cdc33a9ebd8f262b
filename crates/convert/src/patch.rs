//! In-place rewrite of the manifest's package type

use csip_errors::{BuildError, Error};
use csip_types::layout::{package_type_marker, METS_FILE};
use csip_types::PackageType;
use std::path::Path;
use tokio::fs;

/// Replace every `csip:OAISPACKAGETYPE="<from>"` in
/// `<built_dir>/<id>/METS.xml` with the `<to>` form
///
/// Returns the number of replacements.
///
/// # Errors
///
/// Returns [`BuildError::ManifestPatchTargetMissing`] if the manifest does
/// not contain the `from` marker, or an I/O error if it cannot be read or
/// written.
pub async fn patch_package_type(
    built_dir: &Path,
    id: &str,
    from: PackageType,
    to: PackageType,
) -> Result<usize, Error> {
    let path = built_dir.join(id).join(METS_FILE);
    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| Error::io_with_path(&e, &path))?;

    let marker = package_type_marker(from);
    let count = content.matches(&marker).count();
    if count == 0 {
        return Err(BuildError::ManifestPatchTargetMissing {
            path: path.display().to_string(),
            marker,
        }
        .into());
    }

    let patched = content.replace(&marker, &package_type_marker(to));
    fs::write(&path, patched)
        .await
        .map_err(|e| Error::io_with_path(&e, &path))?;

    tracing::debug!(path = %path.display(), %from, %to, count, "patched package type");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn manifest(dir: &Path, content: &str) {
        fs::create_dir_all(dir.join("pkg")).await.unwrap();
        fs::write(dir.join("pkg").join(METS_FILE), content)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_patch_replaces_marker() {
        let temp = tempdir().unwrap();
        manifest(
            temp.path(),
            r#"<mets:metsHdr csip:OAISPACKAGETYPE="AIP" RECORDSTATUS="NEW"/>"#,
        )
        .await;

        let count = patch_package_type(temp.path(), "pkg", PackageType::Aip, PackageType::Dip)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let patched = fs::read_to_string(temp.path().join("pkg/METS.xml"))
            .await
            .unwrap();
        assert_eq!(
            patched,
            r#"<mets:metsHdr csip:OAISPACKAGETYPE="DIP" RECORDSTATUS="NEW"/>"#
        );
    }

    #[tokio::test]
    async fn test_patch_replaces_every_occurrence() {
        let temp = tempdir().unwrap();
        manifest(
            temp.path(),
            r#"<a csip:OAISPACKAGETYPE="AIP"/><b csip:OAISPACKAGETYPE="AIP"/>"#,
        )
        .await;

        let count = patch_package_type(temp.path(), "pkg", PackageType::Aip, PackageType::Dip)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_patch_without_marker_fails() {
        let temp = tempdir().unwrap();
        let original = r#"<mets:metsHdr csip:OAISPACKAGETYPE="SIP"/>"#;
        manifest(temp.path(), original).await;

        let err = patch_package_type(temp.path(), "pkg", PackageType::Aip, PackageType::Dip)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Build(BuildError::ManifestPatchTargetMissing { .. })
        ));

        // untouched
        let content = fs::read_to_string(temp.path().join("pkg/METS.xml"))
            .await
            .unwrap();
        assert_eq!(content, original);
    }

    #[tokio::test]
    async fn test_patch_missing_manifest_is_io() {
        let temp = tempdir().unwrap();
        let err = patch_package_type(temp.path(), "nope", PackageType::Aip, PackageType::Dip)
            .await
            .unwrap_err();
        assert!(err.is_io());
    }
}
