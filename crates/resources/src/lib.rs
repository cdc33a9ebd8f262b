#![deny(clippy::pedantic, unsafe_code)]

//! Bundled schema resources for csip-convert
//!
//! The schema files a package must carry when its source has none are
//! compiled into the binary. The bundled files are abbreviated: they keep
//! the official file names and target namespaces but only the declarations
//! the produced manifests use. A directory override lets deployments ship
//! the official upstream files instead.

use csip_errors::{BuildError, Error, StorageError};
use csip_types::IpFile;
use std::path::{Path, PathBuf};
use tokio::fs;

const EMBEDDED: &[(&str, &str)] = &[
    (
        "DILCISExtensionMETS.xsd",
        include_str!("../schemas/DILCISExtensionMETS.xsd"),
    ),
    (
        "DILCISExtensionSIPMETS.xsd",
        include_str!("../schemas/DILCISExtensionSIPMETS.xsd"),
    ),
    ("mets1_12.xsd", include_str!("../schemas/mets1_12.xsd")),
    ("xlink.xsd", include_str!("../schemas/xlink.xsd")),
    ("premis.xsd", include_str!("../schemas/premis.xsd")),
];

/// Look up an embedded schema by file name
#[must_use]
pub fn embedded_schema(name: &str) -> Option<&'static str> {
    EMBEDDED
        .iter()
        .find(|(file, _)| *file == name)
        .map(|(_, content)| *content)
}

/// Names of every embedded schema
pub fn embedded_names() -> impl Iterator<Item = &'static str> {
    EMBEDDED.iter().map(|(name, _)| *name)
}

/// Source of schema files, embedded or from an override directory
#[derive(Debug, Clone, Default)]
pub struct SchemaResources {
    override_dir: Option<PathBuf>,
}

impl SchemaResources {
    /// Serve only the embedded copies
    #[must_use]
    pub fn embedded() -> Self {
        Self::default()
    }

    /// Prefer files found in `dir`, falling back to the embedded copies
    #[must_use]
    pub fn with_override_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            override_dir: Some(dir.into()),
        }
    }

    /// Directory searched before the embedded copies, if any
    #[must_use]
    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    /// Copy the schema `name` into `dir` and return the written path
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is neither in the override directory
    /// nor embedded, or if it cannot be written.
    pub async fn copy_resource_schema(&self, name: &str, dir: &Path) -> Result<PathBuf, Error> {
        let dest = dir.join(name);

        if let Some(override_dir) = &self.override_dir {
            let candidate = override_dir.join(name);
            if fs::try_exists(&candidate).await.unwrap_or(false) {
                tracing::debug!(schema = name, source = %candidate.display(), "copying schema override");
                fs::copy(&candidate, &dest)
                    .await
                    .map_err(|e| StorageError::from_io_with_path(&e, &candidate))?;
                return Ok(dest);
            }
        }

        let content = embedded_schema(name).ok_or_else(|| BuildError::ResourceNotFound {
            name: name.to_string(),
        })?;
        fs::write(&dest, content)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &dest))?;
        Ok(dest)
    }

    /// Copy every schema in `names` into `dir`
    ///
    /// # Errors
    ///
    /// Returns the first copy failure.
    pub async fn copy_schemas(&self, names: &[String], dir: &Path) -> Result<Vec<IpFile>, Error> {
        let mut files = Vec::with_capacity(names.len());
        for name in names {
            let path = self.copy_resource_schema(name, dir).await?;
            files.push(IpFile::with_name(path, name.clone()));
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_embedded_lookup() {
        assert!(embedded_schema("mets1_12.xsd").is_some());
        assert!(embedded_schema("premis.xsd").is_some());
        assert!(embedded_schema("nope.xsd").is_none());
        assert_eq!(embedded_names().count(), 5);
    }

    #[tokio::test]
    async fn test_copy_embedded() {
        let temp = tempdir().unwrap();
        let resources = SchemaResources::embedded();
        let path = resources
            .copy_resource_schema("xlink.xsd", temp.path())
            .await
            .unwrap();
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(content.contains("http://www.w3.org/1999/xlink"));
    }

    #[tokio::test]
    async fn test_override_dir_wins() {
        let temp = tempdir().unwrap();
        let override_dir = temp.path().join("official");
        let out = temp.path().join("out");
        tokio::fs::create_dir_all(&override_dir).await.unwrap();
        tokio::fs::create_dir_all(&out).await.unwrap();
        tokio::fs::write(override_dir.join("xlink.xsd"), "<official/>")
            .await
            .unwrap();

        let resources = SchemaResources::with_override_dir(&override_dir);
        assert_eq!(resources.override_dir(), Some(override_dir.as_path()));
        assert!(SchemaResources::embedded().override_dir().is_none());
        let path = resources
            .copy_resource_schema("xlink.xsd", &out)
            .await
            .unwrap();
        assert_eq!(tokio::fs::read_to_string(path).await.unwrap(), "<official/>");

        // not overridden, falls back to the embedded copy
        let path = resources
            .copy_resource_schema("mets1_12.xsd", &out)
            .await
            .unwrap();
        assert!(tokio::fs::read_to_string(path)
            .await
            .unwrap()
            .contains("http://www.loc.gov/METS/"));
    }

    #[tokio::test]
    async fn test_unknown_schema() {
        let temp = tempdir().unwrap();
        let err = SchemaResources::embedded()
            .copy_resource_schema("missing.xsd", temp.path())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Build(BuildError::ResourceNotFound { .. })
        ));
    }
}
