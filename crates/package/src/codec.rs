//! Package codec: on-disk CSIP layout to and from [`InformationPackage`]

use crate::fixity::{digest_file, mime_type};
use crate::mets::{read_mets, write_mets, FileRef, ManifestInput, MdRef, MdSection};
use crate::model::InformationPackage;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use csip_errors::{BuildError, Error, PackageError, StorageError};
use csip_types::layout::{self, METS_FILE};
use csip_types::{ContentType, IpFile, MetadataRecord, PackageType};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Reads and writes information packages
#[async_trait]
pub trait PackageCodec: Send + Sync {
    /// Unpack `archive` into `extraction_dir` and read the package found there
    ///
    /// # Errors
    ///
    /// Returns a package format error if the archive holds no readable
    /// manifest, the manifest is malformed, references missing files, or
    /// declares a type other than `expected`.
    async fn parse(
        &self,
        archive: &Path,
        extraction_dir: &Path,
        expected: PackageType,
    ) -> Result<InformationPackage, Error>;

    /// Write `<target_dir>/<id>/` declaring the package's own type
    ///
    /// # Errors
    ///
    /// See [`PackageCodec::build_as`].
    async fn build(
        &self,
        package: &InformationPackage,
        target_dir: &Path,
    ) -> Result<PathBuf, Error> {
        self.build_as(package, target_dir, package.package_type)
            .await
    }

    /// Write `<target_dir>/<id>/` declaring `declared_type` in the manifest
    ///
    /// # Errors
    ///
    /// Returns a build error if a referenced file is unreadable, the schema
    /// set is empty, or two entries would share a name. Nothing is left at
    /// `<target_dir>/<id>` on failure.
    async fn build_as(
        &self,
        package: &InformationPackage,
        target_dir: &Path,
        declared_type: PackageType,
    ) -> Result<PathBuf, Error>;
}

/// E-ARK CSIP layout with a METS 1.12 manifest
#[derive(Debug, Clone, Copy, Default)]
pub struct EarkCodec;

impl EarkCodec {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PackageCodec for EarkCodec {
    async fn parse(
        &self,
        archive: &Path,
        extraction_dir: &Path,
        expected: PackageType,
    ) -> Result<InformationPackage, Error> {
        csip_archive::unpack(archive, extraction_dir).await?;
        let root = locate_package_root(extraction_dir).await?;

        let manifest_path = root.join(METS_FILE);
        let xml = fs::read_to_string(&manifest_path).await.map_err(|e| {
            if e.kind() == ErrorKind::InvalidData {
                Error::from(PackageError::InvalidManifest {
                    message: format!("{METS_FILE} is not UTF-8"),
                })
            } else {
                Error::io_with_path(&e, &manifest_path)
            }
        })?;
        let doc = read_mets(&xml)?;

        let found: PackageType = doc.package_type.parse()?;
        if found != expected {
            return Err(PackageError::UnexpectedType {
                expected: expected.to_string(),
                found: found.to_string(),
            }
            .into());
        }

        let mut package = InformationPackage::new(doc.obj_id, found).with_profile(doc.profile);
        if let Some(content_type) = doc.content_type.as_deref() {
            package.content_type = ContentType::from(content_type);
        }
        package.base_path = Some(root.clone());

        for md_ref in &doc.descriptive {
            let record = resolve_record(&root, layout::DESCRIPTIVE_DIR, md_ref).await?;
            package.add_descriptive_metadata(record);
        }
        for md_ref in &doc.preservation {
            let record = resolve_record(&root, layout::PRESERVATION_DIR, md_ref).await?;
            package.add_preservation_metadata(record);
        }
        for href in &doc.schemas {
            package.add_schema(IpFile::new(resolve_href(&root, href).await?));
        }
        for href in &doc.submissions {
            package.add_submission(IpFile::new(resolve_href(&root, href).await?));
        }
        for agent in doc.agents {
            package.add_agent(agent);
        }

        tracing::debug!(
            id = %package.id,
            package_type = %package.package_type,
            root = %root.display(),
            "parsed package"
        );
        Ok(package)
    }

    async fn build_as(
        &self,
        package: &InformationPackage,
        target_dir: &Path,
        declared_type: PackageType,
    ) -> Result<PathBuf, Error> {
        validate(package)?;

        fs::create_dir_all(target_dir)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, target_dir))?;
        let final_dir = target_dir.join(&package.id);
        if fs::try_exists(&final_dir).await? {
            return Err(StorageError::AlreadyExists {
                path: final_dir.display().to_string(),
            }
            .into());
        }

        let partial = target_dir.join(format!(".{}.{}.partial", package.id, Uuid::new_v4()));
        let written = match write_tree(package, &partial, declared_type).await {
            Ok(()) => fs::rename(&partial, &final_dir)
                .await
                .map_err(|e| Error::from(StorageError::AtomicRenameFailed {
                    message: e.to_string(),
                })),
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            if let Err(cleanup) = csip_staging::release(&partial).await {
                tracing::warn!(path = %partial.display(), error = %cleanup, "partial build left behind");
            }
            return Err(e);
        }

        tracing::debug!(
            id = %package.id,
            declared = %declared_type,
            path = %final_dir.display(),
            "built package"
        );
        Ok(final_dir)
    }
}

/// The directory holding the manifest: the extraction dir itself, or its
/// single child directory
async fn locate_package_root(extraction_dir: &Path) -> Result<PathBuf, Error> {
    if fs::try_exists(extraction_dir.join(METS_FILE)).await? {
        return Ok(extraction_dir.to_path_buf());
    }

    let mut children = Vec::new();
    let mut entries = fs::read_dir(extraction_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            children.push(entry.path());
        }
    }

    if let [only] = children.as_slice() {
        if fs::try_exists(only.join(METS_FILE)).await? {
            return Ok(only.clone());
        }
    }

    Err(PackageError::MissingManifest {
        path: extraction_dir.join(METS_FILE).display().to_string(),
    }
    .into())
}

/// Map a manifest href onto the package root, rejecting escapes
async fn resolve_href(root: &Path, href: &str) -> Result<PathBuf, Error> {
    let relative = Path::new(href.trim_start_matches("./"));
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if href.is_empty() || escapes {
        return Err(PackageError::PathTraversal {
            entry: href.to_string(),
        }
        .into());
    }

    let path = root.join(relative);
    if !fs::try_exists(&path).await? {
        return Err(PackageError::MissingFile {
            href: href.to_string(),
        }
        .into());
    }
    Ok(path)
}

/// Resolve a metadata reference, keeping any folders below `section_dir`
async fn resolve_record(
    root: &Path,
    section_dir: &str,
    md_ref: &MdRef,
) -> Result<MetadataRecord, Error> {
    let path = resolve_href(root, &md_ref.href).await?;
    let file = IpFile::new(path).with_folders(section_folders(section_dir, &md_ref.href));
    let mut record = MetadataRecord::new(file, md_ref.kind.clone());
    if let Some(id) = &md_ref.section_id {
        record.id.clone_from(id);
    }
    Ok(record)
}

/// Folders between `section_dir` and the file name of `href`
///
/// A reference outside `section_dir` is placed directly in the section.
fn section_folders(section_dir: &str, href: &str) -> Vec<String> {
    let components: Vec<&str> = href
        .split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .collect();
    let prefix: Vec<&str> = section_dir.split('/').collect();

    match components.split_last() {
        Some((_, dirs)) if dirs.starts_with(&prefix) => dirs[prefix.len()..]
            .iter()
            .map(|c| (*c).to_string())
            .collect(),
        _ => Vec::new(),
    }
}

fn validate(package: &InformationPackage) -> Result<(), Error> {
    if !is_plain_name(&package.id) {
        return Err(BuildError::Failed {
            message: format!("package id {:?} is not a usable directory name", package.id),
        }
        .into());
    }
    if package.schemas().is_empty() {
        return Err(BuildError::NoSchemas.into());
    }

    let mut seen = HashSet::new();
    for entry in package.entry_names() {
        if !entry.split('/').all(is_plain_name) {
            return Err(BuildError::Failed {
                message: format!("invalid entry name {entry:?}"),
            }
            .into());
        }
        if !seen.insert(entry.clone()) {
            return Err(BuildError::DuplicateEntry { entry }.into());
        }
    }
    Ok(())
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

async fn write_tree(
    package: &InformationPackage,
    root: &Path,
    declared_type: PackageType,
) -> Result<(), Error> {
    fs::create_dir(root)
        .await
        .map_err(|e| StorageError::from_io_with_path(&e, root))?;

    let created = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut descriptive = Vec::new();
    for record in &package.descriptive_metadata {
        let file = copy_into(root, layout::DESCRIPTIVE_DIR, &record.file).await?;
        descriptive.push(MdSection { record, file });
    }
    let mut preservation = Vec::new();
    for record in &package.preservation_metadata {
        let file = copy_into(root, layout::PRESERVATION_DIR, &record.file).await?;
        preservation.push(MdSection { record, file });
    }
    let mut schemas = Vec::new();
    for schema in package.schemas() {
        schemas.push(copy_into(root, layout::SCHEMAS_DIR, schema).await?);
    }
    let mut submissions = Vec::new();
    for submission in &package.submissions {
        submissions.push(copy_into(root, layout::SUBMISSION_DIR, submission).await?);
    }

    let manifest = write_mets(&ManifestInput {
        package,
        declared_type,
        created,
        descriptive,
        preservation,
        schemas,
        submissions,
    })?;
    fs::write(root.join(METS_FILE), manifest).await?;
    Ok(())
}

/// Copy `file` to `<root>/<dir>/<folders>/<name>` and compute its fixity
async fn copy_into(root: &Path, dir: &str, file: &IpFile) -> Result<FileRef, Error> {
    let metadata = fs::metadata(&file.path)
        .await
        .map_err(|e| BuildError::UnreadableFile {
            path: file.path.display().to_string(),
            message: e.to_string(),
        })?;
    if !metadata.is_file() {
        return Err(BuildError::UnreadableFile {
            path: file.path.display().to_string(),
            message: "not a regular file".to_string(),
        }
        .into());
    }

    let dest_dir = file
        .folders
        .iter()
        .fold(root.join(dir), |acc, folder| acc.join(folder));
    fs::create_dir_all(&dest_dir).await?;
    let dest = dest_dir.join(&file.name);
    fs::copy(&file.path, &dest)
        .await
        .map_err(|e| BuildError::UnreadableFile {
            path: file.path.display().to_string(),
            message: e.to_string(),
        })?;

    Ok(FileRef {
        id: format!("uuid-{}", Uuid::new_v4()),
        href: layout::entry(dir, &file.relative_path()),
        digest: digest_file(&dest).await?,
        mime: mime_type(&file.name),
    })
}
