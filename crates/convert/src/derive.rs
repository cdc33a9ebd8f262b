//! Derivation steps shared by both conversions

use crate::context::ConvertCtx;
use csip_errors::{BuildError, Error, PackageError};
use csip_package::InformationPackage;
use csip_types::layout::SCHEMAS_DIR;
use csip_types::{new_package_id, IpFile};
use std::path::{Path, PathBuf};
use tokio::fs;

/// A fresh identifier guaranteed to differ from `source_id`
pub(crate) fn fresh_id(source_id: &str) -> String {
    loop {
        let id = new_package_id();
        if id != source_id {
            return id;
        }
    }
}

/// Where the parsed source package is staged
pub(crate) fn staged_root(source: &InformationPackage) -> Result<&Path, Error> {
    source.base_path.as_deref().ok_or_else(|| {
        BuildError::Failed {
            message: format!("package {} has no staged location", source.id),
        }
        .into()
    })
}

/// Add the source's `schemas/` files, or the configured defaults when it has none
pub(crate) async fn copy_schemas(
    ctx: &ConvertCtx,
    source_root: &Path,
    work_dir: &Path,
    target: &mut InformationPackage,
) -> Result<(), Error> {
    for schema in list_schema_dir(&source_root.join(SCHEMAS_DIR)).await? {
        target.add_schema(schema);
    }

    if target.schemas().is_empty() {
        let resources_dir = work_dir.join("resources");
        fs::create_dir_all(&resources_dir).await?;
        tracing::debug!(id = %target.id, "source has no schemas, injecting defaults");
        for schema in ctx
            .resources
            .copy_schemas(&ctx.config.schemas.defaults, &resources_dir)
            .await?
        {
            target.add_schema(schema);
        }
    }
    Ok(())
}

/// Regular files directly under `dir`, by name; empty if `dir` is missing
async fn list_schema_dir(dir: &Path) -> Result<Vec<IpFile>, Error> {
    if !fs::try_exists(dir).await? {
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();
    Ok(paths.into_iter().map(IpFile::new).collect())
}

/// Zip the whole staged source package to `<work_dir>/<source-id>.zip`
pub(crate) async fn bundle_source(
    source: &InformationPackage,
    work_dir: &Path,
) -> Result<IpFile, Error> {
    let id = source.id.as_str();
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
        return Err(PackageError::InvalidManifest {
            message: format!("OBJID {id:?} cannot name a submission bundle"),
        }
        .into());
    }

    let bundle = work_dir.join(format!("{id}.zip"));
    csip_archive::pack_to_file(staged_root(source)?, &bundle).await?;
    Ok(IpFile::new(bundle))
}
