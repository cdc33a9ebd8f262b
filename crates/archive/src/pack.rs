//! Directory to zip

use crate::write_error;
use csip_errors::{Error, StorageError};
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// A fully written archive held in memory
#[derive(Debug, Clone)]
pub struct PackedArchive {
    pub bytes: Vec<u8>,
    /// Entry names in the order they were written
    pub entries: Vec<String>,
}

/// Pack `source_dir` into an in-memory zip
///
/// # Errors
///
/// Returns an error if the tree cannot be walked or any file cannot be read.
/// Nothing is returned on failure, so no partial archive can escape.
pub async fn pack(source_dir: &Path) -> Result<PackedArchive, Error> {
    let source_dir = source_dir.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let (cursor, entries) = pack_to_writer(&source_dir, Cursor::new(Vec::new()))?;
        Ok::<_, Error>(PackedArchive {
            bytes: cursor.into_inner(),
            entries,
        })
    })
    .await
    .map_err(|e| Error::internal(format!("pack task failed: {e}")))?
}

/// Pack `source_dir` into the file `dest`
///
/// The archive is written to a hidden sibling file and renamed over `dest`
/// only once complete.
///
/// # Errors
///
/// Returns an error if packing, flushing or the final rename fails. The
/// temporary file is removed on failure.
pub async fn pack_to_file(source_dir: &Path, dest: &Path) -> Result<Vec<String>, Error> {
    let source_dir = source_dir.to_path_buf();
    let dest = dest.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let partial = partial_path(&dest);
        let result = write_file(&source_dir, &partial).and_then(|entries| {
            std::fs::rename(&partial, &dest).map_err(|e| StorageError::AtomicRenameFailed {
                message: format!("{} -> {}: {e}", partial.display(), dest.display()),
            })?;
            Ok(entries)
        });
        if result.is_err() {
            let _ = std::fs::remove_file(&partial);
        }
        result
    })
    .await
    .map_err(|e| Error::internal(format!("pack task failed: {e}")))?
}

fn write_file(source_dir: &Path, partial: &Path) -> Result<Vec<String>, Error> {
    let file = File::create(partial).map_err(|e| StorageError::from_io_with_path(&e, partial))?;
    let (writer, entries) = pack_to_writer(source_dir, BufWriter::new(file))?;
    let file = writer
        .into_inner()
        .map_err(|e| StorageError::from_io_with_path(e.error(), partial))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io_with_path(&e, partial))?;
    Ok(entries)
}

fn partial_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archive".to_string());
    dest.with_file_name(format!(".{name}.{}.partial", uuid::Uuid::new_v4()))
}

/// Pack `source_dir` into `writer`, returning the writer and entry names
///
/// Files are visited sorted by name so equal trees give equal archives.
/// Timestamps and permissions are fixed for the same reason.
///
/// # Errors
///
/// Returns an error on any walk, read or write failure.
pub fn pack_to_writer<W: Write + Seek>(
    source_dir: &Path,
    writer: W,
) -> Result<(W, Vec<String>), Error> {
    let files = collect_files(source_dir)?;
    let mut zip = ZipWriter::new(writer);
    let mut entries = Vec::with_capacity(files.len());

    for (path, name) in files {
        let mut file = File::open(&path).map_err(|e| StorageError::from_io_with_path(&e, &path))?;
        let len = file
            .metadata()
            .map_err(|e| StorageError::from_io_with_path(&e, &path))?
            .len();

        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644)
            .large_file(len >= u64::from(u32::MAX));

        zip.start_file(name.as_str(), options)
            .map_err(|e| write_error(e, &path))?;
        std::io::copy(&mut file, &mut zip).map_err(|e| StorageError::from_io_with_path(&e, &path))?;
        entries.push(name);
    }

    let writer = zip.finish().map_err(|e| write_error(e, source_dir))?;
    tracing::debug!(
        source = %source_dir.display(),
        entries = entries.len(),
        "packed archive"
    );
    Ok((writer, entries))
}

fn collect_files(source_dir: &Path) -> Result<Vec<(PathBuf, String)>, Error> {
    let mut files = Vec::new();

    for entry in WalkDir::new(source_dir)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| StorageError::IoError {
            message: format!("walking {}: {e}", source_dir.display()),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|e| Error::internal(format!("walk escaped {}: {e}", source_dir.display())))?;
        files.push((entry.path().to_path_buf(), entry_name(relative)?));
    }

    Ok(files)
}

/// Archive entry name for a relative path, always `/`-separated
fn entry_name(relative: &Path) -> Result<String, Error> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| StorageError::IoError {
                    message: format!("non UTF-8 file name: {}", relative.display()),
                })?;
                parts.push(part);
            }
            _ => {
                return Err(Error::internal(format!(
                    "unexpected path component in {}",
                    relative.display()
                )))
            }
        }
    }
    Ok(parts.join("/"))
}
