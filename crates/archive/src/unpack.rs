//! Zip to directory

use crate::read_error;
use csip_errors::{Error, PackageError, StorageError};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Extract `archive` into `dest`, returning the names of extracted files
///
/// # Errors
///
/// Returns a package error if the archive is malformed or an entry would
/// escape `dest`, and a storage error for read or write faults.
pub async fn unpack(archive: &Path, dest: &Path) -> Result<Vec<String>, Error> {
    let archive = archive.to_path_buf();
    let dest = dest.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let file = File::open(&archive).map_err(|e| StorageError::from_io_with_path(&e, &archive))?;
        let entries = unpack_reader(BufReader::new(file), &dest).map_err(|e| match e {
            Error::Package(PackageError::InvalidArchive { message }) => {
                PackageError::InvalidArchive {
                    message: format!("{}: {message}", archive.display()),
                }
                .into()
            }
            other => other,
        })?;
        tracing::debug!(
            archive = %archive.display(),
            dest = %dest.display(),
            entries = entries.len(),
            "unpacked archive"
        );
        Ok::<_, Error>(entries)
    })
    .await
    .map_err(|e| Error::internal(format!("extract task failed: {e}")))?
}

/// Extract a zip read from `reader` into `dest`
///
/// # Errors
///
/// See [`unpack`].
pub fn unpack_reader<R: Read + Seek>(reader: R, dest: &Path) -> Result<Vec<String>, Error> {
    std::fs::create_dir_all(dest).map_err(|e| StorageError::from_io_with_path(&e, dest))?;

    let mut archive = ZipArchive::new(reader).map_err(|e| read_error(e, dest))?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(|e| read_error(e, dest))?;

        // Security check: ensure path doesn't escape destination
        let Some(relative) = file.enclosed_name() else {
            return Err(PackageError::PathTraversal {
                entry: file.name().to_string(),
            }
            .into());
        };
        let outpath = dest.join(relative);

        if file.is_dir() {
            std::fs::create_dir_all(&outpath)
                .map_err(|e| StorageError::from_io_with_path(&e, &outpath))?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::from_io_with_path(&e, parent))?;
        }
        let mut outfile =
            File::create(&outpath).map_err(|e| StorageError::from_io_with_path(&e, &outpath))?;
        std::io::copy(&mut file, &mut outfile).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                // corrupt compressed stream
                Error::from(PackageError::InvalidArchive {
                    message: format!("{}: {e}", file.name()),
                })
            } else {
                StorageError::from_io_with_path(&e, &outpath).into()
            }
        })?;
        entries.push(file.name().to_string());
    }

    Ok(entries)
}

/// Names of the file entries in `archive`, without extracting
///
/// # Errors
///
/// Returns an error if the archive cannot be opened or is malformed.
pub async fn list_entries(archive: &Path) -> Result<Vec<String>, Error> {
    let archive = archive.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let file = File::open(&archive).map_err(|e| StorageError::from_io_with_path(&e, &archive))?;
        let zip = ZipArchive::new(BufReader::new(file)).map_err(|e| read_error(e, &archive))?;
        Ok::<_, Error>(
            zip.file_names()
                .filter(|name| !name.ends_with('/'))
                .map(ToString::to_string)
                .collect(),
        )
    })
    .await
    .map_err(|e| Error::internal(format!("list task failed: {e}")))?
}
