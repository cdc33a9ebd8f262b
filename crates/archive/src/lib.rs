#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Zip container codec for information packages
//!
//! Packing walks a directory tree in a stable order and emits one entry per
//! regular file, named by its `/`-separated path relative to the packed
//! directory. Directory entries are never written. Unpacking reverses this
//! and refuses entries that would land outside the destination.

mod pack;
mod unpack;

pub use pack::{pack, pack_to_file, pack_to_writer, PackedArchive};
pub use unpack::{list_entries, unpack, unpack_reader};

use csip_errors::{Error, PackageError, StorageError};
use std::path::Path;
use zip::result::ZipError;

/// Map a zip error raised while reading `path`
///
/// Storage faults stay I/O errors; anything else means the bytes are not a
/// usable archive.
pub(crate) fn read_error(err: ZipError, path: &Path) -> Error {
    match err {
        ZipError::Io(io) => StorageError::from_io_with_path(&io, path).into(),
        other => PackageError::InvalidArchive {
            message: format!("{}: {other}", path.display()),
        }
        .into(),
    }
}

/// Map a zip error raised while writing an archive of `path`
pub(crate) fn write_error(err: ZipError, path: &Path) -> Error {
    match err {
        ZipError::Io(io) => StorageError::from_io_with_path(&io, path).into(),
        other => Error::internal(format!("zip writer failed for {}: {other}", path.display())),
    }
}
