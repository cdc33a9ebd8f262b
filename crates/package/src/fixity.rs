//! File size, checksum and MIME type for manifest file references

use csip_errors::{BuildError, Error};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Size of chunks for streaming hash computation
const CHUNK_SIZE: usize = 64 * 1024; // 64KB

/// Fixity information recorded for every referenced file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    pub size: u64,
    /// Uppercase hex SHA-256
    pub sha256: String,
}

/// Stream a file through SHA-256
///
/// # Errors
/// Returns an error if the file cannot be opened or read.
pub async fn digest_file(path: &Path) -> Result<FileDigest, Error> {
    let mut file = File::open(path)
        .await
        .map_err(|e| BuildError::UnreadableFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0; CHUNK_SIZE];
    let mut size = 0u64;

    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
        size += n as u64;
    }

    Ok(FileDigest {
        size,
        sha256: hex::encode_upper(hasher.finalize()),
    })
}

/// MIME type declared for a file, by extension
#[must_use]
pub fn mime_type(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());

    match extension.as_deref() {
        Some("xml" | "xsd") => "text/xml",
        Some("zip") => "application/zip",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("tif" | "tiff") => "image/tiff",
        _ => "application/octet-stream",
    }
}
