//! Package-related type definitions

use csip_errors::PackageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// OAIS package type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PackageType {
    Sip,
    Aip,
    Dip,
}

impl PackageType {
    /// The value written to the manifest's package type attribute
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sip => "SIP",
            Self::Aip => "AIP",
            Self::Dip => "DIP",
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageType {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "SIP" => Ok(Self::Sip),
            "AIP" => Ok(Self::Aip),
            "DIP" => Ok(Self::Dip),
            other => Err(PackageError::UnknownType {
                value: other.to_string(),
            }),
        }
    }
}

/// Content information type declared in the manifest `TYPE` attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContentType {
    #[default]
    Mixed,
    /// Any other declared value, kept verbatim
    Other(String),
}

impl ContentType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Mixed => "Mixed",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ContentType {
    fn from(value: &str) -> Self {
        if value.eq_ignore_ascii_case("mixed") {
            Self::Mixed
        } else {
            Self::Other(value.to_string())
        }
    }
}

/// A file on disk and the name it takes inside a package
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpFile {
    pub path: PathBuf,
    pub name: String,
    /// Folders between the section directory and the file
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub folders: Vec<String>,
}

impl IpFile {
    /// Use the file's own name inside the package
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            folders: Vec::new(),
        }
    }

    /// Store `path` under a different name inside the package
    #[must_use]
    pub fn with_name(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            folders: Vec::new(),
        }
    }

    /// Place the file in nested folders under its section directory
    #[must_use]
    pub fn with_folders<I, S>(mut self, folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.folders = folders.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `folders/.../name`, relative to the section directory
    #[must_use]
    pub fn relative_path(&self) -> String {
        let mut parts: Vec<&str> = self.folders.iter().map(String::as_str).collect();
        parts.push(&self.name);
        parts.join("/")
    }
}
