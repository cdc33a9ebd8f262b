//! Metadata record types

use crate::IpFile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata format, rendered as the METS `MDTYPE` value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataKind {
    Dc,
    Premis,
    Ead,
    /// `MDTYPE="OTHER"` with the given `OTHERMDTYPE`
    Other(String),
}

impl MetadataKind {
    /// Build from the `MDTYPE` and optional `OTHERMDTYPE` attributes
    #[must_use]
    pub fn from_mets(mdtype: &str, other: Option<&str>) -> Self {
        match mdtype {
            "DC" => Self::Dc,
            "PREMIS" => Self::Premis,
            "EAD" => Self::Ead,
            "OTHER" => Self::Other(other.unwrap_or("OTHER").to_string()),
            value => Self::Other(value.to_string()),
        }
    }

    /// Value for the `MDTYPE` attribute
    #[must_use]
    pub fn mdtype(&self) -> &str {
        match self {
            Self::Dc => "DC",
            Self::Premis => "PREMIS",
            Self::Ead => "EAD",
            Self::Other(_) => "OTHER",
        }
    }

    /// Value for the `OTHERMDTYPE` attribute, if any
    #[must_use]
    pub fn other_mdtype(&self) -> Option<&str> {
        match self {
            Self::Other(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(value) => write!(f, "OTHER:{value}"),
            _ => f.write_str(self.mdtype()),
        }
    }
}

/// A metadata file plus the kind tag it is registered under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// METS section identifier
    pub id: String,
    pub file: IpFile,
    pub kind: MetadataKind,
}

impl MetadataRecord {
    /// Create a record with a freshly generated section identifier
    #[must_use]
    pub fn new(file: IpFile, kind: MetadataKind) -> Self {
        Self {
            id: format!("uuid-{}", crate::new_package_id()),
            file,
            kind,
        }
    }
}
