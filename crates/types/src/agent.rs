//! Provenance agent records, as written to the manifest header

use serde::{Deserialize, Serialize};
use std::fmt;

/// METS agent `ROLE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AgentRole {
    Creator,
    Editor,
    Archivist,
    Preservation,
    Disseminator,
    Custodian,
    IpOwner,
    Other,
}

impl AgentRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Creator => "CREATOR",
            Self::Editor => "EDITOR",
            Self::Archivist => "ARCHIVIST",
            Self::Preservation => "PRESERVATION",
            Self::Disseminator => "DISSEMINATOR",
            Self::Custodian => "CUSTODIAN",
            Self::IpOwner => "IPOWNER",
            Self::Other => "OTHER",
        }
    }

    /// Parse a `ROLE` value; unknown roles map to `Other`
    #[must_use]
    pub fn from_mets(value: &str) -> Self {
        match value {
            "CREATOR" => Self::Creator,
            "EDITOR" => Self::Editor,
            "ARCHIVIST" => Self::Archivist,
            "PRESERVATION" => Self::Preservation,
            "DISSEMINATOR" => Self::Disseminator,
            "CUSTODIAN" => Self::Custodian,
            "IPOWNER" => Self::IpOwner,
            _ => Self::Other,
        }
    }
}

/// METS agent `TYPE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CreatorType {
    Individual,
    Organization,
    Other,
}

impl CreatorType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "INDIVIDUAL",
            Self::Organization => "ORGANIZATION",
            Self::Other => "OTHER",
        }
    }

    #[must_use]
    pub fn from_mets(value: &str) -> Self {
        match value {
            "INDIVIDUAL" => Self::Individual,
            "ORGANIZATION" => Self::Organization,
            _ => Self::Other,
        }
    }
}

/// `csip:NOTETYPE` of an agent note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentNoteType {
    #[serde(rename = "SOFTWARE VERSION")]
    SoftwareVersion,
    #[serde(rename = "IDENTIFICATIONCODE")]
    IdentificationCode,
}

impl AgentNoteType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SoftwareVersion => "SOFTWARE VERSION",
            Self::IdentificationCode => "IDENTIFICATIONCODE",
        }
    }

    #[must_use]
    pub fn from_mets(value: &str) -> Option<Self> {
        match value {
            "SOFTWARE VERSION" => Some(Self::SoftwareVersion),
            "IDENTIFICATIONCODE" => Some(Self::IdentificationCode),
            _ => None,
        }
    }
}

/// A recorded actor associated with a package's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub role: AgentRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_role: Option<String>,
    #[serde(rename = "type")]
    pub creator_type: CreatorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_type: Option<AgentNoteType>,
}

impl Agent {
    /// A software agent that created a package, identified by name and version
    #[must_use]
    pub fn software_creator(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: AgentRole::Creator,
            other_role: None,
            creator_type: CreatorType::Other,
            other_type: Some("SOFTWARE".to_string()),
            note: Some(version.into()),
            note_type: Some(AgentNoteType::SoftwareVersion),
        }
    }

    /// Whether this agent describes a piece of software
    #[must_use]
    pub fn is_software(&self) -> bool {
        self.creator_type == CreatorType::Other && self.other_type.as_deref() == Some("SOFTWARE")
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.role.as_str())?;
        if let Some(note) = &self.note {
            write!(f, " {note}")?;
        }
        Ok(())
    }
}
