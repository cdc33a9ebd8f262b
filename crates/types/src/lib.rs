#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for csip-convert
//!
//! This crate provides the value types shared by the package model, the
//! codec and the converters: package types, metadata records, provenance
//! agents and the fixed E-ARK layout names.

pub mod agent;
pub mod layout;
pub mod metadata;
pub mod package;

// Re-export commonly used types
pub use agent::{Agent, AgentNoteType, AgentRole, CreatorType};
pub use metadata::{MetadataKind, MetadataRecord};
pub use package::{ContentType, IpFile, PackageType};
pub use uuid::Uuid;

/// E-ARK Common Specification profile
pub const CSIP_PROFILE: &str = "https://earkcsip.dilcis.eu/profile/E-ARK-CSIP.xml";

/// E-ARK SIP profile
pub const SIP_PROFILE: &str = "https://earksip.dilcis.eu/profile/E-ARK-SIP.xml";

/// E-ARK DIP profile
pub const DIP_PROFILE: &str = "https://earkdip.dilcis.eu/profile/E-ARK-DIP.xml";

/// Generate a fresh package identifier
#[must_use]
pub fn new_package_id() -> String {
    Uuid::new_v4().to_string()
}
