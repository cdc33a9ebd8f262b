//! Fixed names of the E-ARK package layout

/// Manifest file at the package root
pub const METS_FILE: &str = "METS.xml";

pub const DESCRIPTIVE_DIR: &str = "metadata/descriptive";
pub const PRESERVATION_DIR: &str = "metadata/preservation";
pub const SCHEMAS_DIR: &str = "schemas";
pub const SUBMISSION_DIR: &str = "submission";

/// Manifest attribute carrying the OAIS package type
pub const PACKAGE_TYPE_ATTRIBUTE: &str = "csip:OAISPACKAGETYPE";

/// Name of the preservation record synthesized during ingest
pub const PREMIS_FILE: &str = "premis.xml";

/// Schema registered alongside the preservation record
pub const PREMIS_SCHEMA: &str = "premis.xsd";

/// The literal manifest text declaring `package_type`
#[must_use]
pub fn package_type_marker(package_type: crate::PackageType) -> String {
    format!("{PACKAGE_TYPE_ATTRIBUTE}=\"{package_type}\"")
}

/// Package-relative path of `name` under `dir`
#[must_use]
pub fn entry(dir: &str, name: &str) -> String {
    format!("{dir}/{name}")
}
