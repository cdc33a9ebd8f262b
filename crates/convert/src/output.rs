//! Result of a completed conversion

use csip_package::InformationPackage;
use csip_types::PackageType;

/// The derived package and the entries of the archive written for it
#[derive(Debug, Clone)]
pub struct Conversion {
    pub package: InformationPackage,
    /// Entry names relative to the package root, e.g. `METS.xml`
    pub entries: Vec<String>,
    /// Entry names as stored in the archive, e.g. `<id>/METS.xml`
    pub archive_entries: Vec<String>,
}

impl Conversion {
    pub(crate) fn new(package: InformationPackage, archive_entries: Vec<String>) -> Self {
        let prefix = format!("{}/", package.id);
        let entries = archive_entries
            .iter()
            .map(|e| e.strip_prefix(&prefix).unwrap_or(e).to_string())
            .collect();
        Self {
            package,
            entries,
            archive_entries,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.package.id
    }

    #[must_use]
    pub fn package_type(&self) -> PackageType {
        self.package.package_type
    }

    #[must_use]
    pub fn profile(&self) -> &str {
        &self.package.profile
    }
}
