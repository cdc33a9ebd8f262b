//! METS manifest reading and writing

mod reader;
mod writer;

pub use reader::{read_mets, MdRef, MetsDocument};
pub(crate) use writer::{write_mets, FileRef, ManifestInput, MdSection};

pub(crate) const METS_NS: &str = "http://www.loc.gov/METS/";
pub(crate) const CSIP_NS: &str = "https://DILCIS.eu/XML/METS/CSIPExtensionMETS";
pub(crate) const SIP_NS: &str = "https://DILCIS.eu/XML/METS/SIPExtensionMETS";
pub(crate) const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub(crate) const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// `fileGrp` `USE` values for the groups this crate reads and writes
pub(crate) const SCHEMAS_USE: &str = "Schemas";
pub(crate) const SUBMISSION_USE: &str = "Submission";

pub(crate) const CHECKSUM_TYPE: &str = "SHA-256";
