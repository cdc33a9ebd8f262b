//! Built-in defaults for the converter identities and schema set

/// Software agent recorded by the SIP to AIP converter
pub const SIP_TO_AIP_AGENT: &str = "YksaSipToAip";

/// Software agent recorded by the AIP to DIP converter
pub const AIP_TO_DIP_AGENT: &str = "YksaAipToDip";

pub const AGENT_VERSION: &str = "1.0.0";

/// Agent named in the synthesized preservation record
pub const PREMIS_AGENT_NAME: &str = "Yksa";
pub const PREMIS_AGENT_TYPE: &str = "Software";

/// Core schema files of the CSIP profile
pub const DEFAULT_SCHEMAS: [&str; 4] = [
    "DILCISExtensionMETS.xsd",
    "DILCISExtensionSIPMETS.xsd",
    "mets1_12.xsd",
    "xlink.xsd",
];
