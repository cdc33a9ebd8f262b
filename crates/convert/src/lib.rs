#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! OAIS package conversion
//!
//! Turns a SIP archive into an AIP archive and an AIP archive into a DIP
//! archive. Each conversion runs inside its own staging root, which is
//! removed on every exit path, and the output archive only becomes visible
//! once it is complete.

mod aip_to_dip;
mod context;
mod derive;
mod output;
mod patch;
mod pipeline;
mod premis;
mod sip_to_aip;

pub use aip_to_dip::AipToDipConverter;
pub use context::{ConvertCtx, ConvertCtxBuilder};
pub use output::Conversion;
pub use patch::patch_package_type;
pub use pipeline::Converter;
pub use premis::{premis_document, write_premis};
pub use sip_to_aip::SipToAipConverter;
