#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! E-ARK information package model and codec
//!
//! This crate holds the in-memory [`InformationPackage`] and the
//! [`PackageCodec`] that turns it into an on-disk CSIP layout with a METS
//! manifest, or reads such a layout back out of a zip archive.

mod codec;
mod fixity;
mod mets;
mod model;

pub use codec::{EarkCodec, PackageCodec};
pub use fixity::{digest_file, mime_type, FileDigest};
pub use mets::{read_mets, MdRef, MetsDocument};
pub use model::InformationPackage;
