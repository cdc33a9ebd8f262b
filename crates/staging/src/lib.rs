#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Staging directory management for package conversion
//!
//! Every conversion extracts and builds inside an exclusively owned staging
//! root. Roots are uniquely named so concurrent conversions never collide,
//! and are removed exactly once: explicitly through
//! [`StagingRoot::release`], or on drop when a pipeline exits early.

mod cleanup;
mod manager;
mod root;

pub use cleanup::{release, remove_tree};
pub use manager::StagingManager;
pub use root::StagingRoot;
