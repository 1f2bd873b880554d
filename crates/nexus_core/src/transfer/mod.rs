//! Import/export of the portable data document.
//!
//! # Responsibility
//! - Build and deliver `nexus-data.json` exports.
//! - Parse and validate imported documents before anything is replaced.

pub mod document;
pub mod export;
