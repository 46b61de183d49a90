//! Format catalog and detection for cartridge images.
//!
//! This crate holds the read-only pieces of the validation engine: the
//! ordered table of supported systems and the pure detector that maps a
//! filename (and optionally its bytes) to one of them.

pub mod catalog;
pub mod detect;
pub mod error;

pub use catalog::{Catalog, RomFormat, Signature};
pub use detect::{detect_format, file_extension};
pub use error::CatalogError;
