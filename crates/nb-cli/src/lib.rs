//! # nb-cli
//!
//! File glue for the `nbnorm` binary.
//!
//! - [`io`] - TIFF ingestion and export
//! - [`preset`] - YAML parameter presets
//!
//! The normalization itself lives in `nb-ops`; nothing here touches samples
//! beyond converting them to and from file formats.

#![warn(missing_docs)]

pub mod io;
pub mod preset;
