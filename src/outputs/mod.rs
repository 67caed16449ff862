//! Output generation.
//!
//! The pipeline has a single sink: [`json`] writes the final article
//! batch to `data.json` inside the configured output directory,
//! replacing whatever a previous run left there. The file is the whole
//! contract with the map-rendering frontend.

pub mod json;
