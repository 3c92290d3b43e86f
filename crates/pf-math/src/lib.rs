//! path-flow binning utilities.

pub mod binning;

pub use binning::*;
