//! Image preprocessing module
//!
//! Converts arbitrary decoded images into the binary raster that lead
//! partitioning and profile extraction work on.

pub mod binarize;

pub use binarize::{luma_rec601, Preprocessor, RasterImage};
