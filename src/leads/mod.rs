//! Lead region partitioning and signal profile construction
//!
//! This module maps the fixed 12-lead sheet layout onto a preprocessed
//! raster and reduces each lead region to a one-dimensional trace.

pub mod layout;
pub mod profile;

pub use layout::{Lead, LeadLayout, LeadPartitioner, LeadRegion};
pub use profile::{ProfileBuilder, SignalProfile};
