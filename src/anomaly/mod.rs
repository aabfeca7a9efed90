//! Anomaly classification module
//!
//! This module flags calibrated amplitudes that fall outside the clinical
//! reference ranges and renders the result for display and storage.

pub mod classifier;
pub mod report;

pub use classifier::{AnomalyClassifier, AnomalyReport, Direction, LeadDeviation, PicoAnomalies};
pub use report::NO_ANOMALIES_TEXT;
