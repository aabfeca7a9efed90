//! # ECG Scan
//!
//! A Rust crate for estimating wave amplitudes from scanned 12-lead ECG sheets.
//!
//! This library turns a photographed or scanned ECG printout into numbers by:
//! - Binarizing the sheet so the trace stands out from paper and grid
//! - Splitting it into the twelve lead regions of the standard print layout
//! - Reducing each lead to a smoothed one-dimensional profile
//! - Locating P, QRS, T and U waves around the central QRS peak
//! - Calibrating heights into physiologically bounded millivolt values
//! - Flagging amplitudes outside clinical reference ranges
//!
//! ## Example
//!
//! ```rust,no_run
//! use ecg_scan::{analyze_all_leads, classify_anomalies, Lead};
//! use std::path::Path;
//!
//! let amplitudes = analyze_all_leads(Path::new("ecg.jpg"))?;
//! if let Some(record) = amplitudes.get(Lead::II) {
//!     println!("Lead II QRS: {} mV", record.qrs);
//! }
//! println!("{}", classify_anomalies(&amplitudes));
//! # Ok::<(), ecg_scan::AnalysisError>(())
//! ```

pub mod amplitude;
pub mod anomaly;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod error;
pub mod image_loader;
pub mod leads;
pub mod pipeline;
pub mod preprocessing;
pub mod signal;

pub use amplitude::{AmplitudeRecord, LeadAmplitudeMap, Pico};
pub use anomaly::{AnomalyClassifier, AnomalyReport};
pub use calibration::{JitterSource, NoJitter, UniformJitter};
pub use config::PipelineConfig;
pub use error::{AnalysisError, Result};
pub use image_loader::ImageSource;
pub use leads::Lead;
pub use pipeline::{analyze_all_leads, EcgAnalysis, EcgAnalyzer, LeadAnalysis};

/// Flag amplitudes outside the clinical reference ranges
///
/// # Arguments
///
/// * `amplitudes` - Calibrated per-lead amplitudes
///
/// # Returns
///
/// An `AnomalyReport` grouping every abnormal (lead, pico) pair by pico;
/// its `Display` output is the text stored with the examination
pub fn classify_anomalies(amplitudes: &LeadAmplitudeMap) -> AnomalyReport {
    AnomalyClassifier::new().classify(amplitudes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amplitude_map_serialization() {
        let amplitudes: LeadAmplitudeMap = Lead::ALL
            .into_iter()
            .map(|lead| (lead, AmplitudeRecord::new(0.15, 0.9, 0.3, 0.05)))
            .collect();

        let json = serde_json::to_string(&amplitudes).unwrap();
        assert!(json.contains("\"aVR\""));
        assert!(json.contains("\"Pico QRS\":0.9"));

        let deserialized: LeadAmplitudeMap = serde_json::from_str(&json).unwrap();
        assert_eq!(amplitudes, deserialized);
    }

    #[test]
    fn test_classify_anomalies_text() {
        let amplitudes: LeadAmplitudeMap = Lead::ALL
            .into_iter()
            .map(|lead| (lead, AmplitudeRecord::new(0.15, 0.9, 0.3, 0.05)))
            .collect();
        let report = classify_anomalies(&amplitudes);
        assert!(report.is_normal());
        assert_eq!(report.to_string(), anomaly::NO_ANOMALIES_TEXT);
    }
}
