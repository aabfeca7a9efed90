//! Configuration structures for the ECG amplitude pipeline.
//!
//! Every tunable value of the pipeline lives in one immutable
//! [`PipelineConfig`], grouped by stage, so runs can be reproduced and
//! parameters varied in tests without touching global state.
//!
//! # Configuration Loading
//!
//! ```no_run
//! use ecg_scan::PipelineConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = PipelineConfig::from_json_file(Path::new("pipeline.json"))?;
//!
//! // Or use defaults
//! let config = PipelineConfig::default();
//! # Ok::<(), ecg_scan::AnalysisError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`PreprocessingConfig`]: binarization threshold and morphology size
//! - [`ExtractionConfig`]: smoothing, peak search and wave windows
//! - [`CalibrationConfig`]: scale factor, clamp bounds and jitter

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::amplitude::Pico;
use crate::constants::{calibration, extraction, physiological, preprocessing};
use crate::error::{AnalysisError, Result};

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub preprocessing: PreprocessingConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub calibration: CalibrationConfig,
}

/// Image cleanup parameters applied before partitioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    /// Inverted pixels strictly above this value become trace pixels
    pub binary_threshold: u8,

    /// Chebyshev radius of the closing/opening structuring element
    pub morph_radius: u8,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            binary_threshold: preprocessing::BINARY_THRESHOLD,
            morph_radius: preprocessing::MORPH_RADIUS,
        }
    }
}

/// How close peaks are resolved during the minimum-distance pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PeakPriority {
    /// Scan left to right, keep a peak unless it is too close to the last kept one
    #[default]
    FirstInScan,
    /// Keep taller peaks first, dropping any neighbour within the distance
    Tallest,
}

/// Smoothing, peak search and wave window parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Savitzky-Golay window length (odd, in samples)
    pub smoothing_window: usize,

    /// Savitzky-Golay polynomial degree (< window)
    pub smoothing_degree: usize,

    /// Minimum normalized peak height
    pub min_peak_height: f64,

    /// Minimum distance between accepted peaks (samples)
    pub min_peak_distance: usize,

    /// Fewest peaks before a QRS anchor is chosen
    pub min_peaks: usize,

    /// Width of the P window before the anchor
    pub p_window: usize,

    /// Width of the T window from the anchor
    pub t_window: usize,

    /// Width of the U window after the T window
    pub u_window: usize,

    #[serde(default)]
    pub peak_priority: PeakPriority,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            smoothing_window: extraction::SMOOTHING_WINDOW,
            smoothing_degree: extraction::SMOOTHING_DEGREE,
            min_peak_height: extraction::MIN_PEAK_HEIGHT,
            min_peak_distance: extraction::MIN_PEAK_DISTANCE,
            min_peaks: extraction::MIN_PEAKS_FOR_ANCHOR,
            p_window: extraction::P_WINDOW,
            t_window: extraction::T_WINDOW,
            u_window: extraction::U_WINDOW,
            peak_priority: PeakPriority::FirstInScan,
        }
    }
}

/// Closed amplitude interval in millivolt-like units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeBounds {
    pub min: f64,
    pub max: f64,
}

impl AmplitudeBounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

impl From<(f64, f64)> for AmplitudeBounds {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

/// Physiological clamp applied to each pico before jitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PicoBounds {
    pub p: AmplitudeBounds,
    pub qrs: AmplitudeBounds,
    pub t: AmplitudeBounds,
    pub u: AmplitudeBounds,
}

impl PicoBounds {
    pub fn get(&self, pico: Pico) -> AmplitudeBounds {
        match pico {
            Pico::P => self.p,
            Pico::Qrs => self.qrs,
            Pico::T => self.t,
            Pico::U => self.u,
        }
    }
}

impl Default for PicoBounds {
    fn default() -> Self {
        Self {
            p: physiological::P.into(),
            qrs: physiological::QRS.into(),
            t: physiological::T.into(),
            u: physiological::U.into(),
        }
    }
}

/// Pixel-to-millivolt calibration parameters.
///
/// Order of application: scale, clamp, jitter, round. Because jitter comes
/// after the clamp, a reported value may sit up to `jitter_high - 1` outside
/// its bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Multiplier from normalized profile height to mV
    pub factor: f64,

    /// Lower end of the uniform jitter factor
    pub jitter_low: f64,

    /// Upper end of the uniform jitter factor
    pub jitter_high: f64,

    /// Decimal places kept after rounding
    pub decimals: u32,

    #[serde(default)]
    pub bounds: PicoBounds,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            factor: calibration::FACTOR,
            jitter_low: calibration::JITTER_LOW,
            jitter_high: calibration::JITTER_HIGH,
            decimals: calibration::DECIMALS,
            bounds: PicoBounds::default(),
        }
    }
}

impl PipelineConfig {
    /// Check every parameter for a value the pipeline cannot run with
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidParameter` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let extraction = &self.extraction;
        if extraction.smoothing_window == 0 || extraction.smoothing_window % 2 == 0 {
            return Err(AnalysisError::invalid_parameter(
                "extraction.smoothing_window",
                extraction.smoothing_window,
            ));
        }
        if extraction.smoothing_degree >= extraction.smoothing_window {
            return Err(AnalysisError::invalid_parameter(
                "extraction.smoothing_degree",
                extraction.smoothing_degree,
            ));
        }
        if !extraction.min_peak_height.is_finite() {
            return Err(AnalysisError::invalid_parameter(
                "extraction.min_peak_height",
                extraction.min_peak_height,
            ));
        }
        if extraction.min_peaks == 0 {
            return Err(AnalysisError::invalid_parameter("extraction.min_peaks", 0));
        }

        let calibration = &self.calibration;
        if !calibration.factor.is_finite() || calibration.factor <= 0.0 {
            return Err(AnalysisError::invalid_parameter(
                "calibration.factor",
                calibration.factor,
            ));
        }
        if !(calibration.jitter_low > 0.0 && calibration.jitter_low <= calibration.jitter_high)
            || !calibration.jitter_high.is_finite()
        {
            return Err(AnalysisError::invalid_parameter(
                "calibration.jitter",
                format!("{}..{}", calibration.jitter_low, calibration.jitter_high),
            ));
        }
        for pico in Pico::ALL {
            let bounds = calibration.bounds.get(pico);
            if !(bounds.min <= bounds.max) {
                return Err(AnalysisError::invalid_parameter(
                    format!("calibration.bounds.{}", pico.wave_name().to_lowercase()),
                    format!("{}..{}", bounds.min, bounds.max),
                ));
            }
        }

        Ok(())
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AnalysisError::config("Invalid configuration JSON", e))
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::config(format!("Failed to read {}", path.display()), e)
        })?;
        Self::from_json_str(&content)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            AnalysisError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_pipeline() {
        let config = PipelineConfig::default();
        assert_eq!(config.preprocessing.binary_threshold, 50);
        assert_eq!(config.preprocessing.morph_radius, 1);
        assert_eq!(config.extraction.smoothing_window, 15);
        assert_eq!(config.extraction.smoothing_degree, 3);
        assert_eq!(config.extraction.min_peak_height, 0.4);
        assert_eq!(config.extraction.min_peak_distance, 30);
        assert_eq!(config.calibration.factor, 0.1);
        assert_eq!(config.calibration.jitter_low, 0.9);
        assert_eq!(config.calibration.jitter_high, 1.1);
        assert_eq!(config.calibration.bounds.qrs, AmplitudeBounds::new(0.5, 1.5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_even_window_rejected() {
        let mut config = PipelineConfig::default();
        config.extraction.smoothing_window = 14;
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidParameter { ref parameter, .. }) if parameter == "extraction.smoothing_window"
        ));
    }

    #[test]
    fn test_degree_must_be_below_window() {
        let mut config = PipelineConfig::default();
        config.extraction.smoothing_window = 3;
        config.extraction.smoothing_degree = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_jitter_rejected() {
        let mut config = PipelineConfig::default();
        config.calibration.jitter_low = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut config = PipelineConfig::default();
        config.calibration.bounds.t = AmplitudeBounds::new(0.6, 0.1);
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidParameter { ref parameter, .. }) if parameter == "calibration.bounds.t"
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PipelineConfig::from_json_str(
            r#"{ "preprocessing": { "binary_threshold": 80, "morph_radius": 2 } }"#,
        )
        .unwrap();
        assert_eq!(config.preprocessing.binary_threshold, 80);
        assert_eq!(config.extraction, ExtractionConfig::default());
    }

    #[test]
    fn test_serialized_config_has_no_layout_section() {
        let json = serde_json::to_value(PipelineConfig::default()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 3);
        assert!(!keys.contains(&"partition"));

        // Files written before the grid was fixed still load
        let config = PipelineConfig::from_json_str(r#"{ "partition": { "rows": 4, "columns": 3 } }"#).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_json_file_round_trip() {
        let mut config = PipelineConfig::default();
        config.extraction.peak_priority = PeakPriority::Tallest;
        let path = std::env::temp_dir().join(format!("ecg_scan_config_{}.json", std::process::id()));

        config.to_json_file(&path).unwrap();
        let loaded = PipelineConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = PipelineConfig::from_json_file(Path::new("/nonexistent/pipeline.json"));
        assert!(matches!(result, Err(AnalysisError::ConfigError { .. })));
    }
}
