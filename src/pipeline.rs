//! End-to-end lead analysis
//!
//! ```text
//! image -> Preprocessor -> LeadPartitioner -> 12 x (ProfileBuilder -> PeakExtractor)
//!       -> AmplitudeCalibrator -> LeadAmplitudeMap
//! ```
//!
//! The per-lead profile and peak stages share no state and run in parallel
//! when the `parallel` feature is enabled. Calibration, the only stage that
//! draws random numbers, runs afterwards in lead order so a seeded jitter
//! source gives the same result either way.

use serde::{Deserialize, Serialize};

use crate::amplitude::{AmplitudeRecord, LeadAmplitudeMap, Pico};
use crate::calibration::{AmplitudeCalibrator, JitterSource, UniformJitter};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::image_loader::ImageSource;
use crate::leads::{Lead, LeadPartitioner, LeadRegion, ProfileBuilder};
use crate::preprocessing::{Preprocessor, RasterImage};
use crate::signal::{PeakExtractor, WaveEstimate};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Diagnostic view of one lead's analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadAnalysis {
    pub lead: Lead,
    pub region: LeadRegion,
    /// Peaks accepted on the smoothed profile
    pub peak_count: usize,
    /// Profile column used as QRS anchor
    pub anchor: Option<usize>,
    /// Picos reported with the typical-normal default instead of a measurement
    pub defaulted: Vec<Pico>,
    pub record: AmplitudeRecord,
}

impl LeadAnalysis {
    /// Every pico of this lead is a default; the trace was not readable
    pub fn is_fallback(&self) -> bool {
        self.defaulted.len() == Pico::ALL.len()
    }
}

/// Full result of one image analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcgAnalysis {
    /// Per-lead diagnostics in reporting order
    pub leads: Vec<LeadAnalysis>,
    pub amplitudes: LeadAmplitudeMap,
}

impl EcgAnalysis {
    /// Leads whose amplitudes are entirely defaults
    pub fn fallback_leads(&self) -> Vec<Lead> {
        self.leads
            .iter()
            .filter(|analysis| analysis.is_fallback())
            .map(|analysis| analysis.lead)
            .collect()
    }
}

/// Runs the complete amplitude pipeline with one configuration
#[derive(Debug, Clone)]
pub struct EcgAnalyzer {
    config: PipelineConfig,
    preprocessor: Preprocessor,
    partitioner: LeadPartitioner,
    profile_builder: ProfileBuilder,
    extractor: PeakExtractor,
    calibrator: AmplitudeCalibrator,
}

impl EcgAnalyzer {
    /// Create an analyzer with the default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(PipelineConfig::default())
    }

    /// Create an analyzer from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidParameter` if `config` fails validation.
    pub fn with_config(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            preprocessor: Preprocessor::from_config(&config.preprocessing),
            partitioner: LeadPartitioner::new(),
            profile_builder: ProfileBuilder::new(),
            extractor: PeakExtractor::from_config(&config.extraction)?,
            calibrator: AmplitudeCalibrator::from_config(&config.calibration),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Amplitudes of all twelve leads
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InputError` if the image cannot be decoded and
    /// `AnalysisError::InvalidDimensionsError` if it has no pixels. No partial
    /// result is returned.
    pub fn analyze<J: JitterSource + ?Sized>(
        &self,
        source: ImageSource<'_>,
        jitter: &mut J,
    ) -> Result<LeadAmplitudeMap> {
        Ok(self.analyze_detailed(source, jitter)?.amplitudes)
    }

    /// Amplitudes plus per-lead diagnostics
    pub fn analyze_detailed<J: JitterSource + ?Sized>(
        &self,
        source: ImageSource<'_>,
        jitter: &mut J,
    ) -> Result<EcgAnalysis> {
        let image = source.decode()?;
        let raster = self.preprocessor.process(&image);
        self.analyze_raster(&raster, jitter)
    }

    /// Analyze an already preprocessed binary raster
    pub fn analyze_raster<J: JitterSource + ?Sized>(
        &self,
        raster: &RasterImage,
        jitter: &mut J,
    ) -> Result<EcgAnalysis> {
        let layout = self.partitioner.partition(raster.width(), raster.height())?;

        let estimates = self.estimate_regions(raster, layout.regions());

        let leads: Vec<LeadAnalysis> = layout
            .regions()
            .iter()
            .zip(estimates)
            .map(|(region, estimate)| {
                let record = self.calibrator.calibrate(&estimate, &mut *jitter);
                let defaulted = estimate.fallback_picos();
                log::debug!(
                    "Lead {}: {} peaks, anchor {:?}, defaulted {:?}",
                    region.lead,
                    estimate.peaks.len(),
                    estimate.anchor,
                    defaulted
                );
                LeadAnalysis {
                    lead: region.lead,
                    region: *region,
                    peak_count: estimate.peaks.len(),
                    anchor: estimate.anchor,
                    defaulted,
                    record,
                }
            })
            .collect();

        let amplitudes = leads
            .iter()
            .map(|analysis| (analysis.lead, analysis.record))
            .collect();

        Ok(EcgAnalysis { leads, amplitudes })
    }

    fn estimate_region(&self, raster: &RasterImage, region: &LeadRegion) -> WaveEstimate {
        let profile = self.profile_builder.build(raster, region);
        self.extractor.extract(&profile)
    }

    #[cfg(feature = "parallel")]
    fn estimate_regions(&self, raster: &RasterImage, regions: &[LeadRegion]) -> Vec<WaveEstimate> {
        regions
            .par_iter()
            .map(|region| self.estimate_region(raster, region))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn estimate_regions(&self, raster: &RasterImage, regions: &[LeadRegion]) -> Vec<WaveEstimate> {
        regions
            .iter()
            .map(|region| self.estimate_region(raster, region))
            .collect()
    }
}

/// Estimate P/QRS/T/U amplitudes for all twelve leads of an ECG image
///
/// Uses the default configuration and entropy-seeded jitter, so repeated
/// calls on the same image may differ by up to the jitter range. Use
/// [`EcgAnalyzer`] with a seeded [`crate::calibration::UniformJitter`] for
/// reproducible output.
///
/// # Arguments
///
/// * `image` - A decoded image, a file path or encoded image bytes
///
/// # Returns
///
/// A map with exactly one `AmplitudeRecord` per standard lead
///
/// # Errors
///
/// Returns `AnalysisError` if:
/// - The image cannot be opened or decoded
/// - The image has zero width or height
pub fn analyze_all_leads<'a>(image: impl Into<ImageSource<'a>>) -> Result<LeadAmplitudeMap> {
    let analyzer = EcgAnalyzer::new()?;
    let mut jitter = UniformJitter::from_entropy();
    analyzer.analyze(image.into(), &mut jitter)
}
