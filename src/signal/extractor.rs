//! Wave amplitude estimation from a lead's signal profile
//!
//! Smooths the profile, finds its dominant peaks and takes the middle one as
//! the QRS complex. The P, T and U amplitudes are the highest smoothed
//! values in fixed windows around that anchor:
//!
//! ```text
//!        P window        T window         U window
//!   [anchor-p, anchor) [anchor, anchor+t) [.., ..+u)
//! ```
//!
//! Traces with too few peaks fall back to typical normal amplitudes. So does
//! any single window that turns out empty.

use serde::{Deserialize, Serialize};

use crate::amplitude::{AmplitudeRecord, Pico};
use crate::config::{ExtractionConfig, PeakPriority};
use crate::constants::defaults;
use crate::error::Result;
use crate::leads::SignalProfile;

use super::peaks::{find_peaks, Peak};
use super::savgol::SavitzkyGolay;

/// Amplitudes substituted when detection fails (mV)
pub const FALLBACK_AMPLITUDES: AmplitudeRecord = AmplitudeRecord {
    p: defaults::P_MV,
    qrs: defaults::QRS_MV,
    t: defaults::T_MV,
    u: defaults::U_MV,
};

/// One pico's pre-calibration amplitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RawAmplitude {
    /// Normalized profile height, still to be scaled to mV
    Measured(f64),
    /// Fallback already expressed in mV
    Fallback(f64),
}

impl RawAmplitude {
    pub fn is_fallback(&self) -> bool {
        matches!(self, RawAmplitude::Fallback(_))
    }
}

/// Result of peak extraction on one lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveEstimate {
    pub p: RawAmplitude,
    pub qrs: RawAmplitude,
    pub t: RawAmplitude,
    pub u: RawAmplitude,
    /// Peaks accepted on the smoothed profile
    pub peaks: Vec<Peak>,
    /// Column of the QRS anchor, when enough peaks were found
    pub anchor: Option<usize>,
    /// False when the profile was shorter than the smoothing window
    pub smoothed: bool,
}

impl WaveEstimate {
    pub fn get(&self, pico: Pico) -> RawAmplitude {
        match pico {
            Pico::P => self.p,
            Pico::Qrs => self.qrs,
            Pico::T => self.t,
            Pico::U => self.u,
        }
    }

    /// Picos whose value is the fallback default
    pub fn fallback_picos(&self) -> Vec<Pico> {
        Pico::ALL
            .into_iter()
            .filter(|&pico| self.get(pico).is_fallback())
            .collect()
    }

    fn fallback(peaks: Vec<Peak>, smoothed: bool) -> Self {
        Self {
            p: RawAmplitude::Fallback(FALLBACK_AMPLITUDES.p),
            qrs: RawAmplitude::Fallback(FALLBACK_AMPLITUDES.qrs),
            t: RawAmplitude::Fallback(FALLBACK_AMPLITUDES.t),
            u: RawAmplitude::Fallback(FALLBACK_AMPLITUDES.u),
            peaks,
            anchor: None,
            smoothed,
        }
    }
}

/// Estimates raw P/QRS/T/U amplitudes from signal profiles
#[derive(Debug, Clone)]
pub struct PeakExtractor {
    smoother: SavitzkyGolay,
    min_peak_height: f64,
    min_peak_distance: usize,
    min_peaks: usize,
    p_window: usize,
    t_window: usize,
    u_window: usize,
    priority: PeakPriority,
}

impl PeakExtractor {
    /// Create an extractor with default parameters
    pub fn new() -> Result<Self> {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create an extractor from configuration
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidParameter` for an unusable smoothing
    /// window/degree pair.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        Ok(Self {
            smoother: SavitzkyGolay::new(config.smoothing_window, config.smoothing_degree)?,
            min_peak_height: config.min_peak_height,
            min_peak_distance: config.min_peak_distance,
            min_peaks: config.min_peaks.max(1),
            p_window: config.p_window,
            t_window: config.t_window,
            u_window: config.u_window,
            priority: config.peak_priority,
        })
    }

    /// Smooth `profile`, or return it unchanged if it is shorter than the window
    pub fn smooth(&self, profile: &SignalProfile) -> (Vec<f64>, bool) {
        match self.smoother.smooth(profile.values()) {
            Some(smoothed) => (smoothed, true),
            None => {
                if !profile.is_empty() {
                    log::warn!(
                        "Profile of {} samples shorter than smoothing window {}; using raw profile",
                        profile.len(),
                        self.smoother.window()
                    );
                }
                (profile.values().to_vec(), false)
            }
        }
    }

    /// Estimate the raw wave amplitudes of one lead
    pub fn extract(&self, profile: &SignalProfile) -> WaveEstimate {
        // Step 1: Smoothing
        let (trace, smoothed) = self.smooth(profile);

        // Step 2: Peak search
        let peaks = find_peaks(&trace, self.min_peak_height, self.min_peak_distance, self.priority);

        // Step 3: Too few peaks to trust an anchor
        if peaks.len() < self.min_peaks {
            log::debug!(
                "Found {} peaks (need {}); using fallback amplitudes",
                peaks.len(),
                self.min_peaks
            );
            return WaveEstimate::fallback(peaks, smoothed);
        }

        // Step 4: Windows around the middle peak
        let anchor = peaks[peaks.len() / 2].index;
        let n = trace.len();

        let p_start = anchor.saturating_sub(self.p_window);
        let t_end = anchor.saturating_add(self.t_window).min(n);
        let u_start = t_end;
        let u_end = u_start.saturating_add(self.u_window).min(n);

        let window_max = |start: usize, end: usize, fallback: f64| {
            if start < end {
                RawAmplitude::Measured(trace[start..end].iter().copied().fold(f64::NEG_INFINITY, f64::max))
            } else {
                RawAmplitude::Fallback(fallback)
            }
        };

        WaveEstimate {
            p: window_max(p_start, anchor, FALLBACK_AMPLITUDES.p),
            qrs: RawAmplitude::Measured(trace[anchor]),
            t: window_max(anchor, t_end, FALLBACK_AMPLITUDES.t),
            u: window_max(u_start, u_end, FALLBACK_AMPLITUDES.u),
            anchor: Some(anchor),
            peaks,
            smoothed,
        }
    }
}
