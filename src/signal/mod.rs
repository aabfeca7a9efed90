//! Signal processing on lead profiles
//!
//! Savitzky-Golay smoothing, constrained peak search and the wave
//! amplitude estimation built on them.

pub mod extractor;
pub mod peaks;
pub mod savgol;

pub use extractor::{PeakExtractor, RawAmplitude, WaveEstimate, FALLBACK_AMPLITUDES};
pub use peaks::{find_peaks, Peak};
pub use savgol::SavitzkyGolay;
