//! Amplitude calibration module
//!
//! This module converts raw profile heights into millivolt-like amplitudes
//! and provides the jitter sources used to simulate measurement variance.

pub mod calibrator;
pub mod jitter;

pub use calibrator::AmplitudeCalibrator;
pub use jitter::{FixedJitter, JitterSource, NoJitter, UniformJitter};
