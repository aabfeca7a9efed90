//! Pixel-height to millivolt calibration
//!
//! Each raw amplitude goes through four steps, always in this order:
//! 1. scale measured heights by the calibration factor (fallbacks are already mV)
//! 2. clamp to the physiological bound of its pico
//! 3. multiply by an independent jitter factor
//! 4. round to the configured number of decimals
//!
//! Jitter after the clamp makes the bound soft: a reported value can exceed
//! it by the jitter margin (10% with default settings).

use crate::amplitude::{AmplitudeRecord, Pico};
use crate::config::{CalibrationConfig, PicoBounds};
use crate::signal::{RawAmplitude, WaveEstimate};

use super::jitter::JitterSource;

/// Converts raw wave estimates into calibrated amplitude records
#[derive(Debug, Clone)]
pub struct AmplitudeCalibrator {
    factor: f64,
    bounds: PicoBounds,
    jitter_low: f64,
    jitter_high: f64,
    decimals: u32,
}

impl Default for AmplitudeCalibrator {
    fn default() -> Self {
        Self::new()
    }
}

impl AmplitudeCalibrator {
    /// Create a calibrator with default parameters
    pub fn new() -> Self {
        Self::from_config(&CalibrationConfig::default())
    }

    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self {
            factor: config.factor,
            bounds: config.bounds.clone(),
            jitter_low: config.jitter_low,
            jitter_high: config.jitter_high,
            decimals: config.decimals,
        }
    }

    /// Calibrate all four picos of one lead
    ///
    /// Jitter factors are drawn in P, QRS, T, U order.
    pub fn calibrate<J: JitterSource + ?Sized>(
        &self,
        estimate: &WaveEstimate,
        jitter: &mut J,
    ) -> AmplitudeRecord {
        AmplitudeRecord::from_fn(|pico| self.calibrate_value(pico, estimate.get(pico), &mut *jitter))
    }

    /// Calibrate a single raw amplitude
    pub fn calibrate_value<J: JitterSource + ?Sized>(
        &self,
        pico: Pico,
        raw: RawAmplitude,
        jitter: &mut J,
    ) -> f64 {
        let scaled = match raw {
            RawAmplitude::Measured(height) => height * self.factor,
            RawAmplitude::Fallback(mv) => mv,
        };
        let clamped = self.bounds.get(pico).clamp(scaled);
        let jittered = clamped * jitter.factor(self.jitter_low, self.jitter_high);
        round_to(jittered, self.decimals)
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{FixedJitter, NoJitter, UniformJitter};
    use crate::signal::FALLBACK_AMPLITUDES;
    use approx::assert_relative_eq;

    fn measured(p: f64, qrs: f64, t: f64, u: f64) -> WaveEstimate {
        WaveEstimate {
            p: RawAmplitude::Measured(p),
            qrs: RawAmplitude::Measured(qrs),
            t: RawAmplitude::Measured(t),
            u: RawAmplitude::Measured(u),
            peaks: Vec::new(),
            anchor: Some(0),
            smoothed: true,
        }
    }

    fn fallback() -> WaveEstimate {
        let mut estimate = measured(0.0, 0.0, 0.0, 0.0);
        estimate.p = RawAmplitude::Fallback(FALLBACK_AMPLITUDES.p);
        estimate.qrs = RawAmplitude::Fallback(FALLBACK_AMPLITUDES.qrs);
        estimate.t = RawAmplitude::Fallback(FALLBACK_AMPLITUDES.t);
        estimate.u = RawAmplitude::Fallback(FALLBACK_AMPLITUDES.u);
        estimate
    }

    #[test]
    fn test_scale_then_clamp() {
        let calibrator = AmplitudeCalibrator::new();
        // 1.0 * 0.1 = 0.1 for every pico, then clamped per pico
        let record = calibrator.calibrate(&measured(1.0, 1.0, 1.0, 1.0), &mut NoJitter);

        assert_eq!(record.p, 0.1);
        assert_eq!(record.qrs, 0.5);
        assert_eq!(record.t, 0.1);
        assert_eq!(record.u, 0.1);
    }

    #[test]
    fn test_upper_clamp() {
        let calibrator = AmplitudeCalibrator::new();
        let record = calibrator.calibrate(&measured(10.0, 20.0, 10.0, 10.0), &mut NoJitter);
        assert_eq!(record, AmplitudeRecord::new(0.35, 1.5, 0.6, 0.25));
    }

    #[test]
    fn test_fallback_bypasses_factor() {
        let calibrator = AmplitudeCalibrator::new();
        let record = calibrator.calibrate(&fallback(), &mut NoJitter);
        assert_eq!(record, FALLBACK_AMPLITUDES);
    }

    #[test]
    fn test_jitter_applied_after_clamp() {
        let calibrator = AmplitudeCalibrator::new();
        let record = calibrator.calibrate(&measured(10.0, 20.0, 10.0, 10.0), &mut FixedJitter(1.1));

        // Bound is soft: 1.5 * 1.1
        assert_relative_eq!(record.qrs, 1.65, epsilon = 1e-12);
        assert_relative_eq!(record.p, 0.385, epsilon = 1e-12);
    }

    #[test]
    fn test_rounding_to_three_decimals() {
        let calibrator = AmplitudeCalibrator::new();
        let value = calibrator.calibrate_value(Pico::P, RawAmplitude::Measured(1.23456), &mut NoJitter);
        assert_eq!(value, 0.123);
    }

    #[test]
    fn test_jittered_fallback_within_ten_percent() {
        let calibrator = AmplitudeCalibrator::new();
        let mut jitter = UniformJitter::seeded(3);
        for _ in 0..200 {
            let record = calibrator.calibrate(&fallback(), &mut jitter);
            for (pico, value) in record.iter() {
                let base = FALLBACK_AMPLITUDES.get(pico);
                assert!(value >= base * 0.9 - 1e-3 && value <= base * 1.1 + 1e-3, "{} = {}", pico, value);
            }
        }
    }

    #[test]
    fn test_custom_factor() {
        let mut config = CalibrationConfig::default();
        config.factor = 1.0;
        let calibrator = AmplitudeCalibrator::from_config(&config);
        let record = calibrator.calibrate(&measured(0.2, 1.0, 0.4, 0.1), &mut NoJitter);
        assert_eq!(record, AmplitudeRecord::new(0.2, 1.0, 0.4, 0.1));
    }
}
