//! Measurement jitter sources
//!
//! Calibration multiplies every amplitude by a random factor to mimic the
//! spread of repeated manual measurements. The randomness is drawn through
//! [`JitterSource`] so tests and reproducible runs can pin it down.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies multiplicative jitter factors
pub trait JitterSource {
    /// Next factor in `[low, high)`; `low` when the range is empty
    fn factor(&mut self, low: f64, high: f64) -> f64;
}

impl<J: JitterSource + ?Sized> JitterSource for &mut J {
    fn factor(&mut self, low: f64, high: f64) -> f64 {
        (**self).factor(low, high)
    }
}

/// Uniformly distributed jitter
#[derive(Debug, Clone)]
pub struct UniformJitter {
    rng: StdRng,
}

impl UniformJitter {
    /// Reproducible jitter stream
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Jitter seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl JitterSource for UniformJitter {
    fn factor(&mut self, low: f64, high: f64) -> f64 {
        if low < high {
            self.rng.gen_range(low..high)
        } else {
            low
        }
    }
}

/// Disables jitter (factor 1.0)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn factor(&mut self, _low: f64, _high: f64) -> f64 {
        1.0
    }
}

/// Always returns the same factor, regardless of range
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn factor(&mut self, _low: f64, _high: f64) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_stays_in_range() {
        let mut jitter = UniformJitter::seeded(7);
        for _ in 0..1000 {
            let f = jitter.factor(0.9, 1.1);
            assert!((0.9..1.1).contains(&f));
        }
    }

    #[test]
    fn test_seeded_streams_repeat() {
        let mut a = UniformJitter::seeded(42);
        let mut b = UniformJitter::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.factor(0.9, 1.1), b.factor(0.9, 1.1));
        }
    }

    #[test]
    fn test_empty_range_returns_low() {
        let mut jitter = UniformJitter::seeded(1);
        assert_eq!(jitter.factor(1.0, 1.0), 1.0);
    }

    #[test]
    fn test_fixed_sources() {
        assert_eq!(NoJitter.factor(0.9, 1.1), 1.0);
        assert_eq!(FixedJitter(1.1).factor(0.9, 1.1), 1.1);
    }

    #[test]
    fn test_mut_reference_forwards() {
        fn draw<J: JitterSource>(mut source: J) -> f64 {
            source.factor(0.5, 0.6)
        }
        let mut jitter = FixedJitter(0.95);
        assert_eq!(draw(&mut jitter), 0.95);
    }
}
