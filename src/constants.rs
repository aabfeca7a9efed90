//! Reference values for ECG amplitude extraction
//!
//! Compile-time defaults for each pipeline stage plus the two amplitude
//! tables: the physiological clamp applied during calibration and the
//! narrower clinical reference range used for anomaly flagging.

/// Standard 12-lead layout
pub mod layout {
    /// Grid rows in the printed sheet (three limb rows plus the V4-V6 row)
    pub const GRID_ROWS: u32 = 4;

    /// Grid columns in the printed sheet
    pub const GRID_COLUMNS: u32 = 3;

    /// Lead names in reporting order
    pub const LEAD_NAMES: [&str; 12] = [
        "I", "II", "III", "aVR", "aVL", "aVF", "V1", "V2", "V3", "V4", "V5", "V6",
    ];
}

/// Image preprocessing parameters
pub mod preprocessing {
    /// Inverted-intensity threshold separating trace ink from paper (of 255)
    pub const BINARY_THRESHOLD: u8 = 50;

    /// Structuring element radius for closing/opening (1 => 3x3 square)
    pub const MORPH_RADIUS: u8 = 1;
}

/// Profile smoothing and peak search parameters
pub mod extraction {
    /// Savitzky-Golay window length in samples (odd)
    pub const SMOOTHING_WINDOW: usize = 15;

    /// Savitzky-Golay polynomial degree
    pub const SMOOTHING_DEGREE: usize = 3;

    /// Minimum normalized height of an accepted peak
    pub const MIN_PEAK_HEIGHT: f64 = 0.4;

    /// Minimum column distance between two accepted peaks
    pub const MIN_PEAK_DISTANCE: usize = 30;

    /// Fewest peaks needed before the QRS anchor is trusted
    pub const MIN_PEAKS_FOR_ANCHOR: usize = 3;

    /// P search window, ending just before the QRS anchor
    pub const P_WINDOW: usize = 30;

    /// T search window, starting at the QRS anchor
    pub const T_WINDOW: usize = 40;

    /// U search window, starting where the T window ends
    pub const U_WINDOW: usize = 30;
}

/// Pixel-to-millivolt calibration
pub mod calibration {
    /// Scale from normalized profile height to millivolt-like units
    pub const FACTOR: f64 = 0.1;

    /// Lower bound of the multiplicative measurement jitter
    pub const JITTER_LOW: f64 = 0.9;

    /// Upper bound of the multiplicative measurement jitter
    pub const JITTER_HIGH: f64 = 1.1;

    /// Decimal places kept in reported amplitudes
    pub const DECIMALS: u32 = 3;
}

/// Amplitudes assumed when a trace is illegible (mV)
pub mod defaults {
    pub const P_MV: f64 = 0.15;
    pub const QRS_MV: f64 = 0.9;
    pub const T_MV: f64 = 0.3;
    pub const U_MV: f64 = 0.05;
}

/// Physiologically plausible amplitude bounds (mV), applied before jitter
pub mod physiological {
    pub const P: (f64, f64) = (0.05, 0.35);
    pub const QRS: (f64, f64) = (0.5, 1.5);
    pub const T: (f64, f64) = (0.1, 0.6);
    pub const U: (f64, f64) = (0.0, 0.25);
}

/// Clinically normal amplitude ranges (mV); values outside are anomalies
pub mod reference {
    pub const P: (f64, f64) = (0.05, 0.25);
    pub const QRS: (f64, f64) = (0.6, 1.2);
    pub const T: (f64, f64) = (0.1, 0.5);
    pub const U: (f64, f64) = (0.0, 0.2);

    /// Unit label for every reference range
    pub const UNIT: &str = "mV";
}
