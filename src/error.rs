//! Error types for the ecg_scan library

use thiserror::Error;

/// Result type alias for ecg_scan operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Failures that abort a single ECG analysis request.
///
/// Degenerate but decodable input (blank leads, too few peaks, empty search
/// windows) is never reported here; those cases resolve to default amplitudes.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Image could not be opened or decoded
    #[error("Failed to read ECG image: {message}")]
    InputError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Raster has no pixels along at least one axis
    #[error("Invalid image dimensions: {width}x{height} (both must be non-zero)")]
    InvalidDimensionsError { width: u32, height: u32 },

    /// Invalid pipeline parameter
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration file could not be read, written or parsed
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AnalysisError {
    /// Create an input error with context
    pub fn input<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::InputError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Get user-friendly error description for the operator
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::InputError { .. } => {
                "Could not read the ECG image. Please upload a JPG or PNG scan and try again.".to_string()
            }
            AnalysisError::InvalidDimensionsError { width, height } => {
                format!(
                    "The ECG image is empty ({}x{} pixels). Please upload a complete scan.",
                    width, height
                )
            }
            AnalysisError::InvalidParameter { parameter, .. } => {
                format!("The analysis setting '{}' is invalid.", parameter)
            }
            AnalysisError::ConfigError { .. } => {
                "The analysis configuration could not be loaded.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_input_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = AnalysisError::input("Failed to open ecg.png", io);

        assert!(err.to_string().contains("ecg.png"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_dimensions_message() {
        let err = AnalysisError::InvalidDimensionsError { width: 0, height: 12 };
        assert_eq!(
            err.to_string(),
            "Invalid image dimensions: 0x12 (both must be non-zero)"
        );
        assert!(err.user_message().contains("0x12"));
    }

    #[test]
    fn test_invalid_parameter_helper() {
        let err = AnalysisError::invalid_parameter("extraction.smoothing_window", 14);
        match err {
            AnalysisError::InvalidParameter { parameter, value } => {
                assert_eq!(parameter, "extraction.smoothing_window");
                assert_eq!(value, "14");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
