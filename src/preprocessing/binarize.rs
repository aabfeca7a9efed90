//! Grayscale, inversion, thresholding and morphological cleanup
//!
//! Turns a scanned or photographed ECG sheet into a binary raster in which
//! trace pixels are 255 and paper/grid pixels are 0:
//! - Converts to single-channel grayscale with Rec. 601 luma weights
//! - Inverts so dark ink becomes bright
//! - Binarizes with a fixed threshold
//! - Closes then opens with a small square element to fill gaps and drop speckle

use image::{imageops, DynamicImage, GrayImage, Luma};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, open};

use crate::config::PreprocessingConfig;

/// Binary single-channel raster produced by the preprocessor
pub type RasterImage = GrayImage;

/// Converts input images into clean binary rasters
#[derive(Debug, Clone)]
pub struct Preprocessor {
    binary_threshold: u8,
    morph_radius: u8,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor {
    /// Create a preprocessor with default parameters
    pub fn new() -> Self {
        Self::from_config(&PreprocessingConfig::default())
    }

    pub fn from_config(config: &PreprocessingConfig) -> Self {
        Self {
            binary_threshold: config.binary_threshold,
            morph_radius: config.morph_radius,
        }
    }

    /// Produce the binary raster for `image`
    ///
    /// # Arguments
    ///
    /// * `image` - Decoded ECG sheet, any color type
    ///
    /// # Returns
    ///
    /// Raster with the same dimensions, every pixel either 0 or 255
    pub fn process(&self, image: &DynamicImage) -> RasterImage {
        // Step 1: Grayscale
        let mut gray = luma_rec601(image);

        // Step 2: Ink becomes high-valued
        imageops::invert(&mut gray);

        // Step 3: Fixed-threshold binarization
        let binary = threshold(&gray, self.binary_threshold, ThresholdType::Binary);

        if binary.width() == 0 || binary.height() == 0 || self.morph_radius == 0 {
            return binary;
        }

        // Step 4: Fill small gaps, then remove speckle
        let closed = close(&binary, Norm::LInf, self.morph_radius);
        let cleaned = open(&closed, Norm::LInf, self.morph_radius);

        log::debug!(
            "Preprocessed {}x{} image (threshold {}, radius {})",
            cleaned.width(),
            cleaned.height(),
            self.binary_threshold,
            self.morph_radius
        );

        cleaned
    }
}

/// Rec. 601 luma (0.299 R + 0.587 G + 0.114 B) in 16-bit fixed point
///
/// `DynamicImage::to_luma8` weights channels as Rec. 709, which darkens
/// reds. Pink and red grid paper sits close to the binarization threshold.
/// Alpha is ignored.
pub fn luma_rec601(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let weighted = u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471;
        Luma([((weighted + 0x8000) >> 16) as u8])
    })
}
