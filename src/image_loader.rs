//! Image input handling
//!
//! Callers hand the pipeline an already decoded image, a file path or raw
//! encoded bytes (an upload). Decoding happens exactly once, at pipeline
//! entry, through the `image` crate.
//!
//! ## Supported Formats
//!
//! JPEG and PNG scans are the expected input; any other format enabled in
//! the `image` crate (BMP, GIF, TIFF, WebP, ...) is accepted as well. The
//! format is sniffed from the content, so uploads without a file name work.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};

use crate::error::{AnalysisError, Result};

/// Image handed to the pipeline
#[derive(Debug, Clone, Copy)]
pub enum ImageSource<'a> {
    /// Already decoded raster
    Decoded(&'a DynamicImage),
    /// File on disk
    Path(&'a Path),
    /// Encoded image bytes
    Bytes(&'a [u8]),
}

impl<'a> ImageSource<'a> {
    /// Decode the source, borrowing when it is already decoded
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InputError` if the file cannot be opened or
    /// the content is not a decodable image.
    pub fn decode(self) -> Result<Cow<'a, DynamicImage>> {
        match self {
            ImageSource::Decoded(image) => Ok(Cow::Borrowed(image)),
            ImageSource::Path(path) => load_image(path).map(Cow::Owned),
            ImageSource::Bytes(bytes) => decode_image(bytes).map(Cow::Owned),
        }
    }
}

impl<'a> From<&'a DynamicImage> for ImageSource<'a> {
    fn from(image: &'a DynamicImage) -> Self {
        ImageSource::Decoded(image)
    }
}

impl<'a> From<&'a Path> for ImageSource<'a> {
    fn from(path: &'a Path) -> Self {
        ImageSource::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for ImageSource<'a> {
    fn from(path: &'a PathBuf) -> Self {
        ImageSource::Path(path.as_path())
    }
}

impl<'a> From<&'a [u8]> for ImageSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ImageSource::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for ImageSource<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        ImageSource::Bytes(bytes.as_slice())
    }
}

/// Load and decode an image file
///
/// # Example
///
/// ```rust,no_run
/// use ecg_scan::image_loader::load_image;
/// use std::path::Path;
///
/// let image = load_image(Path::new("ecg.png"))?;
/// println!("Loaded ECG: {}x{}", image.width(), image.height());
/// # Ok::<(), ecg_scan::AnalysisError>(())
/// ```
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let reader = ImageReader::open(path).map_err(|e| {
        AnalysisError::input(format!("Failed to open image file: {}", path.display()), e)
    })?;

    let reader = reader.with_guessed_format().map_err(|e| {
        AnalysisError::input(format!("Failed to read image file: {}", path.display()), e)
    })?;

    let image = reader.decode().map_err(|e| {
        AnalysisError::input(format!("Failed to decode image: {}", path.display()), e)
    })?;

    log::debug!(
        "Loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Decode an encoded image held in memory
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes)
        .map_err(|e| AnalysisError::input(format!("Failed to decode {} byte upload", bytes.len()), e))
}

/// File extensions offered to operators when uploading scans
pub fn supported_extensions() -> &'static [&'static str] {
    &["jpg", "jpeg", "png", "bmp", "gif", "tif", "tiff", "webp"]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}
