use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use imageproc::contrast::{self, ThresholdType};
use imageproc::filter::gaussian_blur_f32;
use labscan_core::PreprocessConfig;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

/// A report image after normalization.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    /// Colour image at the target size, for layout-aware models.
    pub resized: DynamicImage,
    /// Blurred, binarized grayscale image for OCR.
    pub binary: GrayImage,
    /// Cutoff used for binarization.
    pub threshold: u8,
}

impl PreparedImage {
    /// Encode the binarized image as PNG bytes for an OCR backend.
    pub fn to_png(&self) -> Result<Vec<u8>, PreprocessError> {
        let mut buf = Vec::new();
        self.binary
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| PreprocessError::Encode(e.to_string()))?;
        Ok(buf)
    }
}

/// Load an image file and normalize it for OCR.
pub fn prepare_for_ocr(path: &Path, config: &PreprocessConfig) -> Result<PreparedImage, PreprocessError> {
    let img = image::open(path)?;
    Ok(normalize(img, config))
}

/// Decode raw image bytes (PNG / JPEG / …) and normalize them for OCR.
pub fn prepare_for_ocr_from_bytes(
    data: &[u8],
    config: &PreprocessConfig,
) -> Result<PreparedImage, PreprocessError> {
    let img = image::load_from_memory(data)?;
    Ok(normalize(img, config))
}

/// Grayscale → resize → Gaussian blur → global threshold.
fn normalize(img: DynamicImage, config: &PreprocessConfig) -> PreparedImage {
    let size = config.size.max(1);

    let gray = imageops::resize(&img.to_luma8(), size, size, FilterType::Triangle);
    let blurred = if config.blur_sigma > 0.0 {
        gaussian_blur_f32(&gray, config.blur_sigma)
    } else {
        gray
    };

    let threshold = config.fixed_cutoff.unwrap_or_else(|| otsu_threshold(&blurred));
    let binary = binarize(&blurred, threshold);

    let resized = img.resize_exact(size, size, FilterType::Triangle);
    PreparedImage { resized, binary, threshold }
}

/// Pixels strictly above `threshold` become white, the rest black.
pub fn binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
    contrast::threshold(gray, threshold, ThresholdType::Binary)
}

/// Otsu's method: the gray level that maximizes between-class variance.
pub fn otsu_threshold(gray: &GrayImage) -> u8 {
    contrast::otsu_level(gray)
}
