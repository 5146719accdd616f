//! Size-budgeted image compression.
//!
//! The search is bounded and monotonic rather than a bisection:
//!
//! 1. Encode the original-resolution image as JPEG at quality 95 and step the
//!    quality down by 5 while the output is over budget and quality >= 30.
//! 2. If still over budget, shrink both dimensions by 0.9 (Lanczos3) and
//!    re-encode at the last quality from step 1, until the budget is met or
//!    either side reaches 200px.
//!
//! An image that never fits is returned oversized rather than rejected.

use creative_core::config::OptimizerConfig;
use creative_core::{CreativeError, CreativeResult};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;

const START_QUALITY: u8 = 95;
const QUALITY_FLOOR: u8 = 30;
const QUALITY_STEP: u8 = 5;
const MIN_DIMENSION: u32 = 200;
const SHRINK_FACTOR: f64 = 0.9;
/// Reported for lossless PNG output.
const LOSSLESS_QUALITY: u8 = 100;

/// Requested container. Advisory: only honoured when the lossless encoding
/// already fits the budget, otherwise the output is JPEG.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Parse a format name; anything unrecognised falls back to JPEG.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "png" => Self::Png,
            _ => Self::Jpeg,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// Compressed output of [`optimize`].
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    pub bytes: Vec<u8>,
    pub size_bytes: usize,
    /// Quality of the last successful encode.
    pub quality: u8,
    /// Container actually produced.
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

/// Optimizer preloaded with the configured defaults.
#[derive(Debug, Clone)]
pub struct ImageOptimizer {
    default_max_kb: u32,
    default_format: OutputFormat,
}

impl ImageOptimizer {
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            default_max_kb: config.default_max_kb,
            default_format: OutputFormat::from_name(&config.default_format),
        }
    }

    /// Optimize with optional per-call overrides of the budget and format.
    pub fn optimize(
        &self,
        raw: &[u8],
        max_kb: Option<u32>,
        format: Option<OutputFormat>,
    ) -> CreativeResult<OptimizedImage> {
        optimize(
            raw,
            max_kb.unwrap_or(self.default_max_kb),
            format.unwrap_or(self.default_format),
        )
    }
}

impl Default for ImageOptimizer {
    fn default() -> Self {
        Self::new(&OptimizerConfig::default())
    }
}

/// Compress `raw` image bytes to fit within `max_kb` kilobytes.
///
/// Fails only when the input cannot be decoded. Alpha is discarded before
/// encoding.
pub fn optimize(raw: &[u8], max_kb: u32, format: OutputFormat) -> CreativeResult<OptimizedImage> {
    let decoded =
        image::load_from_memory(raw).map_err(|e| CreativeError::Decode(e.to_string()))?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    let max_bytes = max_kb as usize * 1024;

    metrics::counter!("imaging.optimize").increment(1);

    if format == OutputFormat::Png {
        let png = encode_png(&rgb)?;
        if png.len() <= max_bytes {
            info!(size_bytes = png.len(), width, height, "image fits as lossless PNG");
            return Ok(OptimizedImage {
                size_bytes: png.len(),
                bytes: png,
                quality: LOSSLESS_QUALITY,
                format: OutputFormat::Png,
                width,
                height,
            });
        }
        debug!(
            size_bytes = png.len(),
            max_bytes, "lossless PNG over budget, falling back to JPEG"
        );
    }

    // Phase 1: quality reduction at the original resolution.
    let mut quality = START_QUALITY;
    let mut data = encode_jpeg(&rgb, quality)?;
    while data.len() > max_bytes && quality >= QUALITY_FLOOR {
        quality -= QUALITY_STEP;
        data = encode_jpeg(&rgb, quality)?;
    }

    // Phase 2: progressive downscale at the last quality.
    let (mut w, mut h) = (width, height);
    while data.len() > max_bytes && w > MIN_DIMENSION && h > MIN_DIMENSION {
        w = (w as f64 * SHRINK_FACTOR) as u32;
        h = (h as f64 * SHRINK_FACTOR) as u32;
        let resized = imageops::resize(&rgb, w, h, FilterType::Lanczos3);
        data = encode_jpeg(&resized, quality)?;
        debug!(width = w, height = h, size_bytes = data.len(), "downscaled");
    }

    if data.len() > max_bytes {
        info!(
            size_bytes = data.len(),
            max_bytes, quality, "image still over budget at quality and size floors"
        );
    } else {
        info!(size_bytes = data.len(), quality, width = w, height = h, "image optimized");
    }

    Ok(OptimizedImage {
        size_bytes: data.len(),
        bytes: data,
        quality,
        format: OutputFormat::Jpeg,
        width: w,
        height: h,
    })
}

fn encode_jpeg(image: &RgbImage, quality: u8) -> CreativeResult<Vec<u8>> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode_image(image)
        .map_err(|e| CreativeError::Encode(e.to_string()))?;
    Ok(buf)
}

fn encode_png(image: &RgbImage) -> CreativeResult<Vec<u8>> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| CreativeError::Encode(e.to_string()))?;
    Ok(buf)
}
