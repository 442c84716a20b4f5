//! Garment analysis module
//!
//! Extracts the dominant color, the foreground shape measurements and a
//! coarse garment type from a single garment photo.
//!
//! # Pipeline
//!
//! ```text
//! bytes -> decode -> resize 150x150 -> mean color -> hex + name
//!               \-> luminance -> threshold(>127) -> contours -> largest bbox
//!               \-> aspect ratio -> wide / long / standard
//! ```
//!
//! # Example
//!
//! ```rust
//! use image::{DynamicImage, Rgb, RgbImage};
//! use lokafit::garment::{classify_type, extract_dominant, GarmentType};
//!
//! let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 200, Rgb([20, 40, 200])));
//! let dominant = extract_dominant(&img);
//! assert_eq!(dominant.hex, "#1428C8");
//! assert_eq!(classify_type(&img), GarmentType::Wide);
//! ```

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use imageproc::contours::{find_contours, Contour};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

use crate::color::{luminance, ColorName, RgbColor};
use crate::outcome::Outcome;

// ============================================================
// Constants
// ============================================================

/// Side length of the square canvas sampled for the dominant color
pub const SAMPLE_SIZE: u32 = 150;

/// Luminance above which a pixel counts as foreground
pub const BINARY_THRESHOLD: u8 = 127;

/// Aspect ratio above which a garment is "wide"
const WIDE_RATIO: f64 = 1.2;

/// Aspect ratio below which a garment is "long"
const LONG_RATIO: f64 = 0.8;

/// Confidence attached to a successful garment analysis
pub const GARMENT_CONFIDENCE: f64 = 0.85;

// ============================================================
// Error Types
// ============================================================

/// Garment analysis error types
#[derive(Debug, Error)]
pub enum GarmentError {
    #[error("Invalid image format: {0}")]
    InvalidImage(String),

    #[error("Image has zero size")]
    EmptyImage,
}

pub type Result<T> = std::result::Result<T, GarmentError>;

// ============================================================
// Data Structures
// ============================================================

/// Coarse garment type from the image aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GarmentType {
    /// Wider than tall, e.g. a jacket laid flat
    Wide,
    /// Taller than wide, e.g. pants or a skirt
    Long,
    /// Roughly square, e.g. a shirt
    Standard,
}

impl GarmentType {
    /// Classify from image dimensions; a zero height yields ratio 0
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        let ratio = if height > 0 {
            width as f64 / height as f64
        } else {
            0.0
        };

        if ratio > WIDE_RATIO {
            GarmentType::Wide
        } else if ratio < LONG_RATIO {
            GarmentType::Long
        } else {
            GarmentType::Standard
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GarmentType::Wide => "wide",
            GarmentType::Long => "long",
            GarmentType::Standard => "standard",
        }
    }
}

impl fmt::Display for GarmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representative color of a garment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DominantColor {
    pub hex: String,
    pub name: ColorName,
    #[serde(skip)]
    pub rgb: RgbColor,
}

/// Foreground shape measurements in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Measurement {
    pub width_px: u32,
    pub height_px: u32,
    pub area_px: u64,
    pub image_width: u32,
    pub image_height: u32,
}

impl Measurement {
    /// Full image bounds, used when no foreground shape is found
    pub fn full_image(width: u32, height: u32) -> Self {
        Self {
            width_px: width,
            height_px: height,
            area_px: width as u64 * height as u64,
            image_width: width,
            image_height: height,
        }
    }
}

/// Garment analysis payload
#[derive(Debug, Clone, Serialize)]
pub struct GarmentReport {
    pub color_hex: String,
    pub color_name: ColorName,
    pub measurements: Measurement,
    pub garment_type: GarmentType,
}

// ============================================================
// Dominant Color
// ============================================================

/// Extract the dominant color.
///
/// The image is resampled to a fixed 150x150 canvas and reduced to a single
/// cluster centroid. With one cluster the centroid is the mean of all
/// samples, so the mean is computed directly and truncated to integers.
pub fn extract_dominant(image: &DynamicImage) -> DominantColor {
    let sample = imageops::resize(&image.to_rgb8(), SAMPLE_SIZE, SAMPLE_SIZE, FilterType::Triangle);

    let mut sums = [0u64; 3];
    for pixel in sample.pixels() {
        sums[0] += pixel.0[0] as u64;
        sums[1] += pixel.0[1] as u64;
        sums[2] += pixel.0[2] as u64;
    }

    // `image` decodes to RGB order already; no channel swap needed
    let count = (SAMPLE_SIZE * SAMPLE_SIZE) as u64;
    let [r, g, b] = sums.map(|s| (s / count) as u8);
    let rgb = RgbColor::new(r, g, b);

    DominantColor {
        hex: rgb.to_hex(),
        name: rgb.name(),
        rgb,
    }
}

// ============================================================
// Shape Analysis
// ============================================================

/// Binarize by BT.601 luminance: foreground (255) where luminance > 127
pub fn binarize(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let p = rgb.get_pixel(x, y);
        if luminance(p.0[0], p.0[1], p.0[2]) > BINARY_THRESHOLD {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Copy of a binary mask with a 1-px background border on every side
pub fn pad_binary(binary: &GrayImage) -> GrayImage {
    let (width, height) = binary.dimensions();
    GrayImage::from_fn(width + 2, height + 2, |x, y| {
        if x == 0 || y == 0 || x > width || y > height {
            Luma([0])
        } else {
            *binary.get_pixel(x - 1, y - 1)
        }
    })
}

/// Trace contours treating everything outside the image as background.
///
/// Points are in the coordinates of the unpadded mask.
pub fn trace_contours(binary: &GrayImage) -> Vec<Contour<i32>> {
    let mut contours = find_contours::<i32>(&pad_binary(binary));
    for contour in &mut contours {
        for p in &mut contour.points {
            p.x -= 1;
            p.y -= 1;
        }
    }
    contours
}

/// Enclosed polygon area of a contour (shoelace formula)
pub fn contour_area(contour: &Contour<i32>) -> f64 {
    let points = &contour.points;
    if points.len() < 3 {
        return 0.0;
    }

    let twice_area: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();

    twice_area.abs() as f64 / 2.0
}

/// Axis-aligned bounding box `(x, y, width, height)` of a contour
pub fn bounding_rect(contour: &Contour<i32>) -> (i32, i32, u32, u32) {
    if contour.points.is_empty() {
        return (0, 0, 0, 0);
    }

    let mut min_x = i32::MAX;
    let mut min_y = i32::MAX;
    let mut max_x = i32::MIN;
    let mut max_y = i32::MIN;

    for p in &contour.points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    (
        min_x,
        min_y,
        (max_x - min_x + 1) as u32,
        (max_y - min_y + 1) as u32,
    )
}

/// Measure the largest foreground shape.
///
/// Shapes touching the image edge are closed along the border. Falls back to
/// the full image bounds when the binary mask is uniform or has no contour.
pub fn analyze_shape(image: &DynamicImage) -> Measurement {
    let (width, height) = image.dimensions();
    let binary = binarize(image);

    let foreground = binary.pixels().filter(|p| p.0[0] > 0).count() as u64;
    let total = width as u64 * height as u64;
    if foreground == 0 || foreground == total {
        debug!(width, height, "Uniform binary mask, using full image bounds");
        return Measurement::full_image(width, height);
    }

    let contours = trace_contours(&binary);

    // First contour wins on equal area
    let mut largest: Option<(&Contour<i32>, f64)> = None;
    for contour in &contours {
        let area = contour_area(contour);
        if largest.map_or(true, |(_, best)| area > best) {
            largest = Some((contour, area));
        }
    }

    match largest {
        Some((contour, area)) => {
            let (x, y, w, h) = bounding_rect(contour);
            debug!(
                contours = contours.len(),
                x, y, w, h, area, "Selected largest contour"
            );
            Measurement {
                width_px: w,
                height_px: h,
                area_px: area as u64,
                image_width: width,
                image_height: height,
            }
        }
        None => Measurement::full_image(width, height),
    }
}

/// Classify the garment type from the image aspect ratio
pub fn classify_type(image: &DynamicImage) -> GarmentType {
    let (width, height) = image.dimensions();
    GarmentType::from_dimensions(width, height)
}

// ============================================================
// Garment Processor
// ============================================================

/// Stateless garment image processor
#[derive(Debug, Clone, Copy, Default)]
pub struct GarmentProcessor;

impl GarmentProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Analyze encoded image bytes, reporting failures in the envelope
    pub fn process_garment(&self, image_bytes: &[u8]) -> Outcome<GarmentReport> {
        match self.try_process(image_bytes) {
            Ok(report) => Outcome::success(report, GARMENT_CONFIDENCE),
            Err(e) => {
                warn!(error = %e, "Garment processing failed");
                Outcome::failure(e)
            }
        }
    }

    /// Analyze an already decoded image
    pub fn analyze_image(&self, image: &DynamicImage) -> Result<GarmentReport> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(GarmentError::EmptyImage);
        }

        let dominant = extract_dominant(image);
        let measurements = analyze_shape(image);
        let garment_type = classify_type(image);

        debug!(
            color = %dominant.hex,
            name = %dominant.name,
            garment_type = %garment_type,
            "Garment analyzed"
        );

        Ok(GarmentReport {
            color_hex: dominant.hex,
            color_name: dominant.name,
            measurements,
            garment_type,
        })
    }

    fn try_process(&self, image_bytes: &[u8]) -> Result<GarmentReport> {
        let image = image::load_from_memory(image_bytes)
            .map_err(|e| GarmentError::InvalidImage(e.to_string()))?;
        self.analyze_image(&image)
    }
}

// ============================================================
// Tests
// ============================================================
