//! Skin tone and undertone classification
//!
//! Averages the color of a fixed central crop (half the image height and
//! width, centered) and derives:
//!
//! - undertone from red vs. blue dominance (Warm / Cool / Neutral)
//! - skin tone from mean brightness (Light / Medium / Deep)
//!
//! There is no face detection or per-pixel skin segmentation; the central
//! crop stands in for the face region.
//!
//! # Example
//!
//! ```rust
//! use image::{DynamicImage, Rgb, RgbImage};
//! use lokafit::skin_tone::{classify_skin, SkinTone, Undertone};
//!
//! let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 40, Rgb([224, 172, 105])));
//! let profile = classify_skin(&img);
//! assert_eq!(profile.undertone, Undertone::Warm);
//! assert_eq!(profile.skin_tone, SkinTone::Medium);
//! ```

use image::{DynamicImage, RgbImage};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

use crate::outcome::Outcome;

// ============================================================
// Constants
// ============================================================

/// Brightness above which a sample is classified as Light
const LIGHT_BRIGHTNESS: f64 = 180.0;

/// Brightness above which a sample is classified as Medium
const MEDIUM_BRIGHTNESS: f64 = 120.0;

/// Confidence attached to a successful profile analysis
pub const PROFILE_CONFIDENCE: f64 = 0.80;

// ============================================================
// Error Types
// ============================================================

/// Profile analysis error types
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Invalid image format: {0}")]
    InvalidImage(String),
}

// ============================================================
// Data Structures
// ============================================================

/// Skin undertone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Undertone {
    Warm,
    Cool,
    Neutral,
}

impl Undertone {
    pub const ALL: [Undertone; 3] = [Undertone::Warm, Undertone::Cool, Undertone::Neutral];

    /// Parse an exact label ("Warm", "Cool", "Neutral")
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.as_str() == label)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Undertone::Warm => "Warm",
            Undertone::Cool => "Cool",
            Undertone::Neutral => "Neutral",
        }
    }

    /// Match score multiplier for recommendations
    pub fn boost(self) -> f64 {
        match self {
            Undertone::Warm => 1.0,
            Undertone::Cool => 0.95,
            Undertone::Neutral => 0.90,
        }
    }

    /// Flattering colors for this undertone
    pub fn palette(self) -> &'static [PaletteColor] {
        match self {
            Undertone::Warm => &WARM_PALETTE,
            Undertone::Cool => &COOL_PALETTE,
            Undertone::Neutral => &NEUTRAL_PALETTE,
        }
    }
}

impl fmt::Display for Undertone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Skin tone depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkinTone {
    Light,
    Medium,
    Deep,
}

impl SkinTone {
    /// Bucket a mean brightness value
    pub fn from_brightness(brightness: f64) -> Self {
        if brightness > LIGHT_BRIGHTNESS {
            SkinTone::Light
        } else if brightness > MEDIUM_BRIGHTNESS {
            SkinTone::Medium
        } else {
            SkinTone::Deep
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SkinTone::Light => "Light",
            SkinTone::Medium => "Medium",
            SkinTone::Deep => "Deep",
        }
    }
}

impl fmt::Display for SkinTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified skin profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkinProfile {
    pub skin_tone: SkinTone,
    pub undertone: Undertone,
}

/// Named palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteColor {
    pub name: &'static str,
    pub hex: &'static str,
}

const fn swatch(name: &'static str, hex: &'static str) -> PaletteColor {
    PaletteColor { name, hex }
}

static WARM_PALETTE: [PaletteColor; 5] = [
    swatch("Coral", "#FF6B6B"),
    swatch("Peach", "#FFAB91"),
    swatch("Gold", "#FFD700"),
    swatch("Rust", "#B7410E"),
    swatch("Earth Brown", "#8B6F47"),
];

static COOL_PALETTE: [PaletteColor; 5] = [
    swatch("Rose", "#FF69B4"),
    swatch("Lavender", "#E6E6FA"),
    swatch("Jewel Blue", "#0047AB"),
    swatch("Berry", "#661D5C"),
    swatch("Silver", "#C0C0C0"),
];

static NEUTRAL_PALETTE: [PaletteColor; 5] = [
    swatch("Navy", "#000080"),
    swatch("Burgundy", "#800020"),
    swatch("Olive", "#808000"),
    swatch("Taupe", "#B38B6D"),
    swatch("Black", "#000000"),
];

/// Pixel region `[x0, x1) x [y0, y1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Region {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

/// Skin profile analysis payload
#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub skin_tone: SkinTone,
    pub undertone: Undertone,
    pub recommended_colors: Vec<PaletteColor>,
}

// ============================================================
// Analysis
// ============================================================

/// Central crop spanning half the height and width, clamped to the image.
///
/// An axis too small to hold a non-empty crop uses its full extent.
pub fn central_region(width: u32, height: u32) -> Region {
    let span = |len: u32| {
        let center = len / 2;
        let margin = len / 4;
        let start = center.saturating_sub(margin);
        let end = (center + margin).min(len);
        if end > start {
            (start, end)
        } else {
            (0, len)
        }
    };

    let (x0, x1) = span(width);
    let (y0, y1) = span(height);
    Region { x0, y0, x1, y1 }
}

/// Mean RGB over a region, as floating point channels
pub fn mean_color(image: &RgbImage, region: Region) -> [f64; 3] {
    let count = region.width() as u64 * region.height() as u64;
    if count == 0 {
        return [0.0; 3];
    }

    let mut sums = [0u64; 3];
    for y in region.y0..region.y1 {
        for x in region.x0..region.x1 {
            let pixel = image.get_pixel(x, y);
            sums[0] += pixel.0[0] as u64;
            sums[1] += pixel.0[1] as u64;
            sums[2] += pixel.0[2] as u64;
        }
    }

    sums.map(|s| s as f64 / count as f64)
}

/// Undertone from red vs. blue dominance; exact ties are Neutral
pub fn undertone_of(rgb: [f64; 3]) -> Undertone {
    let [r, _, b] = rgb;
    if r > b {
        Undertone::Warm
    } else if b > r {
        Undertone::Cool
    } else {
        Undertone::Neutral
    }
}

/// Classify skin tone and undertone from the image's central crop
pub fn classify_skin(image: &DynamicImage) -> SkinProfile {
    let rgb_image = image.to_rgb8();
    let (width, height) = rgb_image.dimensions();
    let region = central_region(width, height);
    let rgb = mean_color(&rgb_image, region);
    let brightness = (rgb[0] + rgb[1] + rgb[2]) / 3.0;

    debug!(
        ?region,
        r = rgb[0],
        g = rgb[1],
        b = rgb[2],
        brightness,
        "Sampled skin region"
    );

    SkinProfile {
        skin_tone: SkinTone::from_brightness(brightness),
        undertone: undertone_of(rgb),
    }
}

/// Palette for an undertone label, defaulting to Neutral for unknown labels
pub fn recommended_palette(label: &str) -> &'static [PaletteColor] {
    Undertone::from_label(label)
        .unwrap_or(Undertone::Neutral)
        .palette()
}

// ============================================================
// Profile Analyzer
// ============================================================

/// Stateless skin profile analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileAnalyzer;

impl ProfileAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze encoded image bytes, reporting failures in the envelope
    pub fn analyze_skin_tone(&self, image_bytes: &[u8]) -> Outcome<ProfileReport> {
        match self.try_analyze(image_bytes) {
            Ok(report) => Outcome::success(report, PROFILE_CONFIDENCE),
            Err(e) => {
                warn!(error = %e, "Skin tone analysis failed");
                Outcome::failure(e)
            }
        }
    }

    /// Analyze an already decoded image
    pub fn analyze_image(&self, image: &DynamicImage) -> ProfileReport {
        let profile = classify_skin(image);
        ProfileReport {
            skin_tone: profile.skin_tone,
            undertone: profile.undertone,
            recommended_colors: profile.undertone.palette().to_vec(),
        }
    }

    fn try_analyze(&self, image_bytes: &[u8]) -> Result<ProfileReport, ProfileError> {
        let image = image::load_from_memory(image_bytes)
            .map_err(|e| ProfileError::InvalidImage(e.to_string()))?;
        Ok(self.analyze_image(&image))
    }
}

// ============================================================
// Tests
// ============================================================
