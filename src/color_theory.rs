//! Color theory recommendation engine
//!
//! Derives matching colors for a garment color from classic hue-wheel
//! harmonies and ranks them for a wearer's undertone.
//!
//! # Harmonies
//!
//! | Theory        | Hue offsets     | Base weight |
//! |---------------|-----------------|-------------|
//! | complementary | +180            | 0.95        |
//! | analogous     | +30, -30        | 0.85        |
//! | triadic       | +120, +240      | 0.90        |
//!
//! Every derived hue is rendered at a fixed saturation of 0.8 and value of
//! 0.9; the source color's own saturation and value are discarded.
//!
//! # Example
//!
//! ```rust
//! use lokafit::color_theory::{recommend, Theory};
//!
//! let recs = recommend("#FF0000", "Warm").unwrap();
//! assert_eq!(recs.len(), 5);
//! assert_eq!(recs[0].theory, Theory::Complementary);
//! ```

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

use crate::color::{HexParseError, RgbColor};
use crate::outcome::Outcome;
use crate::skin_tone::Undertone;

// ============================================================
// Constants
// ============================================================

/// Saturation every recommended color is rendered at
pub const HARMONY_SATURATION: f64 = 0.8;

/// Value (brightness) every recommended color is rendered at
pub const HARMONY_VALUE: f64 = 0.9;

/// Confidence attached to a successful recommendation batch
pub const RECOMMEND_CONFIDENCE: f64 = 0.88;

/// Maximum number of recommendations returned
pub const MAX_RECOMMENDATIONS: usize = 5;

// ============================================================
// Error Types
// ============================================================

/// Color theory error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorTheoryError {
    #[error("Malformed color input: {0}")]
    MalformedColor(#[from] HexParseError),
}

pub type Result<T> = std::result::Result<T, ColorTheoryError>;

// ============================================================
// Data Structures
// ============================================================

/// HSV color: hue in [0, 360), saturation and value in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// Color harmony a recommendation was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theory {
    Complementary,
    Analogous,
    Triadic,
}

impl Theory {
    /// Score before the undertone boost
    pub fn base_weight(self) -> f64 {
        match self {
            Theory::Complementary => 0.95,
            Theory::Analogous => 0.85,
            Theory::Triadic => 0.90,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theory::Complementary => "complementary",
            Theory::Analogous => "analogous",
            Theory::Triadic => "triadic",
        }
    }
}

impl fmt::Display for Theory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single ranked recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorRecommendation {
    pub color_hex: String,
    pub match_score: f64,
    pub theory: Theory,
}

/// Instant match payload
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub item_color: String,
    pub recommendations: Vec<ColorRecommendation>,
}

// ============================================================
// HSV Conversion
// ============================================================

/// Normalize a hue into [0, 360)
fn normalize_hue(h: f64) -> f64 {
    let h = h.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

/// Convert an RGB color to HSV
pub fn rgb_to_hsv(color: RgbColor) -> Hsv {
    let r = color.r as f64 / 255.0;
    let g = color.g as f64 / 255.0;
    let b = color.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;

    let h = if d == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / d).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / d + 2.0)
    } else {
        60.0 * ((r - g) / d + 4.0)
    };

    let s = if max == 0.0 { 0.0 } else { d / max };

    Hsv {
        h: normalize_hue(h),
        s,
        v: max,
    }
}

/// Parse a hex color and convert it to HSV
pub fn hex_to_hsv(hex: &str) -> Result<Hsv> {
    Ok(rgb_to_hsv(RgbColor::from_hex(hex)?))
}

/// Convert HSV to RGB, rounding and clamping each channel
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> RgbColor {
    let h = normalize_hue(h);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |value: f64| ((value + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    RgbColor::new(channel(r), channel(g), channel(b))
}

/// Convert HSV to an uppercase `#RRGGBB` string
pub fn hsv_to_hex(h: f64, s: f64, v: f64) -> String {
    hsv_to_rgb(h, s, v).to_hex()
}

// ============================================================
// Harmonies
// ============================================================

/// Hue opposite on the color wheel
pub fn complementary(hue: f64) -> f64 {
    normalize_hue(hue + 180.0)
}

/// Hues adjacent on the color wheel (+30, -30)
pub fn analogous(hue: f64) -> [f64; 2] {
    [normalize_hue(hue + 30.0), normalize_hue(hue - 30.0)]
}

/// Hues evenly spaced around the wheel (+120, +240)
pub fn triadic(hue: f64) -> [f64; 2] {
    [normalize_hue(hue + 120.0), normalize_hue(hue + 240.0)]
}

/// Undertone multiplier for a label; unrecognized labels get 1.0
pub fn undertone_boost(label: &str) -> f64 {
    Undertone::from_label(label).map_or(1.0, Undertone::boost)
}

fn render(hue: f64) -> String {
    hsv_to_hex(hue, HARMONY_SATURATION, HARMONY_VALUE)
}

/// Derive and rank harmony colors for an item color and undertone label.
///
/// Produces one complementary, two analogous and two triadic colors, sorted
/// by descending score. Equal scores keep their derivation order.
pub fn recommend(item_hex: &str, undertone: &str) -> Result<Vec<ColorRecommendation>> {
    let hsv = hex_to_hsv(item_hex)?;
    let boost = undertone_boost(undertone);
    let [analog_up, analog_down] = analogous(hsv.h);
    let [triad_1, triad_2] = triadic(hsv.h);

    let candidates = [
        (complementary(hsv.h), Theory::Complementary),
        (analog_up, Theory::Analogous),
        (analog_down, Theory::Analogous),
        (triad_1, Theory::Triadic),
        (triad_2, Theory::Triadic),
    ];

    let mut recommendations: Vec<ColorRecommendation> = candidates
        .into_iter()
        .map(|(hue, theory)| ColorRecommendation {
            color_hex: render(hue),
            match_score: theory.base_weight() * boost,
            theory,
        })
        .collect();

    // sort_by is stable
    recommendations.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    recommendations.truncate(MAX_RECOMMENDATIONS);

    debug!(
        item = item_hex,
        undertone,
        hue = hsv.h,
        count = recommendations.len(),
        "Derived color recommendations"
    );

    Ok(recommendations)
}

// ============================================================
// Recommender
// ============================================================

/// Stateless color-theory recommender
#[derive(Debug, Clone, Copy, Default)]
pub struct MixMatchRecommender;

impl MixMatchRecommender {
    pub fn new() -> Self {
        Self
    }

    /// Ranked recommendations for an item color, reporting failures in the envelope
    pub fn get_instant_match(&self, item_hex: &str, undertone: &str) -> Outcome<MatchReport> {
        match recommend(item_hex, undertone) {
            Ok(recommendations) => Outcome::success(
                MatchReport {
                    item_color: item_hex.to_string(),
                    recommendations,
                },
                RECOMMEND_CONFIDENCE,
            ),
            Err(e) => {
                warn!(item = item_hex, error = %e, "Recommendation failed");
                Outcome::failure(e)
            }
        }
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "expected {} ~= {} (eps {})", a, b, eps);
    }

    fn assert_channels_within_one(a: &str, b: &str) {
        let a = RgbColor::from_hex(a).unwrap();
        let b = RgbColor::from_hex(b).unwrap();
        assert!((a.r as i16 - b.r as i16).abs() <= 1, "{} vs {}", a, b);
        assert!((a.g as i16 - b.g as i16).abs() <= 1, "{} vs {}", a, b);
        assert!((a.b as i16 - b.b as i16).abs() <= 1, "{} vs {}", a, b);
    }

    #[test]
    fn test_hex_to_hsv_primaries() {
        let red = hex_to_hsv("#FF0000").unwrap();
        assert_eq!(red, Hsv { h: 0.0, s: 1.0, v: 1.0 });

        let green = hex_to_hsv("#00FF00").unwrap();
        assert_close(green.h, 120.0, 1e-9);

        let blue = hex_to_hsv("0000FF").unwrap();
        assert_close(blue.h, 240.0, 1e-9);

        let magenta = hex_to_hsv("#FF00FF").unwrap();
        assert_close(magenta.h, 300.0, 1e-9);
    }

    #[test]
    fn test_hex_to_hsv_achromatic() {
        let black = hex_to_hsv("#000000").unwrap();
        assert_eq!(black, Hsv { h: 0.0, s: 0.0, v: 0.0 });

        let gray = hex_to_hsv("#808080").unwrap();
        assert_eq!(gray.h, 0.0);
        assert_eq!(gray.s, 0.0);
        assert_close(gray.v, 128.0 / 255.0, 1e-12);
    }

    #[test]
    fn test_hex_to_hsv_negative_sector_wraps() {
        // Red is max and blue > green: hue lands in (300, 360)
        let hsv = hex_to_hsv("#FF0080").unwrap();
        assert!(hsv.h > 300.0 && hsv.h < 360.0, "hue {}", hsv.h);
    }

    #[test]
    fn test_hsv_to_hex_sectors() {
        assert_eq!(hsv_to_hex(0.0, 1.0, 1.0), "#FF0000");
        assert_eq!(hsv_to_hex(60.0, 1.0, 1.0), "#FFFF00");
        assert_eq!(hsv_to_hex(120.0, 1.0, 1.0), "#00FF00");
        assert_eq!(hsv_to_hex(180.0, 1.0, 1.0), "#00FFFF");
        assert_eq!(hsv_to_hex(240.0, 1.0, 1.0), "#0000FF");
        assert_eq!(hsv_to_hex(300.0, 1.0, 1.0), "#FF00FF");
        assert_eq!(hsv_to_hex(0.0, 0.0, 0.0), "#000000");
        assert_eq!(hsv_to_hex(0.0, 0.0, 1.0), "#FFFFFF");
    }

    #[test]
    fn test_hsv_to_hex_wraps_hue() {
        assert_eq!(hsv_to_hex(360.0, 1.0, 1.0), "#FF0000");
        assert_eq!(hsv_to_hex(-120.0, 1.0, 1.0), "#0000FF");
    }

    #[test]
    fn test_round_trip_at_fixed_saturation_value() {
        for hue in [0.0, 60.0, 120.0, 180.0, 240.0, 300.0] {
            let hex = hsv_to_hex(hue, HARMONY_SATURATION, HARMONY_VALUE);
            let hsv = hex_to_hsv(&hex).unwrap();
            let again = hsv_to_hex(hsv.h, HARMONY_SATURATION, HARMONY_VALUE);
            assert_channels_within_one(&hex, &again);
            assert_close(hsv.s, HARMONY_SATURATION, 0.01);
            assert_close(hsv.v, HARMONY_VALUE, 0.01);
        }
    }

    #[test]
    fn test_harmony_offsets() {
        assert_eq!(complementary(0.0), 180.0);
        assert_eq!(complementary(270.0), 90.0);
        assert_eq!(analogous(0.0), [30.0, 330.0]);
        assert_eq!(analogous(350.0), [20.0, 320.0]);
        assert_eq!(triadic(200.0), [320.0, 80.0]);
    }

    #[test]
    fn test_complementary_of_red_is_cyan() {
        let hex = render(complementary(0.0));
        let rgb = RgbColor::from_hex(&hex).unwrap();
        assert!(rgb.g > 200 && rgb.b > 200 && rgb.r < 60, "got {}", hex);
        assert_eq!(rgb.g, rgb.b);

        let hsv = hex_to_hsv(&hex).unwrap();
        assert_close(hsv.h, 180.0, 1.0);
    }

    #[test]
    fn test_undertone_boost() {
        assert_eq!(undertone_boost("Warm"), 1.0);
        assert_eq!(undertone_boost("Cool"), 0.95);
        assert_eq!(undertone_boost("Neutral"), 0.90);
        assert_eq!(undertone_boost("Olive"), 1.0);
        assert_eq!(undertone_boost(""), 1.0);
    }

    #[test]
    fn test_recommend_red_warm() {
        let recs = recommend("#FF0000", "Warm").unwrap();
        assert_eq!(recs.len(), 5);
        assert!(recs.windows(2).all(|w| w[0].match_score >= w[1].match_score));

        assert_eq!(recs[0].theory, Theory::Complementary);
        assert_eq!(recs[0].match_score, 0.95);

        let theories: Vec<_> = recs.iter().map(|r| r.theory).collect();
        assert_eq!(
            theories,
            vec![
                Theory::Complementary,
                Theory::Triadic,
                Theory::Triadic,
                Theory::Analogous,
                Theory::Analogous,
            ]
        );
    }

    #[test]
    fn test_recommend_ties_keep_derivation_order() {
        let recs = recommend("#FF0000", "Warm").unwrap();
        // triadic +120 before +240, analogous +30 before -30
        assert_eq!(recs[1].color_hex, render(120.0));
        assert_eq!(recs[2].color_hex, render(240.0));
        assert_eq!(recs[3].color_hex, render(30.0));
        assert_eq!(recs[4].color_hex, render(330.0));
    }

    #[test]
    fn test_recommend_applies_boost() {
        let neutral = recommend("#3498DB", "Neutral").unwrap();
        assert_close(neutral[0].match_score, 0.95 * 0.90, 1e-12);
        assert_close(neutral[4].match_score, 0.85 * 0.90, 1e-12);

        let cool = recommend("#3498DB", "Cool").unwrap();
        assert_close(cool[1].match_score, 0.90 * 0.95, 1e-12);

        let unknown = recommend("#3498DB", "Olive").unwrap();
        assert_eq!(unknown[0].match_score, 0.95);
    }

    #[test]
    fn test_recommend_discards_source_saturation() {
        let pale = recommend("#FFCCCC", "Warm").unwrap();
        let vivid = recommend("#FF0000", "Warm").unwrap();
        assert_eq!(pale, vivid);
    }

    #[test]
    fn test_recommend_malformed() {
        assert!(matches!(
            recommend("#ZZZ", "Warm"),
            Err(ColorTheoryError::MalformedColor(_))
        ));
        assert!(recommend("#12345G", "Warm").is_err());
        assert!(recommend("", "Warm").is_err());
    }

    #[test]
    fn test_get_instant_match_success() {
        let outcome = MixMatchRecommender::new().get_instant_match("#FF0000", "Cool");
        assert!(outcome.is_success());
        assert_eq!(outcome.confidence, RECOMMEND_CONFIDENCE);
        let report = outcome.data.unwrap();
        assert_eq!(report.item_color, "#FF0000");
        assert_eq!(report.recommendations.len(), 5);
    }

    #[test]
    fn test_get_instant_match_failure_envelope() {
        let outcome = MixMatchRecommender::new().get_instant_match("#ZZZ", "Warm");
        assert!(!outcome.is_success());
        assert_eq!(outcome.confidence, 0.0);
        assert!(outcome.data.is_none());

        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"status\":\"error\""));
        assert!(json.contains("\"confidence\":0.0"));
    }

    #[test]
    fn test_recommendation_serialize() {
        let rec = ColorRecommendation {
            color_hex: "#2EE6E6".to_string(),
            match_score: 0.95,
            theory: Theory::Complementary,
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(
            json,
            r##"{"color_hex":"#2EE6E6","match_score":0.95,"theory":"complementary"}"##
        );
    }
}
