//! lokafit - Fashion color analysis engine
//!
//! Heuristic image and color analysis behind a small HTTP API: garment color,
//! size and type extraction, skin tone and undertone profiling, and color
//! theory based outfit matching.
//!
//! # Features
//!
//! - **Color Names** ([`color`]) - RGB/hex conversion and ordered named ranges
//! - **Garment Scanning** ([`garment`]) - Dominant color, shape measurement, garment type
//! - **Skin Tone Profiling** ([`skin_tone`]) - Undertone, brightness bucket, palette
//! - **Color Theory** ([`color_theory`]) - HSV harmonies and ranked recommendations
//! - **Weekly Curation** ([`curation`]) - Five-day outfit palette rotation
//! - **HTTP API** (`web`, feature `web`) - axum server exposing all of the above
//!
//! # Quick Start
//!
//! ```rust
//! use lokafit::MixMatchRecommender;
//!
//! let outcome = MixMatchRecommender::new().get_instant_match("#FF0000", "Warm");
//! let (report, confidence) = outcome.into_result().unwrap();
//! assert_eq!(report.recommendations.len(), 5);
//! assert_eq!(confidence, 0.88);
//! ```
//!
//! Image entry points take encoded bytes and never fail; errors are reported
//! in the [`Outcome`] envelope:
//!
//! ```rust
//! use lokafit::GarmentProcessor;
//!
//! let outcome = GarmentProcessor::new().process_garment(b"not an image");
//! assert!(!outcome.is_success());
//! assert_eq!(outcome.confidence, 0.0);
//! ```
//!
//! # Architecture
//!
//! ```text
//! image bytes -> decode -> garment   (dominant color, contours, type)
//!                       -> skin_tone (central crop mean, undertone)
//! hex + undertone       -> color_theory (HSV harmonies, ranking)
//! ```
//!
//! # License
//!
//! AGPL-3.0

pub mod cli;
pub mod color;
pub mod color_theory;
pub mod config;
pub mod curation;
pub mod garment;
pub mod outcome;
pub mod skin_tone;
pub mod util;

#[cfg(feature = "web")]
pub mod web;

// Re-exports for convenience
pub use cli::{Cli, CliError, Commands, ExitCode, MatchArgs, ProfileArgs, ScanArgs};
pub use color::{resolve_name, ColorName, HexParseError, RgbColor};
pub use color_theory::{
    hex_to_hsv, hsv_to_hex, recommend, ColorRecommendation, ColorTheoryError, Hsv, MatchReport,
    MixMatchRecommender, Theory,
};
pub use config::{CliOverrides, Config, ConfigError, Environment};
pub use curation::{weekly_curation, DailyOutfit, WeeklyCuration};
pub use garment::{
    analyze_shape, classify_type, extract_dominant, DominantColor, GarmentError, GarmentProcessor,
    GarmentReport, GarmentType, Measurement,
};
pub use outcome::{Outcome, Status};
pub use skin_tone::{
    classify_skin, PaletteColor, ProfileAnalyzer, ProfileError, ProfileReport, SkinProfile,
    SkinTone, Undertone,
};
pub use util::{ensure_file_exists, file_stem, format_duration, format_file_size, sanitize_filename};

#[cfg(feature = "web")]
pub use cli::ServeArgs;
#[cfg(feature = "web")]
pub use web::{CorsConfig, ServerConfig, WebServer};
