//! REST API routes for the web server
//!
//! Provides endpoints for garment scanning, skin tone profiling, color
//! recommendations, and health checks.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::API_PREFIX;
use crate::color::ColorName;
use crate::color_theory::{MatchReport, MixMatchRecommender};
use crate::curation::{weekly_curation, WeeklyCuration};
use crate::garment::{GarmentProcessor, GarmentType, Measurement};
use crate::outcome::Outcome;
use crate::skin_tone::{PaletteColor, ProfileAnalyzer, ProfileReport, SkinTone, Undertone};
use crate::util::{file_stem, sanitize_filename};

/// Upload content types accepted by the image endpoints
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

const INVALID_TYPE_DETAILED: &str = "Invalid file type. Accepted: JPEG, PNG, WebP";
const INVALID_TYPE: &str = "Invalid file type";
const INVALID_UNDERTONE: &str = "Undertone must be: Warm, Cool, or Neutral";
const INVALID_COLOR: &str = "Color must be in hex format (e.g., #FF0000)";

/// Application state shared across handlers
pub struct AppState {
    pub version: String,
    /// Maximum accepted file size in bytes
    pub upload_limit: usize,
    pub garment: GarmentProcessor,
    pub profile: ProfileAnalyzer,
    pub recommender: MixMatchRecommender,
}

impl AppState {
    pub fn new(upload_limit: usize) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            upload_limit,
            garment: GarmentProcessor::new(),
            profile: ProfileAnalyzer::new(),
            recommender: MixMatchRecommender::new(),
        }
    }
}

/// Build the API router
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/detailed", get(health_check_detailed))
        .route("/scan/accurate", post(scan_accurate))
        .route("/scan/quick", post(scan_quick))
        .route("/profile/skin-tone", post(profile_skin_tone))
        .route("/profile/analyze", post(profile_analyze))
        .route("/recommend/instant", get(recommend_instant))
        .route("/recommend/weekly", get(recommend_weekly))
        .route("/recommend/save-preference", post(save_preference))
}

/// Build the root router
pub fn web_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(root))
}

// ============================================================
// Health
// ============================================================

/// Service banner
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: String,
    pub health: String,
}

async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "LokaFit Backend API - AI Engine",
        version: state.version.clone(),
        health: format!("{}/health", API_PREFIX),
    })
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: String,
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "LokaFit Backend is running",
        version: state.version.clone(),
    })
}

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub api: &'static str,
    pub ai_garment: &'static str,
    pub ai_profile: &'static str,
    pub ai_recommend: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    pub status: &'static str,
    pub services: ServiceStatus,
}

async fn health_check_detailed() -> Json<DetailedHealthResponse> {
    Json(DetailedHealthResponse {
        status: "healthy",
        services: ServiceStatus {
            api: "running",
            ai_garment: "ready",
            ai_profile: "ready",
            ai_recommend: "ready",
        },
    })
}

// ============================================================
// Uploads
// ============================================================

/// A file read from the `file` multipart field
#[derive(Debug)]
struct Upload {
    filename: String,
    data: Bytes,
}

/// Read the `file` field.
///
/// When `type_error` is set, a content type outside [`ALLOWED_CONTENT_TYPES`]
/// is rejected with that message before the body is read.
async fn read_upload(
    multipart: &mut Multipart,
    limit: usize,
    type_error: Option<&'static str>,
) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some("file") {
            continue;
        }

        if let Some(message) = type_error {
            let allowed = field
                .content_type()
                .is_some_and(|ct| ALLOWED_CONTENT_TYPES.contains(&ct));
            if !allowed {
                return Err(AppError::BadRequest(message.to_string()));
            }
        }

        // Sanitize filename to prevent path traversal attacks
        let filename = sanitize_filename(field.file_name().unwrap_or("upload"));
        let data = field.bytes().await.map_err(|e| multipart_error(e, limit))?;

        if data.len() > limit {
            return Err(AppError::PayloadTooLarge(limit));
        }

        debug!(%filename, size = data.len(), "upload received");
        return Ok(Upload { filename, data });
    }

    Err(AppError::BadRequest("No file uploaded".to_string()))
}

fn multipart_error(e: MultipartError, limit: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(limit)
    } else {
        AppError::BadRequest(e.body_text())
    }
}

/// Run CPU-bound analysis on the blocking pool
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Analysis task failed: {}", e)))
}

// ============================================================
// Scan
// ============================================================

/// Accurate scan response
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub garment_id: String,
    pub color_hex: String,
    pub color_name: ColorName,
    pub garment_type: GarmentType,
    pub measurements: Measurement,
    pub confidence: f64,
    pub image_url: String,
}

/// Quick scan response
#[derive(Debug, Serialize)]
pub struct QuickScanResponse {
    pub color_hex: String,
    pub color_name: ColorName,
    pub confidence: f64,
}

async fn scan_accurate(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ScanResponse>, AppError> {
    let upload = read_upload(&mut multipart, state.upload_limit, Some(INVALID_TYPE_DETAILED)).await?;
    let processor = state.garment;
    let data = upload.data;
    let outcome = run_blocking(move || processor.process_garment(&data)).await?;
    let (report, confidence) = outcome.into_result().map_err(AppError::BadRequest)?;

    info!(file = %upload.filename, color = %report.color_hex, "garment scanned");
    Ok(Json(ScanResponse {
        garment_id: format!("garment_{}", file_stem(&upload.filename)),
        color_hex: report.color_hex,
        color_name: report.color_name,
        garment_type: report.garment_type,
        measurements: report.measurements,
        confidence,
        image_url: format!("/images/{}", upload.filename),
    }))
}

async fn scan_quick(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<QuickScanResponse>, AppError> {
    let upload = read_upload(&mut multipart, state.upload_limit, Some(INVALID_TYPE)).await?;
    let processor = state.garment;
    let outcome = run_blocking(move || processor.process_garment(&upload.data)).await?;
    let (report, confidence) = outcome.into_result().map_err(AppError::BadRequest)?;

    Ok(Json(QuickScanResponse {
        color_hex: report.color_hex,
        color_name: report.color_name,
        confidence,
    }))
}

// ============================================================
// Profile
// ============================================================

/// Skin tone response
#[derive(Debug, Serialize)]
pub struct SkinToneResponse {
    pub user_id: String,
    pub skin_tone: SkinTone,
    pub undertone: Undertone,
    pub recommended_colors: Vec<PaletteColor>,
    pub confidence: f64,
}

async fn profile_skin_tone(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<SkinToneResponse>, AppError> {
    let upload = read_upload(&mut multipart, state.upload_limit, Some(INVALID_TYPE_DETAILED)).await?;
    let analyzer = state.profile;
    let data = upload.data;
    let outcome = run_blocking(move || analyzer.analyze_skin_tone(&data)).await?;
    let (report, confidence) = outcome.into_result().map_err(AppError::BadRequest)?;

    info!(file = %upload.filename, undertone = %report.undertone, "skin tone analyzed");
    Ok(Json(SkinToneResponse {
        user_id: format!("user_{}", file_stem(&upload.filename)),
        skin_tone: report.skin_tone,
        undertone: report.undertone,
        recommended_colors: report.recommended_colors,
        confidence,
    }))
}

async fn profile_analyze(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Outcome<ProfileReport>>, AppError> {
    let upload = read_upload(&mut multipart, state.upload_limit, None).await?;
    let analyzer = state.profile;
    let outcome = run_blocking(move || analyzer.analyze_skin_tone(&upload.data)).await?;

    if !outcome.is_success() {
        let message = outcome
            .message
            .unwrap_or_else(|| "Failed to analyze profile".to_string());
        return Err(AppError::BadRequest(message));
    }
    Ok(Json(outcome))
}

// ============================================================
// Recommendations
// ============================================================

fn default_undertone() -> String {
    Undertone::Neutral.as_str().to_string()
}

fn default_liked() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct InstantQuery {
    pub item_color: String,
    #[serde(default = "default_undertone")]
    pub undertone: String,
}

#[derive(Debug, Deserialize)]
pub struct WeeklyQuery {
    pub user_id: String,
    #[serde(default = "default_undertone")]
    pub undertone: String,
}

#[derive(Debug, Deserialize)]
pub struct PreferenceQuery {
    pub user_id: String,
    pub item_id: String,
    #[serde(default = "default_liked")]
    pub liked: bool,
}

/// Preference acknowledgment
#[derive(Debug, Serialize)]
pub struct PreferenceResponse {
    pub status: &'static str,
    pub message: String,
    pub user_id: String,
}

fn validate_undertone(label: &str) -> Result<Undertone, AppError> {
    Undertone::from_label(label).ok_or_else(|| AppError::BadRequest(INVALID_UNDERTONE.to_string()))
}

fn validate_hex(color: &str) -> Result<(), AppError> {
    if color.starts_with('#') && color.len() == 7 {
        Ok(())
    } else {
        Err(AppError::BadRequest(INVALID_COLOR.to_string()))
    }
}

async fn recommend_instant(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InstantQuery>,
) -> Result<Json<Outcome<MatchReport>>, AppError> {
    let undertone = validate_undertone(&query.undertone)?;
    validate_hex(&query.item_color)?;

    let outcome = state
        .recommender
        .get_instant_match(&query.item_color, undertone.as_str());
    if !outcome.is_success() {
        let message = outcome
            .message
            .unwrap_or_else(|| "Failed to generate recommendations".to_string());
        return Err(AppError::BadRequest(message));
    }
    Ok(Json(outcome))
}

async fn recommend_weekly(Query(query): Query<WeeklyQuery>) -> Result<Json<WeeklyCuration>, AppError> {
    validate_undertone(&query.undertone)?;
    let today = chrono::Utc::now().date_naive();
    Ok(Json(weekly_curation(&query.user_id, today)))
}

async fn save_preference(Query(query): Query<PreferenceQuery>) -> Json<PreferenceResponse> {
    let verdict = if query.liked { "liked" } else { "disliked" };
    info!(user_id = %query.user_id, item_id = %query.item_id, verdict, "preference received");
    Json(PreferenceResponse {
        status: "success",
        message: format!("Preference saved: item {} {}", query.item_id, verdict),
        user_id: query.user_id,
    })
}

// ============================================================
// Errors
// ============================================================

/// API error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    /// Upload larger than the limit in bytes
    PayloadTooLarge(usize),
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            AppError::BadRequest(msg) | AppError::Internal(msg) => msg.clone(),
            AppError::PayloadTooLarge(limit) => {
                format!("File too large. Max size: {} bytes", limit)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        let status = self.status();
        let message = self.message();
        match &self {
            AppError::Internal(_) => error!(%status, "{}", message),
            _ => warn!(%status, "{}", message),
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
