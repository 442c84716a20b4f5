//! HTTP API server
//!
//! Exposes the analysis engine over REST with axum. Enabled by the `web`
//! feature.
//!
//! # Endpoints
//!
//! ```text
//! GET  /                                  service banner
//! GET  /api/v1/health                     health check
//! GET  /api/v1/health/detailed            per-service status
//! POST /api/v1/scan/accurate              garment color, size, type (multipart "file")
//! POST /api/v1/scan/quick                 garment color only
//! POST /api/v1/profile/skin-tone          skin tone and palette
//! POST /api/v1/profile/analyze            full profile envelope
//! GET  /api/v1/recommend/instant          color theory matches
//! GET  /api/v1/recommend/weekly           weekly outfit curation
//! POST /api/v1/recommend/save-preference  preference acknowledgment
//! ```

pub mod cors;
pub mod routes;
pub mod server;

pub use cors::CorsConfig;
pub use routes::{api_routes, web_routes, AppError, AppState};
pub use server::{wait_for_shutdown_signal, ServerConfig, WebServer};

/// Default port
pub const DEFAULT_PORT: u16 = 8000;

/// Default bind address
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Default maximum upload size (10 MiB)
pub const DEFAULT_UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

/// Extra request body allowance for multipart boundaries and headers
pub const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Prefix of the versioned API
pub const API_PREFIX: &str = "/api/v1";

/// Frontend origins allowed by default
pub const DEFAULT_CORS_ORIGINS: [&str; 6] = [
    "http://localhost:3000",
    "http://localhost:3001",
    "https://localhost:3000",
    "https://localhost:3001",
    "https://*.vercel.app",
    "https://lokafit.vercel.app",
];
