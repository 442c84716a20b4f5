//! CORS configuration
//!
//! Origins are matched exactly, except for patterns with a leading `*.`
//! host label (`https://*.vercel.app`), which match any subdomain.

use axum::http::{request::Parts, HeaderName, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use super::DEFAULT_CORS_ORIGINS;

/// Default preflight cache lifetime in seconds
pub const DEFAULT_MAX_AGE_SECS: u64 = 600;

/// CORS configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// Whether CORS headers are emitted at all
    pub enabled: bool,
    /// Allowed origin patterns; `None` mirrors any request origin
    pub allowed_origins: Option<Vec<String>>,
    /// Allowed methods; `"*"` mirrors the requested method
    pub allowed_methods: Vec<String>,
    /// Allowed headers; `"*"` mirrors the requested headers
    pub allowed_headers: Vec<String>,
    /// Send `Access-Control-Allow-Credentials: true`
    pub allow_credentials: bool,
    /// Preflight cache lifetime
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    /// The frontend origin list, credentials allowed
    fn default() -> Self {
        Self::strict(DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect())
    }
}

impl CorsConfig {
    /// Allow any origin (for development)
    pub fn permissive() -> Self {
        Self {
            allowed_origins: None,
            ..Self::strict(Vec::new())
        }
    }

    /// Allow only the given origin patterns
    pub fn strict(origins: Vec<String>) -> Self {
        Self {
            enabled: true,
            allowed_origins: Some(origins),
            allowed_methods: vec!["*".to_string()],
            allowed_headers: vec!["*".to_string()],
            allow_credentials: true,
            max_age_secs: DEFAULT_MAX_AGE_SECS,
        }
    }

    /// No CORS handling
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Whether a request origin is allowed
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if !self.enabled {
            return false;
        }
        match &self.allowed_origins {
            None => true,
            Some(patterns) => patterns.iter().any(|p| origin_matches(p, origin)),
        }
    }

    /// Build the tower-http layer
    pub fn into_layer(self) -> CorsLayer {
        if !self.enabled {
            return CorsLayer::new();
        }

        let origin = if self.allowed_origins.is_none() {
            AllowOrigin::mirror_request()
        } else {
            let config = self.clone();
            AllowOrigin::predicate(move |origin: &HeaderValue, _: &Parts| {
                origin
                    .to_str()
                    .map(|o| config.is_origin_allowed(o))
                    .unwrap_or(false)
            })
        };

        let methods = if self.allowed_methods.iter().any(|m| m == "*") {
            AllowMethods::mirror_request()
        } else {
            AllowMethods::list(
                self.allowed_methods
                    .iter()
                    .filter_map(|m| m.parse::<Method>().ok()),
            )
        };

        let headers = if self.allowed_headers.iter().any(|h| h == "*") {
            AllowHeaders::mirror_request()
        } else {
            AllowHeaders::list(
                self.allowed_headers
                    .iter()
                    .filter_map(|h| h.parse::<HeaderName>().ok()),
            )
        };

        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(self.allow_credentials)
            .max_age(Duration::from_secs(self.max_age_secs))
    }
}

/// Match an origin against a pattern
pub fn origin_matches(pattern: &str, origin: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    match pattern.split_once("*.") {
        Some((scheme, domain)) => origin
            .strip_prefix(scheme)
            .and_then(|host| host.strip_suffix(domain))
            .and_then(|sub| sub.strip_suffix('.'))
            .is_some_and(|sub| !sub.is_empty() && !sub.contains('/')),
        None => pattern == origin,
    }
}
