//! Uniform success/error envelope returned by the analysis entry points
//!
//! Every public analyzer catches its own errors and reports them as
//! `{"status": "error", "message": ..., "confidence": 0.0}` instead of
//! propagating them. Successful payload fields are flattened next to
//! `status` and `confidence`.

use serde::Serialize;
use std::fmt;

/// Outcome status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Result envelope of an analysis operation
#[derive(Debug, Clone, Serialize)]
pub struct Outcome<T> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: Option<T>,
    pub confidence: f64,
}

impl<T> Outcome<T> {
    pub fn success(data: T, confidence: f64) -> Self {
        Self {
            status: Status::Success,
            message: None,
            data: Some(data),
            confidence,
        }
    }

    /// Build an error outcome; confidence is always 0.0
    pub fn failure(error: impl fmt::Display) -> Self {
        Self {
            status: Status::Error,
            message: Some(error.to_string()),
            data: None,
            confidence: 0.0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Convert into a `Result`, yielding the payload and its confidence
    pub fn into_result(self) -> Result<(T, f64), String> {
        match (self.status, self.data) {
            (Status::Success, Some(data)) => Ok((data, self.confidence)),
            _ => Err(self
                .message
                .unwrap_or_else(|| "Unknown error".to_string())),
        }
    }
}
