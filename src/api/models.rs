//! API data models

use serde::{Deserialize, Serialize};

use crate::search::SearchMode;

/// Query string of `/api/search`.
///
/// Everything arrives as text so that a malformed `limit` or `mode` degrades to the
/// default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    pub limit: Option<String>,
    pub mode: Option<String>,
}

impl SearchParams {
    pub fn limit(&self) -> Option<usize> {
        self.limit.as_deref().and_then(|l| l.trim().parse().ok())
    }

    pub fn mode(&self) -> Option<SearchMode> {
        self.mode.as_deref().and_then(|m| m.parse().ok())
    }
}

/// Service status for health checks
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub catalog_size: usize,
    pub timestamp: String,
}

/// Error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
