// Request/Response Types for the control API

use serde::Serialize;

/// POST /api/update-job-rate acceptance
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRateResponse {
    pub success: bool,
    pub new_rate: f64,
    pub message: String,
}

/// Error envelope for rejected requests
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
