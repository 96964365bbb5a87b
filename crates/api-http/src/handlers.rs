// HTTP Handlers

use crate::dashboard::DASHBOARD_HTML;
use crate::server::AppState;
use crate::types::{ApiError, UpdateRateResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use gridsim_core::application::constants::DEFAULT_JOB_GENERATION_RATE;
use gridsim_core::application::ClusterSnapshot;
use serde_json::Value;

/// GET / - operator dashboard
pub async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// GET /api/status - full cluster snapshot
pub async fn status(State(state): State<AppState>) -> Json<ClusterSnapshot> {
    Json(state.controller.snapshot())
}

/// POST /api/update-job-rate - clamp and apply a new generation rate.
/// Out-of-range rates are clamped, not rejected; a non-numeric rate or a
/// malformed body gets a 400 with an error envelope.
pub async fn update_job_rate(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdateRateResponse>, (StatusCode, Json<ApiError>)> {
    let Json(body) = payload.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(format!("invalid JSON body: {rejection}"))),
        )
    })?;

    let rate = match body.get("rate") {
        None => DEFAULT_JOB_GENERATION_RATE,
        Some(value) => parse_rate(value).ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiError::new(format!("rate must be a number, got {value}"))),
            )
        })?,
    };

    let new_rate = state.controller.set_job_generation_rate(rate);
    Ok(Json(UpdateRateResponse {
        success: true,
        new_rate,
        message: format!("Job generation rate set to {} jobs/minute", new_rate),
    }))
}

/// Numbers pass through; numeric strings are accepted for convenience.
fn parse_rate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::parse_rate;
    use serde_json::json;

    #[test]
    fn test_parse_rate_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_rate(&json!(5)), Some(5.0));
        assert_eq!(parse_rate(&json!(2.5)), Some(2.5));
        assert_eq!(parse_rate(&json!("7.5")), Some(7.5));
    }

    #[test]
    fn test_parse_rate_rejects_non_numeric_values() {
        assert_eq!(parse_rate(&json!("abc")), None);
        assert_eq!(parse_rate(&json!(null)), None);
        assert_eq!(parse_rate(&json!([1.0])), None);
        assert_eq!(parse_rate(&json!({"rate": 1.0})), None);
    }
}
