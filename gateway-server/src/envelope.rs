use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Uniform wrapper around every JSON success body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub message: &'static str,
    pub data: T,
    pub timestamp: String,
}

/// Body of every error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

pub type Envelope<T> = Json<ApiResponse<T>>;

pub fn ok<T: Serialize>(data: T) -> Envelope<T> {
    Json(ApiResponse {
        status_code: StatusCode::OK.as_u16(),
        message: "Success",
        data,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: message.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
