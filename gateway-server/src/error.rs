//! HTTP rendering of gateway errors.

use axum::{
    Json,
    extract::{
        multipart::MultipartError,
        rejection::{PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gateway_core::GatewayError;
use tracing::warn;

use crate::envelope::ErrorBody;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Gateway(err) => match err {
                GatewayError::BadRequest(_) | GatewayError::Validation(_) => {
                    StatusCode::BAD_REQUEST
                }
                GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
                GatewayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
                // Unlike the single-resource endpoints, not a 400.
                GatewayError::SummaryAggregation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Rejected { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(%status, "{self}");
        }
        (status, Json(ErrorBody::new(status, self.to_string()))).into_response()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejected {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Rejected {
            status: err.status(),
            message: err.body_text(),
        }
    }
}
