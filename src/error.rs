use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse};
use thiserror::Error;

use crate::models::{ErrorResponse, FieldProblem};
use crate::services::StoreError;

/// Errors surfaced at the HTTP boundary
///
/// Every variant renders as `{"success": false, "error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for field: {0}")]
    InvalidField(&'static str),

    #[error("{0}")]
    InvalidPayload(String),

    #[error("{0}")]
    Store(#[from] StoreError),
}

impl From<FieldProblem> for ApiError {
    fn from(problem: FieldProblem) -> Self {
        match problem {
            FieldProblem::Missing(field) => ApiError::MissingField(field),
            FieldProblem::Invalid(field) => ApiError::InvalidField(field),
        }
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) | ApiError::InvalidField(_) | ApiError::InvalidPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    let message = match &err {
        error::JsonPayloadError::ContentType => "No data provided".to_string(),
        _ => format!("Invalid JSON: {}", err),
    };
    ApiError::InvalidPayload(message).into()
}
