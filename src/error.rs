use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use portfolio_shared::{ALL_FIELDS_REQUIRED, ErrorBody, FAILED_TO_SEND_EMAIL};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Dispatch error: {0}")]
    DispatchError(anyhow::Error),
}

impl From<portfolio_shared::Error> for AppError {
    fn from(err: portfolio_shared::Error) -> Self {
        match err {
            portfolio_shared::Error::Validate(errors) => AppError::ValidationError(errors.to_string()),
            portfolio_shared::Error::Dispatch(err) => AppError::DispatchError(err),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Client-facing messages are fixed; details stay in the logs.
        let (status_code, message) = match self {
            AppError::ValidationError(detail) => {
                tracing::debug!("Rejected contact submission: {}", detail);
                (StatusCode::BAD_REQUEST, ALL_FIELDS_REQUIRED)
            }
            AppError::DispatchError(e) => {
                tracing::error!("Email send error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, FAILED_TO_SEND_EMAIL)
            }
        };

        (status_code, Json(ErrorBody::new(message))).into_response()
    }
}
