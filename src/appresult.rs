use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid request: {0:?}")]
    Invalid(Vec<Issue>),
    #[error("match generation failed: {0}")]
    Matching(anyhow::Error),
    #[error(transparent)]
    Internal(anyhow::Error),
}

/// One problem with a request body, shaped like a schema-validation issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub code: &'static str,
    pub path: Vec<String>,
    pub message: String,
}

impl Issue {
    pub fn new(code: &'static str, field: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            path: vec![field.to_owned()],
            message: message.into(),
        }
    }

    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self {
            code: "invalid_body",
            path: Vec::new(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
            AppError::Invalid(issues) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": issues })),
            )
                .into_response(),
            AppError::Matching(err) => {
                tracing::error!(error = %format!("{err:#}"), "AI matching error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to generate matches" })),
                )
                    .into_response()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %format!("{err:#}"), backtrace = %err.backtrace(), "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        Self::Internal(anyhow::Error::msg(err))
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        Self::Internal(anyhow::Error::msg(err.to_owned()))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self::Internal(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(serde_json::Error);
apperr_impl!(sqlx::Error);
apperr_impl!(tower_sessions::session::Error);
apperr_impl!(axum::Error);
apperr_impl!(reqwest::Error);
apperr_impl!(oauth2::url::ParseError);

impl<E: core::error::Error + Send + Sync + 'static, R: oauth2::ErrorResponse + Send + Sync + 'static> From<oauth2::RequestTokenError<E, R>> for AppError {
    fn from(err: oauth2::RequestTokenError<E, R>) -> Self {
        Self::Internal(anyhow::Error::from(err))
    }
}
