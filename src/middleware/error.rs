use axum::Json;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::{Error, ErrorCode};

/// Authentication errors for the middleware layer.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A required credential cookie is absent.
    #[error("Not authenticated")]
    Unauthenticated(ErrorCode),

    /// Access credential present but undecodable.
    #[error("Malformed credential")]
    MalformedCredential,

    /// Issuer refused the request; status and body go back untouched.
    #[error("Issuer rejected {operation} with status {status}")]
    Rejected {
        operation: &'static str,
        status: u16,
        body: String,
        content_type: Option<String>,
    },

    /// Issuer unreachable or answered with an unreadable body.
    #[error("Issuer error: {0}")]
    Upstream(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated(code) => error_body(StatusCode::UNAUTHORIZED, code),
            Self::MalformedCredential => {
                error_body(StatusCode::UNAUTHORIZED, ErrorCode::MalformedCredential)
            }
            Self::Rejected {
                status,
                body,
                content_type,
                ..
            } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                let content_type = content_type
                    .and_then(|v| HeaderValue::from_str(&v).ok())
                    .unwrap_or_else(|| HeaderValue::from_static("application/json"));
                let mut response = (status, body).into_response();
                response.headers_mut().insert(CONTENT_TYPE, content_type);
                response
            }
            Self::Upstream(_) => {
                tracing::error!(error = %self, "Issuer unavailable");
                (StatusCode::BAD_GATEWAY, "Bad gateway").into_response()
            }
            Self::Config(_) => {
                tracing::error!(error = %self, "Auth internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

fn error_body(status: StatusCode, code: ErrorCode) -> Response {
    (status, Json(json!({ "error": code }))).into_response()
}

impl From<Error> for AuthError {
    fn from(e: Error) -> Self {
        match e {
            Error::Rejected {
                operation,
                status,
                detail,
                content_type,
            } => Self::Rejected {
                operation,
                status,
                body: detail,
                content_type,
            },
            Error::MissingRefreshCredential => {
                Self::Unauthenticated(ErrorCode::MissingRefreshCredential)
            }
            Error::Config(msg) => Self::Config(msg),
            other => Self::Upstream(other.to_string()),
        }
    }
}
