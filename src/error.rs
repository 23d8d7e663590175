//! Unified application error model and mapping helpers.
//! Route handlers return `AppResult<Response>`; user-facing validation problems
//! never reach this type (they become flash messages), so what lands here is an
//! internal fault that should short-circuit the request with an HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt::{Display, Formatter};

use crate::identity::IdentityError;

#[derive(Debug, Clone)]
pub enum AppError {
    Render { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::Render { code, .. } | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Render { message, .. } | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn render(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Render { code: code.into(), message: msg.into() } }
    pub fn internal(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> StatusCode {
        match self {
            AppError::Render { .. } | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal("internal_error", err.to_string())
    }
}

/// Duplicate emails and bad passwords are flashed by the handlers; only
/// hashing faults are expected to come through here.
impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        let code = match err {
            IdentityError::Hashing(_) => "password_hash",
            IdentityError::AlreadyExists | IdentityError::InvalidCredentials => "identity",
        };
        AppError::internal(code, err.to_string())
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        AppError::render("template", err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        tracing::error!(code = self.code_str(), "request failed: {}", self.message());
        // Internal details stay in the log; the page only gets the code.
        (status, format!("{} ({})", status, self.code_str())).into_response()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
