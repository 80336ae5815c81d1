// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Strava API error: {0}")]
    StravaApi(String),

    #[error("Activity pagination exceeded {0} pages")]
    PaginationLimit(u32),

    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// Message carried by `StravaApi` when Strava answers 429.
    pub const STRAVA_RATE_LIMIT: &'static str = "Rate limit exceeded";
    /// Message carried by `StravaApi` when Strava rejects the bearer token.
    pub const STRAVA_TOKEN_ERROR: &'static str = "Token expired or invalid";

    /// Whether this is Strava rejecting the user's access token.
    pub fn is_strava_token_error(&self) -> bool {
        matches!(self, AppError::StravaApi(msg) if msg == Self::STRAVA_TOKEN_ERROR)
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::StravaApi(msg) => {
                tracing::error!(error = %msg, "Strava API error");
                (StatusCode::BAD_GATEWAY, "strava_error", Some(msg.clone()))
            }
            AppError::PaginationLimit(max_pages) => {
                tracing::error!(max_pages, "Strava kept returning full pages");
                (
                    StatusCode::BAD_GATEWAY,
                    "strava_error",
                    Some(self.to_string()),
                )
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Redirect to the frontend error page, used where the caller is a browser
/// and a bare status code would be useless.
#[derive(Debug)]
pub struct ErrorRedirect {
    location: String,
}

impl ErrorRedirect {
    pub fn new(frontend_url: &str, message: &str) -> Self {
        Self {
            location: format!(
                "{}/error?message={}",
                frontend_url.trim_end_matches('/'),
                urlencoding::encode(message)
            ),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

impl IntoResponse for ErrorRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&self.location).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
