// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public origin of the deployment, derived from request headers.

use crate::error::AppError;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

/// `scheme://host[:port]` the client used to reach us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin(pub String);

impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        origin_from_headers(&parts.headers).map(RequestOrigin)
    }
}

/// Derive the origin from `X-Forwarded-Host`/`Host` and `X-Forwarded-Proto`.
///
/// Without a forwarded protocol, localhost is assumed to be plain HTTP and
/// everything else HTTPS.
pub fn origin_from_headers(headers: &HeaderMap) -> Result<String, AppError> {
    let host = first_value(headers, "x-forwarded-host")
        .or_else(|| first_value(headers, header::HOST.as_str()))
        .ok_or_else(|| AppError::BadRequest("Missing Host header".to_string()))?;

    let scheme = match first_value(headers, "x-forwarded-proto") {
        Some(proto) => proto,
        None if host.starts_with("localhost") || host.starts_with("127.0.0.1") => "http",
        None => "https",
    };

    Ok(format!("{}://{}", scheme, host))
}

/// First entry of a possibly comma-separated header, trimmed.
fn first_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
