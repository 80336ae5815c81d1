// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie authentication.

use crate::error::AppError;
use crate::AppState;
use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::CookieJar;

/// Cookie holding the session access token.
pub const ACCESS_TOKEN_COOKIE: &str = "runreport_access_token";

/// Authenticated user resolved from the session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// Resolve the caller from the session cookie, falling back to a bearer header.
///
/// Returns `Ok(None)` when no token is presented or the token is unknown.
pub async fn authenticate(
    state: &AppState,
    jar: &CookieJar,
    headers: &HeaderMap,
) -> Result<Option<AuthUser>, AppError> {
    // Try cookie first, then header
    let token = match jar.get(ACCESS_TOKEN_COOKIE) {
        Some(cookie) => Some(cookie.value().to_string()),
        None => headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::to_string),
    };

    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let user_id = state.store.resolve_user_id(&token).await?;
    if user_id.is_none() {
        tracing::debug!("Session token did not resolve to a user");
    }

    Ok(user_id.map(|user_id| AuthUser { user_id }))
}
