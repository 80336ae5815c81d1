// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for signed-in users.

use crate::error::{ErrorRedirect, Result};
use crate::middleware::authenticate;
use crate::AppState;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

const TOTALS_ERROR_MESSAGE: &str = "Could not get activity totals";

/// API routes. Webhook bootstrap middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/activities/totals", get(get_activity_totals))
}

/// Running totals for the last seven days.
///
/// Unauthenticated browsers are redirected to the frontend error page.
async fn get_activity_totals(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Response> {
    let Some(user) = authenticate(&state, &jar, &headers).await? else {
        tracing::info!("Totals requested without a valid session");
        return Ok(
            ErrorRedirect::new(&state.config.frontend_url, TOTALS_ERROR_MESSAGE).into_response(),
        );
    };

    let totals = state
        .activity_aggregator
        .totals_for_user(&user.user_id)
        .await?;

    Ok(Json(totals).into_response())
}
