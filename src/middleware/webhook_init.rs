// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lazily registers the Strava push subscription on incoming traffic.

use crate::middleware::origin::origin_from_headers;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Make sure a subscription exists for this request's origin, then continue.
///
/// Cheap after the first successful run: the lifecycle short-circuits on its
/// initialised flag before touching the store.
pub async fn ensure_webhook_subscription(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = match origin_from_headers(request.headers()) {
        Ok(origin) => origin,
        Err(e) => return e.into_response(),
    };

    match state.webhook_lifecycle.ensure_subscription(&origin).await {
        Ok(outcome) => {
            tracing::trace!(origin = %origin, ?outcome, "Webhook subscription check");
        }
        Err(e) => {
            tracing::error!(origin = %origin, error = %e, "Webhook initialisation failed");
            return e.into_response();
        }
    }

    next.run(request).await
}
