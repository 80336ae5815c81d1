// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook routes for Strava events.

use crate::error::Result;
use crate::middleware::RequestOrigin;
use crate::models::WebhookEvent;
use crate::services::subscription::CALLBACK_PATH;
use crate::services::webhook::{verify_handshake, HandshakeParams};
use crate::services::{EventOutcome, IgnoreReason};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(CALLBACK_PATH, get(verify).post(handle_event))
}

/// Verification response.
#[derive(Serialize)]
struct VerifyResponse {
    #[serde(rename = "hub.challenge")]
    challenge: String,
}

/// Verify webhook subscription (GET).
///
/// Every refusal, including an unparseable query string, is a bare 400.
async fn verify(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<HandshakeParams>, QueryRejection>,
) -> Response {
    tracing::info!("Verifying webhook callback");

    let params = match query {
        Ok(Query(params)) => params,
        Err(e) => {
            tracing::warn!(error = %e, "Webhook verification query rejected");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    match verify_handshake(params, state.config.webhook_verify_token.as_deref()) {
        Ok(challenge) => {
            tracing::info!("Webhook subscription verified");
            (StatusCode::OK, Json(VerifyResponse { challenge })).into_response()
        }
        Err(reason) => {
            tracing::warn!(?reason, "Webhook verification failed");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}

/// Handle incoming webhook events (POST).
///
/// 200 with an empty body when a user was removed, 204 when the event was
/// dropped.
async fn handle_event(
    State(state): State<Arc<AppState>>,
    RequestOrigin(origin): RequestOrigin,
    body: Bytes,
) -> Result<StatusCode> {
    tracing::info!(
        payload = %String::from_utf8_lossy(&body),
        "Webhook event received (raw)"
    );

    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse webhook event");
            return Ok(status_for(&EventOutcome::Ignored(IgnoreReason::Malformed)));
        }
    };

    let outcome = state.event_processor.process(&origin, &event).await?;
    Ok(status_for(&outcome))
}

fn status_for(outcome: &EventOutcome) -> StatusCode {
    match outcome {
        EventOutcome::Deauthorized { .. } => StatusCode::OK,
        EventOutcome::Ignored(_) => StatusCode::NO_CONTENT,
    }
}
