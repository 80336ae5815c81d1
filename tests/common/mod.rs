// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::Request;
use runreport::config::Config;
use runreport::db::{FirestoreDb, MemoryStore};
use runreport::models::{AccessTokenEntry, UserEntry};
use runreport::routes::create_router;
use runreport::AppState;
use std::sync::Arc;

pub const ORIGIN: &str = "https://runreport.app";
pub const HOST: &str = "runreport.app";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Test config pointing Strava calls at `strava_url` (usually a wiremock server).
#[allow(dead_code)]
pub fn test_config(strava_url: &str) -> Config {
    Config {
        strava_api_url: strava_url.to_string(),
        ..Config::test_default()
    }
}

/// Create a test app over an in-memory store.
/// Returns the router, the shared state and a handle on the store.
#[allow(dead_code)]
pub fn create_test_app(config: Config) -> (axum::Router, Arc<AppState>, MemoryStore) {
    let store = MemoryStore::new();
    let state = Arc::new(AppState::new(config, Arc::new(store.clone())));
    (create_router(state.clone()), state, store)
}

/// Seed a user with the given Strava ID and session tokens.
#[allow(dead_code)]
pub fn seed_user(store: &MemoryStore, user_id: &str, strava_id: u64, sessions: &[&str]) {
    store.insert_user(UserEntry {
        id: user_id.to_string(),
        strava_id,
        strava_access_token: format!("strava-token-{}", user_id),
        strava_refresh_token: format!("strava-refresh-{}", user_id),
        token_expiry: "2026-10-20T00:00:00Z".to_string(),
    });
    for token in sessions {
        store.insert_access_token(AccessTokenEntry {
            token: token.to_string(),
            user_id: user_id.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        });
    }
}

/// GET request as it would arrive through the public hostname.
#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("host", HOST)
        .body(Body::empty())
        .unwrap()
}

/// JSON POST request as it would arrive through the public hostname.
#[allow(dead_code)]
pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("host", HOST)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_bytes(response: axum::response::Response) -> axum::body::Bytes {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap()
}
