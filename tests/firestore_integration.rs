// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (FIRESTORE_EMULATOR_HOST set), otherwise they are skipped.

use runreport::db::{SubscriptionStore, TokenResolver, UserStore};
use runreport::models::{AccessTokenEntry, UserEntry, WebhookEvent};
use runreport::services::{EventOutcome, WebhookEventProcessor};
use std::sync::Arc;

mod common;
use common::test_db;

/// Unique suffix for test isolation; the emulator is shared between tests.
fn unique_id() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos() as u64
}

fn test_user(id: &str, strava_id: u64) -> UserEntry {
    UserEntry {
        id: id.to_string(),
        strava_id,
        strava_access_token: "strava-access".to_string(),
        strava_refresh_token: "strava-refresh".to_string(),
        token_expiry: "2026-10-20T00:00:00Z".to_string(),
    }
}

fn session(token: &str, user_id: &str) -> AccessTokenEntry {
    AccessTokenEntry {
        token: token.to_string(),
        user_id: user_id.to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SUBSCRIPTION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_subscription_upsert_replaces() {
    require_emulator!();

    let db = test_db().await;
    let origin = format!("https://test-{}.runreport.app", unique_id());

    assert!(db.get_subscription(&origin).await.unwrap().is_none());

    db.upsert_subscription(&origin, 100).await.unwrap();
    db.upsert_subscription(&origin, 200).await.unwrap();

    let stored = db.get_subscription(&origin).await.unwrap().unwrap();
    assert_eq!(stored.origin, origin);
    assert_eq!(stored.subscription_id, 200);
}

#[tokio::test]
async fn test_subscriptions_are_per_origin() {
    require_emulator!();

    let db = test_db().await;
    let n = unique_id();
    let a = format!("https://a-{}.runreport.app", n);
    let b = format!("http://localhost:{}", n % 60000);

    db.upsert_subscription(&a, 1).await.unwrap();
    db.upsert_subscription(&b, 2).await.unwrap();

    assert_eq!(db.get_subscription(&a).await.unwrap().unwrap().subscription_id, 1);
    assert_eq!(db.get_subscription(&b).await.unwrap().unwrap().subscription_id, 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// USER AND SESSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_user_lookup_by_id_and_strava_id() {
    require_emulator!();

    let db = test_db().await;
    let n = unique_id();
    let user = test_user(&format!("user-{}", n), n);
    db.upsert_user(&user).await.unwrap();

    assert_eq!(db.get_user(&user.id).await.unwrap(), Some(user.clone()));
    assert_eq!(db.get_user_by_strava_id(n).await.unwrap(), Some(user));
    assert!(db.get_user_by_strava_id(n + 1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_session_tokens_resolve_and_delete() {
    require_emulator!();

    let db = test_db().await;
    let n = unique_id();
    let user_id = format!("user-{}", n);
    let other_id = format!("other-{}", n);

    db.set_access_token(&session(&format!("tok-a-{}", n), &user_id))
        .await
        .unwrap();
    db.set_access_token(&session(&format!("tok-b-{}", n), &user_id))
        .await
        .unwrap();
    db.set_access_token(&session(&format!("tok-c-{}", n), &other_id))
        .await
        .unwrap();

    assert_eq!(
        db.resolve_user_id(&format!("tok-a-{}", n)).await.unwrap(),
        Some(user_id.clone())
    );

    let removed = db.delete_access_tokens_for_user(&user_id).await.unwrap();
    assert_eq!(removed, 2);
    assert!(db
        .resolve_user_id(&format!("tok-a-{}", n))
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        db.resolve_user_id(&format!("tok-c-{}", n)).await.unwrap(),
        Some(other_id)
    );

    // Nothing left to remove
    assert_eq!(db.delete_access_tokens_for_user(&user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_deauthorization_against_firestore() {
    require_emulator!();

    let db = test_db().await;
    let n = unique_id();
    let origin = format!("https://deauth-{}.runreport.app", n);
    let user = test_user(&format!("user-{}", n), n);

    db.upsert_subscription(&origin, n).await.unwrap();
    db.upsert_user(&user).await.unwrap();
    db.set_access_token(&session(&format!("tok-{}", n), &user.id))
        .await
        .unwrap();

    let event: WebhookEvent = serde_json::from_value(serde_json::json!({
        "aspect_type": "update",
        "object_id": n,
        "object_type": "athlete",
        "owner_id": n,
        "subscription_id": n,
        "event_time": 1516126040,
        "updates": {"authorized": "false"}
    }))
    .unwrap();

    let processor = WebhookEventProcessor::new(Arc::new(db.clone()));
    let outcome = processor.process(&origin, &event).await.unwrap();

    assert!(matches!(outcome, EventOutcome::Deauthorized { .. }));
    assert!(db.get_user(&user.id).await.unwrap().is_none());
    assert!(db
        .resolve_user_id(&format!("tok-{}", n))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_malformed_session_tokens_resolve_to_nobody() {
    require_emulator!();

    let db = test_db().await;

    for token in ["a/b", "users/someone", "__reserved__", "..", ""] {
        assert_eq!(
            db.resolve_user_id(token).await.unwrap(),
            None,
            "token: {:?}",
            token
        );
    }
}
