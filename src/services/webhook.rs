// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava webhook handshake and event processing.

use crate::db::Store;
use crate::error::AppError;
use crate::models::WebhookEvent;
use serde::Deserialize;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Query parameters of Strava's subscription handshake.
#[derive(Debug, Default, Deserialize)]
pub struct HandshakeParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
}

/// Why a handshake was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeRejection {
    NotConfigured,
    WrongMode,
    TokenMismatch,
    MissingChallenge,
}

/// Check a handshake and return the challenge to echo back.
pub fn verify_handshake(
    params: HandshakeParams,
    configured_token: Option<&str>,
) -> Result<String, HandshakeRejection> {
    let expected = configured_token.ok_or(HandshakeRejection::NotConfigured)?;

    if params.mode.as_deref() != Some("subscribe") {
        return Err(HandshakeRejection::WrongMode);
    }

    let received = params.verify_token.unwrap_or_default();
    if !bool::from(received.as_bytes().ct_eq(expected.as_bytes())) {
        return Err(HandshakeRejection::TokenMismatch);
    }

    params.challenge.ok_or(HandshakeRejection::MissingChallenge)
}

/// Why an event was dropped without acting on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Body did not parse as a webhook event
    Malformed,
    /// No subscription is stored for the origin the event arrived on
    NoSubscription,
    /// Event carries a subscription ID other than ours
    SubscriptionMismatch,
    /// Anything other than `updates.authorized == "false"`
    NotDeauthorization,
    /// No user with this Strava athlete ID (never signed up, or already removed)
    UnknownAthlete,
}

/// Result of processing one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The athlete revoked access and their user data was removed.
    Deauthorized { user_id: String },
    Ignored(IgnoreReason),
}

/// Acts on deauthorization events; everything else is ignored.
pub struct WebhookEventProcessor {
    store: Arc<dyn Store>,
}

impl WebhookEventProcessor {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Process an event that arrived on `origin`.
    pub async fn process(
        &self,
        origin: &str,
        event: &WebhookEvent,
    ) -> Result<EventOutcome, AppError> {
        let Some(subscription) = self.store.get_subscription(origin).await? else {
            tracing::warn!(
                origin,
                subscription_id = event.subscription_id,
                "Webhook event for origin without subscription"
            );
            return Ok(EventOutcome::Ignored(IgnoreReason::NoSubscription));
        };

        if subscription.subscription_id != event.subscription_id {
            tracing::warn!(
                origin,
                received_id = event.subscription_id,
                expected_id = subscription.subscription_id,
                "Security Alert: Webhook subscription ID mismatch"
            );
            return Ok(EventOutcome::Ignored(IgnoreReason::SubscriptionMismatch));
        }

        if !event.is_deauthorization() {
            tracing::debug!(
                object_type = ?event.object_type,
                aspect_type = ?event.aspect_type,
                object_id = event.object_id,
                "Webhook event not relevant"
            );
            return Ok(EventOutcome::Ignored(IgnoreReason::NotDeauthorization));
        }

        let strava_id = event.object_id;
        tracing::info!(strava_id, "Deauthorising athlete");

        let Some(user) = self.store.get_user_by_strava_id(strava_id).await? else {
            tracing::info!(strava_id, "No user for deauthorised athlete");
            return Ok(EventOutcome::Ignored(IgnoreReason::UnknownAthlete));
        };

        self.store.delete_user(&user.id).await?;
        let tokens = self.store.delete_access_tokens_for_user(&user.id).await?;

        tracing::info!(
            strava_id,
            user_id = %user.id,
            tokens,
            "User deauthorised and removed"
        );

        Ok(EventOutcome::Deauthorized { user_id: user.id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, SubscriptionStore, UserStore};
    use crate::models::{AccessTokenEntry, UserEntry};
    use serde_json::json;

    const ORIGIN: &str = "https://runreport.app";

    fn params(mode: &str, challenge: &str, token: &str) -> HandshakeParams {
        HandshakeParams {
            mode: Some(mode.to_string()),
            challenge: Some(challenge.to_string()),
            verify_token: Some(token.to_string()),
        }
    }

    #[test]
    fn test_handshake_echoes_challenge() {
        let result = verify_handshake(params("subscribe", "15f7d1a91c1f40f8", "secret"), Some("secret"));
        assert_eq!(result, Ok("15f7d1a91c1f40f8".to_string()));
    }

    #[test]
    fn test_handshake_rejections() {
        assert_eq!(
            verify_handshake(params("unsubscribe", "c", "secret"), Some("secret")),
            Err(HandshakeRejection::WrongMode)
        );
        assert_eq!(
            verify_handshake(params("subscribe", "c", "Secret"), Some("secret")),
            Err(HandshakeRejection::TokenMismatch)
        );
        assert_eq!(
            verify_handshake(params("subscribe", "c", ""), Some("secret")),
            Err(HandshakeRejection::TokenMismatch)
        );
        assert_eq!(
            verify_handshake(params("subscribe", "c", "secret "), Some("secret")),
            Err(HandshakeRejection::TokenMismatch)
        );
        assert_eq!(
            verify_handshake(params("subscribe", "c", "secret"), None),
            Err(HandshakeRejection::NotConfigured)
        );
        assert_eq!(
            verify_handshake(HandshakeParams::default(), Some("secret")),
            Err(HandshakeRejection::WrongMode)
        );
    }

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_user(UserEntry {
            id: "user-1".to_string(),
            strava_id: 134815,
            strava_access_token: "strava-access".to_string(),
            strava_refresh_token: "strava-refresh".to_string(),
            token_expiry: "2026-10-20T00:00:00Z".to_string(),
        });
        for token in ["session-a", "session-b"] {
            store.insert_access_token(AccessTokenEntry {
                token: token.to_string(),
                user_id: "user-1".to_string(),
                created_at: "2026-10-01T00:00:00Z".to_string(),
            });
        }
        store
    }

    fn event(subscription_id: u64, updates: serde_json::Value) -> WebhookEvent {
        serde_json::from_value(json!({
            "aspect_type": "update",
            "event_time": 1516126040,
            "object_id": 134815,
            "object_type": "athlete",
            "owner_id": 134815,
            "subscription_id": subscription_id,
            "updates": updates
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_deauthorization_removes_user_and_tokens() {
        let store = seeded_store();
        store.upsert_subscription(ORIGIN, 120475).await.unwrap();
        let processor = WebhookEventProcessor::new(Arc::new(store.clone()));
        let deauth = event(120475, json!({"authorized": "false"}));

        let outcome = processor.process(ORIGIN, &deauth).await.unwrap();

        assert_eq!(
            outcome,
            EventOutcome::Deauthorized {
                user_id: "user-1".to_string()
            }
        );
        assert!(store.get_user("user-1").await.unwrap().is_none());
        assert_eq!(store.access_token_count("user-1"), 0);

        // Replaying the same event is a no-op.
        let replay = processor.process(ORIGIN, &deauth).await.unwrap();
        assert_eq!(replay, EventOutcome::Ignored(IgnoreReason::UnknownAthlete));
    }

    #[tokio::test]
    async fn test_subscription_mismatch_is_ignored() {
        let store = seeded_store();
        store.upsert_subscription(ORIGIN, 120475).await.unwrap();
        let processor = WebhookEventProcessor::new(Arc::new(store.clone()));

        let outcome = processor
            .process(ORIGIN, &event(999, json!({"authorized": "false"})))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            EventOutcome::Ignored(IgnoreReason::SubscriptionMismatch)
        );
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.access_token_count("user-1"), 2);
    }

    #[tokio::test]
    async fn test_event_without_stored_subscription_is_ignored() {
        let store = seeded_store();
        store.upsert_subscription("https://other.example", 120475).await.unwrap();
        let processor = WebhookEventProcessor::new(Arc::new(store.clone()));

        let outcome = processor
            .process(ORIGIN, &event(120475, json!({"authorized": "false"})))
            .await
            .unwrap();

        assert_eq!(outcome, EventOutcome::Ignored(IgnoreReason::NoSubscription));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_other_updates_are_ignored() {
        let store = seeded_store();
        store.upsert_subscription(ORIGIN, 120475).await.unwrap();
        let processor = WebhookEventProcessor::new(Arc::new(store.clone()));

        for updates in [
            json!({"title": "Morning Run"}),
            json!({"authorized": "true"}),
            json!({"authorized": false}),
            json!({}),
        ] {
            let outcome = processor.process(ORIGIN, &event(120475, updates)).await.unwrap();
            assert_eq!(
                outcome,
                EventOutcome::Ignored(IgnoreReason::NotDeauthorization)
            );
        }
        assert_eq!(store.user_count(), 1);
    }
}
