// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava push subscription lifecycle.
//!
//! The first request that reaches the API makes sure a subscription exists
//! for the origin it arrived on. This runs at most once per process unless
//! registration fails before Strava confirms it.

use crate::db::Store;
use crate::error::AppError;
use crate::services::strava::StravaClient;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Path Strava posts events to, relative to the origin.
pub const CALLBACK_PATH: &str = "/api/user/deauthorise";

/// What `ensure_subscription` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// No verification token configured; webhooks are off.
    Disabled,
    /// Another call already ran (or is running) the registration.
    AlreadyInitialised,
    /// A subscription was already stored for this origin.
    Existing(u64),
    /// Strava created a new subscription and it was stored.
    Registered(u64),
    /// Strava answered without a subscription ID; a later call will retry.
    Rejected,
}

/// Makes sure one push subscription exists for the deployment origin.
pub struct WebhookLifecycle {
    store: Arc<dyn Store>,
    strava: StravaClient,
    verify_token: Option<String>,
    /// Set before any remote work starts so that near-simultaneous first
    /// requests do not all register. Cleared only when no subscription can
    /// exist yet: a failed store read, or Strava answering without an ID.
    initialised: AtomicBool,
}

impl WebhookLifecycle {
    pub fn new(store: Arc<dyn Store>, strava: StravaClient, verify_token: Option<String>) -> Self {
        Self {
            store,
            strava,
            verify_token,
            initialised: AtomicBool::new(false),
        }
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised.load(Ordering::Acquire)
    }

    /// Register a push subscription for `origin` unless one is known.
    pub async fn ensure_subscription(&self, origin: &str) -> Result<EnsureOutcome, AppError> {
        let Some(verify_token) = self.verify_token.as_deref() else {
            return Ok(EnsureOutcome::Disabled);
        };

        if self
            .initialised
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(EnsureOutcome::AlreadyInitialised);
        }

        tracing::info!(origin, "Initialising webhook subscription");

        let existing = match self.store.get_subscription(origin).await {
            Ok(existing) => existing,
            Err(e) => {
                self.reset();
                return Err(e);
            }
        };

        if let Some(subscription) = existing {
            tracing::info!(
                origin,
                subscription_id = subscription.subscription_id,
                "Found existing webhook subscription"
            );
            return Ok(EnsureOutcome::Existing(subscription.subscription_id));
        }

        let callback_url = format!("{}{}", origin.trim_end_matches('/'), CALLBACK_PATH);

        let subscription_id = match self
            .strava
            .create_push_subscription(&callback_url, verify_token)
            .await
        {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::warn!(origin, "Webhook subscription was not created, will retry");
                self.reset();
                return Ok(EnsureOutcome::Rejected);
            }
            Err(e) => {
                // The request may have reached Strava; creation is not
                // idempotent, so this process does not try again.
                tracing::error!(origin, error = %e, "Webhook subscription request failed");
                return Err(e);
            }
        };

        // Strava now holds the subscription. If storing it fails the flag
        // stays set: re-registering would only be refused as a duplicate.
        if let Err(e) = self
            .store
            .upsert_subscription(origin, subscription_id)
            .await
        {
            tracing::error!(
                origin,
                subscription_id,
                error = %e,
                "Webhook subscription created but not stored"
            );
            return Err(e);
        }

        tracing::info!(origin, subscription_id, "Webhook subscription registered");
        Ok(EnsureOutcome::Registered(subscription_id))
    }

    fn reset(&self) {
        self.initialised.store(false, Ordering::Release);
    }
}
