// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store for local development and tests.
//!
//! Data is lost when the process exits.

use crate::db::{SubscriptionStore, TokenResolver, UserStore};
use crate::error::AppError;
use crate::models::{AccessTokenEntry, UserEntry, WebhookSubscription};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Store backed by concurrent hash maps. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<DashMap<String, UserEntry>>,
    /// Keyed by token value
    access_tokens: Arc<DashMap<String, AccessTokenEntry>>,
    /// Keyed by origin
    subscriptions: Arc<DashMap<String, WebhookSubscription>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a user.
    pub fn insert_user(&self, user: UserEntry) {
        self.users.insert(user.id.clone(), user);
    }

    /// Record a session token.
    pub fn insert_access_token(&self, entry: AccessTokenEntry) {
        self.access_tokens.insert(entry.token.clone(), entry);
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of session tokens held by one user.
    pub fn access_token_count(&self, user_id: &str) -> usize {
        self.access_tokens
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .count()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn get_subscription(
        &self,
        origin: &str,
    ) -> Result<Option<WebhookSubscription>, AppError> {
        Ok(self.subscriptions.get(origin).map(|s| s.clone()))
    }

    async fn upsert_subscription(&self, origin: &str, subscription_id: u64) -> Result<(), AppError> {
        self.subscriptions.insert(
            origin.to_string(),
            WebhookSubscription {
                origin: origin.to_string(),
                subscription_id,
            },
        );
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserEntry>, AppError> {
        Ok(self.users.get(user_id).map(|u| u.clone()))
    }

    async fn get_user_by_strava_id(&self, strava_id: u64) -> Result<Option<UserEntry>, AppError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.strava_id == strava_id)
            .map(|u| u.clone()))
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        self.users.remove(user_id);
        Ok(())
    }

    async fn delete_access_tokens_for_user(&self, user_id: &str) -> Result<usize, AppError> {
        let mut removed = 0;
        self.access_tokens.retain(|_, entry| {
            let keep = entry.user_id != user_id;
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }
}

#[async_trait]
impl TokenResolver for MemoryStore {
    async fn resolve_user_id(&self, access_token: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .access_tokens
            .get(access_token)
            .map(|entry| entry.user_id.clone()))
    }
}
