//! Database layer.
//!
//! The webhook and totals services only see the store traits below; the
//! backends are Firestore (production) and an in-memory map (local dev and
//! tests).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{UserEntry, WebhookSubscription};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const ACCESS_TOKENS: &str = "access_tokens";
    pub const WEBHOOK_SUBSCRIPTIONS: &str = "webhook_subscriptions";
}

/// Persists at most one push subscription per origin.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn get_subscription(&self, origin: &str)
        -> Result<Option<WebhookSubscription>, AppError>;

    /// Create or replace the subscription for `origin`.
    async fn upsert_subscription(&self, origin: &str, subscription_id: u64)
        -> Result<(), AppError>;
}

/// User records and the session tokens that belong to them.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserEntry>, AppError>;

    async fn get_user_by_strava_id(&self, strava_id: u64) -> Result<Option<UserEntry>, AppError>;

    async fn delete_user(&self, user_id: &str) -> Result<(), AppError>;

    /// Delete every access token owned by `user_id`. Returns how many were removed.
    async fn delete_access_tokens_for_user(&self, user_id: &str) -> Result<usize, AppError>;
}

/// Maps a session cookie value to the user it was issued to.
#[async_trait]
pub trait TokenResolver: Send + Sync {
    async fn resolve_user_id(&self, access_token: &str) -> Result<Option<String>, AppError>;
}

/// Everything the application needs from storage.
pub trait Store: SubscriptionStore + UserStore + TokenResolver {}

impl<T> Store for T where T: SubscriptionStore + UserStore + TokenResolver {}
