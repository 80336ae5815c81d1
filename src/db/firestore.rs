// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides the store traits over three collections:
//! - Users (Strava credentials, keyed by internal user ID)
//! - Access tokens (browser sessions, keyed by token value)
//! - Webhook subscriptions (keyed by encoded origin)

use crate::db::{collections, SubscriptionStore, TokenResolver, UserStore};
use crate::error::AppError;
use crate::models::{AccessTokenEntry, UserEntry, WebhookSubscription};
use async_trait::async_trait;

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline client. Every operation returns a database error.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &UserEntry) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Access Token Operations ─────────────────────────────────

    /// Store a session token.
    pub async fn set_access_token(&self, entry: &AccessTokenEntry) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ACCESS_TOKENS)
            .document_id(&entry.token)
            .object(entry)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// All session tokens held by a user.
    pub async fn get_access_tokens_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<AccessTokenEntry>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACCESS_TOKENS)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }
}

/// Origins contain `/`, which Firestore does not allow in document IDs.
fn subscription_doc_id(origin: &str) -> String {
    urlencoding::encode(origin).into_owned()
}

/// Firestore document ID rules: at most 1500 bytes, no `/`, not `.` or
/// `..`, and not of the reserved form `__.*__`.
fn is_valid_document_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 1500
        && !id.contains('/')
        && id != "."
        && id != ".."
        && !(id.len() >= 4 && id.starts_with("__") && id.ends_with("__"))
}

#[async_trait]
impl SubscriptionStore for FirestoreDb {
    async fn get_subscription(
        &self,
        origin: &str,
    ) -> Result<Option<WebhookSubscription>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::WEBHOOK_SUBSCRIPTIONS)
            .obj()
            .one(&subscription_doc_id(origin))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn upsert_subscription(&self, origin: &str, subscription_id: u64) -> Result<(), AppError> {
        let subscription = WebhookSubscription {
            origin: origin.to_string(),
            subscription_id,
        };

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::WEBHOOK_SUBSCRIPTIONS)
            .document_id(subscription_doc_id(origin))
            .object(&subscription)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(origin, subscription_id, "Stored webhook subscription");
        Ok(())
    }
}

#[async_trait]
impl UserStore for FirestoreDb {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserEntry>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn get_user_by_strava_id(&self, strava_id: u64) -> Result<Option<UserEntry>, AppError> {
        let users: Vec<UserEntry> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("strava_id").eq(strava_id)]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        tracing::debug!(user_id, "Deleted user entry");
        Ok(())
    }

    async fn delete_access_tokens_for_user(&self, user_id: &str) -> Result<usize, AppError> {
        let tokens = self.get_access_tokens_for_user(user_id).await?;
        let count = tokens.len();

        self.batch_delete(&tokens, collections::ACCESS_TOKENS, |entry: &AccessTokenEntry| {
            entry.token.clone()
        })
        .await?;

        tracing::debug!(user_id, count, "Deleted access tokens");
        Ok(count)
    }
}

#[async_trait]
impl TokenResolver for FirestoreDb {
    async fn resolve_user_id(&self, access_token: &str) -> Result<Option<String>, AppError> {
        // Never issued, and Firestore would reject the lookup
        if !is_valid_document_id(access_token) {
            tracing::debug!("Session token is not a valid document ID");
            return Ok(None);
        }

        let entry: Option<AccessTokenEntry> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ACCESS_TOKENS)
            .obj()
            .one(access_token)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(entry.map(|e| e.user_id))
    }
}
