// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client.
//!
//! Handles:
//! - Push subscription registration
//! - Activity listing (one page per call)
//! - Rate limit and token error detection

use crate::error::AppError;
use crate::models::SummaryActivity;
use crate::services::url_builder::UrlBuilder;
use serde::Deserialize;

pub const SUBSCRIBE_PATH: &str = "/api/v3/push_subscriptions";
pub const ACTIVITIES_PATH: &str = "/api/v3/activities";

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    host: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    ///
    /// `host` is the scheme and authority only, e.g. `https://www.strava.com`.
    pub fn new(host: &str, client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            host: host.trim_end_matches('/').to_string(),
            client_id,
            client_secret,
        }
    }

    /// Register a push subscription delivering events to `callback_url`.
    ///
    /// Strava calls `callback_url` with the handshake before it answers, so
    /// the handshake endpoint must already be serving.
    ///
    /// Returns `Ok(None)` when Strava answers without a subscription ID
    /// (for example when a subscription already exists for this app).
    pub async fn create_push_subscription(
        &self,
        callback_url: &str,
        verify_token: &str,
    ) -> Result<Option<u64>, AppError> {
        let url = UrlBuilder::new(&self.host, SUBSCRIBE_PATH)
            .add_query_param("client_id", &self.client_id)
            .add_query_param("client_secret", &self.client_secret)
            .add_query_param("callback_url", callback_url)
            .add_query_param("verify_token", verify_token)
            .to_string();

        let response = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Subscription request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Strava rejected push subscription");
            return Ok(None);
        }

        let created: CreateSubscriptionResponse = response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))?;

        Ok(created.id.filter(|id| *id != 0))
    }

    /// List one page of the athlete's activities started after `after`.
    pub async fn list_activities(
        &self,
        access_token: &str,
        after: i64, // Unix timestamp
        page: u32,
    ) -> Result<Vec<SummaryActivity>, AppError> {
        let url = UrlBuilder::new(&self.host, ACTIVITIES_PATH)
            .add_query_param("after", after)
            .add_query_param("page", page)
            .to_string();

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Strava rate limit hit (429)");
                return Err(AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string()));
            }

            if status.as_u16() == 401 {
                return Err(AppError::StravaApi(
                    AppError::STRAVA_TOKEN_ERROR.to_string(),
                ));
            }

            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

/// Body returned by the subscription endpoint.
#[derive(Debug, Deserialize)]
struct CreateSubscriptionResponse {
    #[serde(default)]
    id: Option<u64>,
}
