// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Missing credentials are fatal at startup; nothing is re-read per request.

use std::env;
use std::str::FromStr;

/// Default Strava host. Paths such as `/api/v3/activities` are appended.
pub const DEFAULT_STRAVA_API_URL: &str = "https://www.strava.com";

/// Default upper bound on pages fetched for a single totals request.
pub const DEFAULT_ACTIVITY_MAX_PAGES: u32 = 50;

/// Which store implementation backs the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Firestore,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(StorageBackend::Firestore),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::Invalid("STORAGE_BACKEND", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Strava host, overridable for local mocks
    pub strava_api_url: String,
    /// Frontend URL for CORS and error redirects
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Storage backend selection
    pub storage_backend: StorageBackend,
    /// Server port
    pub port: u16,
    /// Maximum activity pages fetched per totals request
    pub activity_max_pages: u32,

    // --- Secrets ---
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Webhook verification token. `None` disables webhook registration.
    pub webhook_verify_token: Option<String>,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_api_url: DEFAULT_STRAVA_API_URL.to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            storage_backend: StorageBackend::Memory,
            port: 8080,
            activity_max_pages: DEFAULT_ACTIVITY_MAX_PAGES,
            strava_client_secret: "test_secret".to_string(),
            webhook_verify_token: Some("test_verify_token".to_string()),
        }
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            strava_client_id: required("STRAVA_CLIENT_ID")?,
            strava_api_url: env::var("STRAVA_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_STRAVA_API_URL.to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            storage_backend: env::var("STORAGE_BACKEND")
                .map(|v| v.parse())
                .unwrap_or(Ok(StorageBackend::Firestore))?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            activity_max_pages: match env::var("ACTIVITY_MAX_PAGES") {
                Ok(v) => v
                    .trim()
                    .parse()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or(ConfigError::Invalid("ACTIVITY_MAX_PAGES", v))?,
                Err(_) => DEFAULT_ACTIVITY_MAX_PAGES,
            },

            strava_client_secret: required("STRAVA_CLIENT_SECRET")?,
            webhook_verify_token: non_empty(env::var("WEBHOOK_VERIFY_TOKEN").ok()),
        })
    }
}

/// Secrets are compared byte for byte, so only the empty value is dropped.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
