//! User and session token models for storage.

use serde::{Deserialize, Serialize};

/// User record stored in Firestore (`users/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEntry {
    /// Internal user ID (also used as document ID)
    pub id: String,
    /// Strava athlete ID
    pub strava_id: u64,
    /// Strava OAuth access token
    pub strava_access_token: String,
    /// Strava OAuth refresh token
    pub strava_refresh_token: String,
    /// When the Strava access token expires (RFC 3339)
    pub token_expiry: String,
}

/// Session token issued to the browser, stored at `access_tokens/{token}`.
///
/// A user may hold any number of these (one per signed-in device).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessTokenEntry {
    /// Opaque token value carried in the session cookie
    pub token: String,
    /// Owning user ID
    pub user_id: String,
    /// When the token was issued (RFC 3339)
    pub created_at: String,
}
