// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava push subscription record.

use serde::{Deserialize, Serialize};

/// The push subscription registered for one deployment origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSubscription {
    /// Public base URL of the deployment, e.g. `https://runreport.app`
    pub origin: String,
    /// Subscription ID assigned by Strava
    pub subscription_id: u64,
}
