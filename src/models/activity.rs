// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity summaries and the totals computed from them.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Summary activity as returned by the Strava list endpoint.
///
/// Only the fields needed for totals are decoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryActivity {
    /// Activity type (Run, Ride, Walk, ...)
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Distance in meters
    #[serde(default)]
    pub distance: f64,
    /// Elevation gain in meters
    #[serde(default)]
    pub total_elevation_gain: f64,
    /// Moving time in seconds
    #[serde(default)]
    pub moving_time: u64,
}

/// Aggregate over a set of activities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityTotals {
    /// Meters
    pub distance: f64,
    /// Meters of elevation gain
    pub elevation: f64,
    /// Moving time in milliseconds
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub time: u64,
}

impl ActivityTotals {
    /// Add one activity to the running totals.
    pub fn add(self, activity: &SummaryActivity) -> Self {
        Self {
            distance: self.distance + activity.distance,
            elevation: self.elevation + activity.total_elevation_gain,
            time: self
                .time
                .saturating_add(activity.moving_time.saturating_mul(1_000)),
        }
    }
}
