// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity totals service.
//!
//! Handles the core workflow:
//! 1. Look up the user's Strava access token
//! 2. Page through the athlete's activities from the last seven days
//! 3. Keep only runs
//! 4. Sum distance, elevation gain and moving time

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{ActivityTotals, SummaryActivity};
use crate::services::strava::StravaClient;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Strava's default page size; a shorter page is the last one.
pub const ACTIVITIES_PER_PAGE: usize = 30;

/// Trailing window covered by the totals.
const WINDOW_DAYS: i64 = 7;

/// Only this activity type counts towards totals.
const COUNTED_TYPE: &str = "Run";

/// Computes trailing-week running totals for a user.
pub struct ActivityAggregator {
    store: Arc<dyn Store>,
    strava: StravaClient,
    max_pages: u32,
}

impl ActivityAggregator {
    pub fn new(store: Arc<dyn Store>, strava: StravaClient, max_pages: u32) -> Self {
        Self {
            store,
            strava,
            max_pages,
        }
    }

    /// Totals for the seven days before now.
    pub async fn totals_for_user(&self, user_id: &str) -> Result<ActivityTotals> {
        self.totals_for_user_at(user_id, Utc::now()).await
    }

    /// Totals for the seven days before `now`.
    ///
    /// Unknown users get zero totals without any call to Strava.
    pub async fn totals_for_user_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ActivityTotals> {
        let Some(user) = self.store.get_user(user_id).await? else {
            tracing::debug!(user_id, "No user entry, returning empty totals");
            return Ok(ActivityTotals::default());
        };

        let after = (now - Duration::days(WINDOW_DAYS)).timestamp();
        let activities = self
            .fetch_activities(&user.strava_access_token, after)
            .await?;

        let totals = activities
            .iter()
            .filter(|a| a.activity_type == COUNTED_TYPE)
            .fold(ActivityTotals::default(), ActivityTotals::add);

        tracing::info!(
            user_id,
            fetched = activities.len(),
            distance = totals.distance,
            time_ms = totals.time,
            "Computed activity totals"
        );

        Ok(totals)
    }

    /// Fetch pages sequentially until Strava returns a short page.
    async fn fetch_activities(
        &self,
        access_token: &str,
        after: i64,
    ) -> Result<Vec<SummaryActivity>> {
        let mut activities = Vec::new();
        let mut page = 1;

        loop {
            if page > self.max_pages {
                return Err(AppError::PaginationLimit(self.max_pages));
            }

            let batch = self.strava.list_activities(access_token, after, page).await?;
            let complete = batch.len() < ACTIVITIES_PER_PAGE;
            tracing::debug!(page, count = batch.len(), "Fetched activity page");
            activities.extend(batch);

            if complete {
                return Ok(activities);
            }
            page += 1;
        }
    }
}
