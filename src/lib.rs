// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Runreport: weekly running totals from Strava
//!
//! This crate provides the backend API: it keeps a Strava push subscription
//! registered for the deployment, removes users who revoke access, and sums
//! up each user's runs from the last seven days.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Store;
use services::{ActivityAggregator, StravaClient, WebhookEventProcessor, WebhookLifecycle};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub webhook_lifecycle: WebhookLifecycle,
    pub event_processor: WebhookEventProcessor,
    pub activity_aggregator: ActivityAggregator,
}

impl AppState {
    /// Wire every service to one store and one Strava client.
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        let strava = StravaClient::new(
            &config.strava_api_url,
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
        );

        Self {
            webhook_lifecycle: WebhookLifecycle::new(
                store.clone(),
                strava.clone(),
                config.webhook_verify_token.clone(),
            ),
            event_processor: WebhookEventProcessor::new(store.clone()),
            activity_aggregator: ActivityAggregator::new(
                store.clone(),
                strava,
                config.activity_max_pages,
            ),
            store,
            config,
        }
    }
}
