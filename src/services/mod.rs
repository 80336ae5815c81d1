// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod strava;
pub mod subscription;
pub mod url_builder;
pub mod webhook;

pub use activity::ActivityAggregator;
pub use strava::StravaClient;
pub use subscription::{EnsureOutcome, WebhookLifecycle};
pub use url_builder::UrlBuilder;
pub use webhook::{EventOutcome, IgnoreReason, WebhookEventProcessor};
