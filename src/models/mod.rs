// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod subscription;
pub mod user;
pub mod webhook;

pub use activity::{ActivityTotals, SummaryActivity};
pub use subscription::WebhookSubscription;
pub use user::{AccessTokenEntry, UserEntry};
pub use webhook::{AspectType, ObjectType, WebhookEvent};
