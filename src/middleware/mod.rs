// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware and request helpers (session auth, origin, webhook bootstrap).

pub mod auth;
pub mod origin;
pub mod webhook_init;

pub use auth::{authenticate, AuthUser};
pub use origin::RequestOrigin;
pub use webhook_init::ensure_webhook_subscription;
