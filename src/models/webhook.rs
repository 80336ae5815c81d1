// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava webhook event payload.

use serde::Deserialize;
use std::collections::HashMap;

/// What happened to the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectType {
    Create,
    Update,
    Delete,
    #[serde(other)]
    Unknown,
}

/// Kind of object the event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Activity,
    Athlete,
    #[serde(other)]
    Unknown,
}

/// Event pushed by Strava to the subscription callback.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub aspect_type: AspectType,
    /// Activity ID, or athlete ID for athlete events
    pub object_id: u64,
    pub object_type: ObjectType,
    pub subscription_id: u64,
    #[serde(default)]
    pub owner_id: Option<u64>,
    #[serde(default)]
    pub event_time: Option<i64>,
    /// For athlete events, contains {"authorized": "false"} on deauthorization
    #[serde(default)]
    pub updates: HashMap<String, serde_json::Value>,
}

impl WebhookEvent {
    /// True only when `updates.authorized` is the string `"false"`.
    pub fn is_deauthorization(&self) -> bool {
        self.updates
            .get("authorized")
            .and_then(|v| v.as_str())
            .is_some_and(|v| v == "false")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_deauthorization() {
        let event: WebhookEvent = serde_json::from_value(json!({
            "aspect_type": "update",
            "event_time": 1516126040,
            "object_id": 134815,
            "object_type": "athlete",
            "owner_id": 134815,
            "subscription_id": 120475,
            "updates": {"authorized": "false"}
        }))
        .unwrap();

        assert_eq!(event.aspect_type, AspectType::Update);
        assert_eq!(event.object_type, ObjectType::Athlete);
        assert!(event.is_deauthorization());
    }

    #[test]
    fn test_authorized_must_be_string_false() {
        let event: WebhookEvent = serde_json::from_value(json!({
            "aspect_type": "update",
            "object_id": 1,
            "object_type": "athlete",
            "subscription_id": 2,
            "updates": {"authorized": false}
        }))
        .unwrap();
        assert!(!event.is_deauthorization());
    }

    #[test]
    fn test_unknown_types_and_missing_updates() {
        let event: WebhookEvent = serde_json::from_value(json!({
            "aspect_type": "deauthorize",
            "object_id": 1,
            "object_type": "club",
            "subscription_id": 2
        }))
        .unwrap();
        assert_eq!(event.aspect_type, AspectType::Unknown);
        assert_eq!(event.object_type, ObjectType::Unknown);
        assert!(event.updates.is_empty());
        assert!(!event.is_deauthorization());
    }
}
