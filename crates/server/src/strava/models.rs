// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire types for the Strava v3 API.

use serde::{Deserialize, Serialize};

/// Response from `POST /oauth/token`, both code exchange and refresh.
///
/// The `athlete` object is present on the initial code exchange only. A
/// missing `refresh_token` means the current one stays valid.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchange {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    /// Expiry as epoch seconds.
    pub expires_at: i64,
    #[serde(default)]
    pub athlete: Option<AthleteRef>,
}

/// Minimal athlete reference embedded in the token exchange response.
#[derive(Debug, Clone, Deserialize)]
pub struct AthleteRef {
    pub id: i64,
}

/// Athlete profile from `GET /api/v3/athlete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Athlete {
    pub id: i64,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

/// Activity summary, restricted to the fields the renamer reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub name: String,
    /// Granular sport type ("Run", "GravelRide", "WeightTraining", ...).
    #[serde(default)]
    pub sport_type: String,
    /// Legacy coarse type, kept as a fallback for older payloads.
    #[serde(default, rename = "type")]
    pub activity_type: String,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub moving_time: i64,
}

/// A registered webhook push subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    #[serde(default)]
    pub application_id: i64,
    pub callback_url: String,
}

/// Inbound webhook event payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// "activity" or "athlete".
    pub object_type: String,
    /// Activity id or athlete id, per `object_type`.
    pub object_id: i64,
    /// "create", "update" or "delete".
    pub aspect_type: String,
    /// Athlete who owns the object.
    pub owner_id: i64,
    #[serde(default)]
    pub updates: serde_json::Value,
}
