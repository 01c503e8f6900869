// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Strava-facing webhook callback: verification handshake and event intake.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::Error;
use crate::state::AppState;
use crate::strava::models::WebhookEvent;
use crate::transport::auth::constant_time_eq;
use crate::webhook::dispatch::{self, QueuedEvent};

/// `GET /webhook` — subscription verification handshake.
///
/// The challenge is echoed back only when the verify token matches the
/// configured secret. A mismatch means someone other than our own
/// subscription registration is probing the callback, so they get nothing.
pub async fn verify(
    State(s): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let token = params.get("hub.verify_token").map(String::as_str).unwrap_or_default();
    if !constant_time_eq(token, &s.config.verify_token) {
        tracing::warn!("webhook verification with wrong verify token");
        return Error::BadRequest("invalid verification token".to_owned())
            .to_http_response()
            .into_response();
    }

    match params.get("hub.challenge") {
        Some(challenge) if !challenge.is_empty() => {
            tracing::info!("webhook verification challenge answered");
            Json(serde_json::json!({ "hub.challenge": challenge })).into_response()
        }
        _ => Error::BadRequest("missing challenge".to_owned()).to_http_response().into_response(),
    }
}

/// `POST /webhook` — event intake.
///
/// Acknowledge immediately: Strava retries deliveries that do not get a fast
/// 200, and the processing outcome must not influence the response. Only
/// activity-create events are queued. A full queue drops the event; the
/// athlete can always catch up with a manual rename scan.
pub async fn receive(
    State(s): State<Arc<AppState>>,
    Json(event): Json<WebhookEvent>,
) -> impl IntoResponse {
    if !dispatch::wants(&event) {
        tracing::debug!(
            object_type = %event.object_type,
            aspect_type = %event.aspect_type,
            object_id = event.object_id,
            "ignoring event"
        );
        return StatusCode::OK;
    }

    let queued = QueuedEvent::new(event);
    tracing::info!(
        delivery = %queued.id,
        activity_id = queued.event.object_id,
        owner_id = queued.event.owner_id,
        "queued activity create event"
    );
    if let Err(e) = s.events.try_send(queued) {
        tracing::warn!(err = %e, "event queue full, dropping event");
    }
    StatusCode::OK
}
