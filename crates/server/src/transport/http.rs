// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON admin API handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::rename;
use crate::state::AppState;

// -- Request/Response types ---------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
}

#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub removed: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct RenameRequest {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RenameResponse {
    pub scanned: usize,
    pub renamed: usize,
}

// -- Handlers -----------------------------------------------------------------

/// `GET /api/v1/health`
pub async fn health(State(s): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse { status: "running".to_owned(), store: s.config.store.clone() })
}

/// `GET /api/v1/subscription` — in-memory reconciliation status.
pub async fn subscription_status(State(s): State<Arc<AppState>>) -> impl IntoResponse {
    Json(s.reconciler.status().await)
}

/// `POST /api/v1/subscription` — reconcile now.
pub async fn subscription_ensure(State(s): State<Arc<AppState>>) -> impl IntoResponse {
    match s.reconciler.ensure().await {
        Ok(sub) => Json(sub).into_response(),
        Err(e) => {
            tracing::warn!(err = %e, "subscription ensure failed");
            e.to_http_response().into_response()
        }
    }
}

/// `DELETE /api/v1/subscription` — tear the subscription down.
pub async fn subscription_teardown(State(s): State<Arc<AppState>>) -> impl IntoResponse {
    match s.reconciler.teardown().await {
        Ok(removed) => Json(RemovedResponse { removed }).into_response(),
        Err(e) => {
            tracing::warn!(err = %e, "subscription teardown failed");
            e.to_http_response().into_response()
        }
    }
}

/// `GET /api/v1/athletes/{id}` — athlete profile, proxied from Strava.
pub async fn athlete_profile(
    State(s): State<Arc<AppState>>,
    Path(athlete_id): Path<i64>,
) -> impl IntoResponse {
    let record = match s.tokens.get_valid(athlete_id).await {
        Ok(record) => record,
        Err(e) => return e.to_http_response().into_response(),
    };
    match s.strava.get_athlete(&record.access_token).await {
        Ok(athlete) => Json(athlete).into_response(),
        Err(e) => {
            tracing::warn!(athlete_id, err = %e, "athlete fetch failed");
            e.to_http_response().into_response()
        }
    }
}

/// `POST /api/v1/athletes/{id}/rename` — scan recent activities and rename
/// the default-titled ones.
pub async fn rename_recent(
    State(s): State<Arc<AppState>>,
    Path(athlete_id): Path<i64>,
    body: Option<Json<RenameRequest>>,
) -> impl IntoResponse {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let page = req.page.unwrap_or(1).max(1);
    let per_page = req.per_page.unwrap_or(30).clamp(1, 100);

    let record = match s.tokens.get_valid(athlete_id).await {
        Ok(record) => record,
        Err(e) => return e.to_http_response().into_response(),
    };
    match rename::rename_recent(&s.strava, &record.access_token, page, per_page).await {
        Ok((scanned, renamed)) => {
            tracing::info!(athlete_id, scanned, renamed, "bulk rename complete");
            Json(RenameResponse { scanned, renamed }).into_response()
        }
        Err(e) => {
            tracing::warn!(athlete_id, err = %e, "bulk rename failed");
            e.to_http_response().into_response()
        }
    }
}

/// `DELETE /api/v1/athletes/{id}` — forget the athlete's credentials.
pub async fn athlete_disconnect(
    State(s): State<Arc<AppState>>,
    Path(athlete_id): Path<i64>,
) -> impl IntoResponse {
    let existed = match s.tokens.is_connected(athlete_id) {
        Ok(existed) => existed,
        Err(e) => return e.to_http_response().into_response(),
    };
    match s.tokens.disconnect(athlete_id) {
        Ok(()) => {
            tracing::info!(athlete_id, "athlete disconnected");
            Json(RemovedResponse { removed: existed }).into_response()
        }
        Err(e) => e.to_http_response().into_response(),
    }
}
