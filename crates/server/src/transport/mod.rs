// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport: router assembly and middleware.

pub mod auth;
pub mod http;
pub mod oauth;
pub mod webhook;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Build the axum `Router` with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health (no auth)
        .route("/api/v1/health", get(http::health))
        // OAuth browser surface
        .route("/auth", get(oauth::authorize))
        .route("/callback", get(oauth::callback))
        // Strava-facing webhook callback
        .route("/webhook", get(webhook::verify).post(webhook::receive))
        // Subscription management
        .route(
            "/api/v1/subscription",
            get(http::subscription_status)
                .post(http::subscription_ensure)
                .delete(http::subscription_teardown),
        )
        // Athletes
        .route(
            "/api/v1/athletes/{id}",
            get(http::athlete_profile).delete(http::athlete_disconnect),
        )
        .route("/api/v1/athletes/{id}/rename", post(http::rename_recent))
        // Middleware
        .layer(middleware::from_fn_with_state(state.clone(), auth::auth_layer))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
