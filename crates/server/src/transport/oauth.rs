// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OAuth browser surface: authorize redirect and code-exchange callback.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::state::AppState;
use crate::store::TokenRecord;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConnectedResponse {
    pub athlete_id: i64,
    pub connected: bool,
}

/// `GET /auth` — send the browser to Strava's authorize page.
pub async fn authorize(State(s): State<Arc<AppState>>) -> impl IntoResponse {
    let url = s.strava.authorize_url(&s.config.redirect_url());
    Redirect::temporary(&url)
}

/// `GET /callback` — complete the code exchange and persist tokens.
pub async fn callback(
    State(s): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> impl IntoResponse {
    if let Some(denial) = params.error {
        return Error::BadRequest(format!("authorization denied: {denial}"))
            .to_http_response()
            .into_response();
    }
    let Some(code) = params.code else {
        return Error::BadRequest("missing authorization code".to_owned())
            .to_http_response()
            .into_response();
    };

    let token = match s.strava.exchange_code(&code).await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!(err = %e, "code exchange failed");
            return e.to_http_response().into_response();
        }
    };

    let Some(athlete) = token.athlete.as_ref() else {
        return Error::TransientIo("token exchange response missing athlete".to_owned())
            .to_http_response()
            .into_response();
    };
    let athlete_id = athlete.id;

    let record = TokenRecord {
        athlete_id,
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        expires_at: token.expires_at,
    };
    if let Err(e) = s.tokens.store_tokens(athlete_id, &record) {
        tracing::warn!(athlete_id, err = %e, "failed to persist tokens");
        return e.to_http_response().into_response();
    }

    tracing::info!(athlete_id, "athlete connected");
    Json(ConnectedResponse { athlete_id, connected: true }).into_response()
}
