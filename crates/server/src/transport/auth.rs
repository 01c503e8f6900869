// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::{Error, ErrorResponse};
use crate::state::AppState;

/// Constant-time string comparison to prevent timing side-channel attacks.
pub(crate) fn constant_time_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    let mut acc = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        acc |= x ^ y;
    }
    acc == 0
}

/// Validate a Bearer token from HTTP headers. A `None` expected token
/// disables admin auth entirely.
pub fn validate_bearer(headers: &HeaderMap, expected: Option<&str>) -> Result<(), Error> {
    let expected = match expected {
        Some(tok) => tok,
        None => return Ok(()),
    };

    let header =
        headers.get("authorization").and_then(|v| v.to_str().ok()).ok_or(Error::Unauthorized)?;

    let token = header.strip_prefix("Bearer ").ok_or(Error::Unauthorized)?;
    if constant_time_eq(token, expected) {
        Ok(())
    } else {
        Err(Error::Unauthorized)
    }
}

/// Axum middleware that enforces Bearer token authentication.
///
/// Exempt: `/api/v1/health`, the OAuth browser surface, and the Strava-facing
/// webhook callback. The webhook carries its own verify-token handshake and
/// the OAuth pages are initiated by browser redirects (no bearer token).
pub async fn auth_layer(
    state: State<Arc<AppState>>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let path = req.uri().path();

    if path == "/api/v1/health" || path == "/auth" || path == "/callback" || path == "/webhook" {
        return next.run(req).await;
    }

    if let Err(code) = validate_bearer(req.headers(), state.config.auth_token.as_deref()) {
        let body = ErrorResponse { error: code.to_error_body("missing or invalid bearer token") };
        return (
            StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::UNAUTHORIZED),
            axum::Json(body),
        )
            .into_response();
    }

    next.run(req).await
}
