// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy shared across the service.

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Failures the service distinguishes between.
///
/// `TransientIo` is retryable by the caller; nothing in this crate retries
/// automatically. `AuthRevoked` is terminal for an athlete until they run the
/// OAuth flow again. `Conflict` never escapes the reconciler in normal
/// operation, it is resolved by adopting the existing subscription.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network failure, upstream 5xx, or store I/O.
    #[error("transient i/o: {0}")]
    TransientIo(String),

    /// The upstream rejected the refresh grant. Re-authentication required.
    #[error("authorization revoked")]
    AuthRevoked,

    /// No stored token or no subscription. Expected during normal operation.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The upstream reports the subscription already exists.
    #[error("subscription already exists upstream")]
    Conflict,

    /// Malformed client input, including verify-token mismatches.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid admin bearer token.
    #[error("unauthorized")]
    Unauthorized,

    /// Invalid configuration. Fatal at startup, never raised at request time.
    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status code this error maps to.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::TransientIo(_) => 500,
            Self::AuthRevoked => 401,
            Self::NotFound(_) => 401,
            Self::Conflict => 409,
            Self::BadRequest(_) => 400,
            Self::Unauthorized => 401,
            Self::Config(_) => 500,
        }
    }

    /// Stable machine-readable code for the response envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TransientIo(_) => "UPSTREAM_IO",
            Self::AuthRevoked => "AUTH_REVOKED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict => "ALREADY_EXISTS",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Config(_) => "CONFIG",
        }
    }

    /// Message safe to hand to clients. Upstream response bodies stay in the
    /// server logs only.
    fn public_message(&self) -> String {
        match self {
            Self::TransientIo(_) => "upstream temporarily unavailable".to_owned(),
            other => other.to_string(),
        }
    }

    /// Create an [`ErrorBody`] with this error's code.
    pub fn to_error_body(&self, message: impl Into<String>) -> ErrorBody {
        ErrorBody { code: self.code().to_owned(), message: message.into() }
    }

    /// Create a full HTTP error response for this error.
    pub fn to_http_response(&self) -> (StatusCode, Json<ErrorResponse>) {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse { error: self.to_error_body(self.public_message()) };
        (status, Json(body))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::TransientIo(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::TransientIo(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::TransientIo(e.to_string())
    }
}

/// Standard error response envelope: `{"error": {"code", "message"}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
