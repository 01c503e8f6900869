// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service configuration from CLI flags and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

/// Configuration for the sprocket server.
#[derive(Debug, Clone, clap::Parser)]
#[command(
    name = "sprocket",
    version,
    about = "Strava activity renamer: OAuth token lifecycle and webhook subscription reconciliation"
)]
pub struct Config {
    /// Host to bind on.
    #[arg(long, default_value = "127.0.0.1", env = "SPROCKET_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8080, env = "SPROCKET_PORT")]
    pub port: u16,

    /// Strava application client id.
    #[arg(long, default_value = "", env = "STRAVA_CLIENT_ID")]
    pub client_id: String,

    /// Strava application client secret.
    #[arg(long, default_value = "", env = "STRAVA_CLIENT_SECRET")]
    pub client_secret: String,

    /// Secret Strava echoes back during the webhook verification handshake.
    #[arg(long, default_value = "", env = "SPROCKET_VERIFY_TOKEN")]
    pub verify_token: String,

    /// Public base URL of this deployment, no trailing slash. The webhook
    /// callback is `{base_url}/webhook` and the OAuth redirect
    /// `{base_url}/callback`.
    #[arg(long, default_value = "", env = "SPROCKET_BASE_URL")]
    pub base_url: String,

    /// Bearer token required on the admin API. Unset disables auth.
    #[arg(long, env = "SPROCKET_AUTH_TOKEN")]
    pub auth_token: Option<String>,

    /// Token store backend: "file" or "memory".
    #[arg(long, default_value = "file", env = "SPROCKET_STORE")]
    pub store: String,

    /// Directory for persisted state when using the file store.
    #[arg(long, env = "SPROCKET_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Strava base URL. Point at a mock server in tests.
    #[arg(long, default_value = "https://www.strava.com", env = "SPROCKET_UPSTREAM_BASE")]
    pub upstream_base: String,

    /// Margin before expiry at which a token counts as expired and gets
    /// refreshed proactively.
    #[arg(long, default_value_t = 300, env = "SPROCKET_REFRESH_SKEW_SECS")]
    pub refresh_skew_secs: u64,

    /// Minutes between subscription health checks. 0 disables the worker.
    #[arg(long, default_value_t = 15, env = "SPROCKET_CHECK_INTERVAL_MINS")]
    pub check_interval_mins: u64,

    /// Timeout for each upstream HTTP call, in seconds.
    #[arg(long, default_value_t = 10, env = "SPROCKET_HTTP_TIMEOUT_SECS")]
    pub http_timeout_secs: u64,
}

impl Config {
    /// The webhook callback URL registered with Strava.
    pub fn callback_url(&self) -> String {
        format!("{}/webhook", self.base_url.trim_end_matches('/'))
    }

    /// The OAuth redirect URL handed to Strava's authorize page.
    pub fn redirect_url(&self) -> String {
        format!("{}/callback", self.base_url.trim_end_matches('/'))
    }

    pub fn refresh_skew(&self) -> Duration {
        Duration::from_secs(self.refresh_skew_secs)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_mins * 60)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Resolve the state directory: explicit flag, then `$XDG_STATE_HOME`,
    /// then `$HOME/.local/state`.
    pub fn state_dir(&self) -> PathBuf {
        if let Some(dir) = &self.state_dir {
            return dir.clone();
        }
        if let Ok(dir) = std::env::var("XDG_STATE_HOME") {
            if !dir.is_empty() {
                return PathBuf::from(dir).join("sprocket");
            }
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_owned());
        PathBuf::from(home).join(".local").join("state").join("sprocket")
    }

    /// Validate settings that are fatal at startup.
    pub fn validate(&self) -> Result<(), Error> {
        if self.client_id.is_empty() {
            return Err(Error::Config("STRAVA_CLIENT_ID is required".to_owned()));
        }
        if self.client_secret.is_empty() {
            return Err(Error::Config("STRAVA_CLIENT_SECRET is required".to_owned()));
        }
        if self.verify_token.is_empty() {
            return Err(Error::Config("SPROCKET_VERIFY_TOKEN is required".to_owned()));
        }
        if self.base_url.is_empty() {
            return Err(Error::Config("SPROCKET_BASE_URL is required".to_owned()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!("base URL must be http(s): {}", self.base_url)));
        }
        match self.store.as_str() {
            "file" | "memory" => {}
            other => return Err(Error::Config(format!("unknown store backend: {other}"))),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
