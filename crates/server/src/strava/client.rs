// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the Strava API.
//!
//! The client is stateless with respect to athletes: access tokens are passed
//! per call. It holds only the application credentials and the base URL.

use std::time::Duration;

use reqwest::StatusCode;

use crate::error::{Error, Result};
use crate::strava::models::{Activity, Athlete, Subscription, TokenExchange};

/// OAuth scopes requested on the authorize redirect.
pub const OAUTH_SCOPE: &str = "read,read_all,profile:read_all,activity:read_all,activity:write";

pub struct StravaClient {
    base_url: String,
    client_id: String,
    client_secret: String,
    http: reqwest::Client,
}

impl StravaClient {
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let http = reqwest::Client::builder().timeout(timeout).build().unwrap_or_default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            http,
        }
    }

    fn oauth_url(&self, path: &str) -> String {
        format!("{}/oauth{}", self.base_url, path)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v3{}", self.base_url, path)
    }

    // -- OAuth ----------------------------------------------------------------

    /// Browser URL for the OAuth authorize page.
    pub fn authorize_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&approval_prompt=force&scope={}",
            self.oauth_url("/authorize"),
            self.client_id,
            urlencode(redirect_uri),
            urlencode(OAUTH_SCOPE),
        )
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenExchange> {
        self.token_request(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
        ])
        .await
    }

    /// Trade a refresh token for a fresh access token.
    ///
    /// A 400 or 401 response means the grant is dead (revoked app access or a
    /// refresh token already superseded by rotation) and maps to
    /// [`Error::AuthRevoked`].
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenExchange> {
        self.token_request(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenExchange> {
        let resp = self.http.post(self.oauth_url("/token")).form(form).send().await?;
        let status = resp.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            let text = resp.text().await.unwrap_or_default();
            tracing::debug!(status = %status, body = %text, "token grant rejected");
            return Err(Error::AuthRevoked);
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::TransientIo(format!("token endpoint ({status}): {text}")));
        }
        let token: TokenExchange = resp.json().await?;
        if token.access_token.is_empty() {
            return Err(Error::TransientIo("token endpoint returned empty access token".to_owned()));
        }
        Ok(token)
    }

    // -- Athlete and activities -----------------------------------------------

    /// Fetch the authenticated athlete's profile.
    pub async fn get_athlete(&self, access_token: &str) -> Result<Athlete> {
        let resp =
            self.http.get(self.api_url("/athlete")).bearer_auth(access_token).send().await?;
        let athlete = check(resp).await?.json().await?;
        Ok(athlete)
    }

    /// List one page of the athlete's recent activities.
    pub async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Activity>> {
        let resp = self
            .http
            .get(self.api_url("/athlete/activities"))
            .query(&[("page", page), ("per_page", per_page)])
            .bearer_auth(access_token)
            .send()
            .await?;
        let activities = check(resp).await?.json().await?;
        Ok(activities)
    }

    /// Fetch a single activity.
    pub async fn get_activity(&self, access_token: &str, activity_id: i64) -> Result<Activity> {
        let resp = self
            .http
            .get(self.api_url(&format!("/activities/{activity_id}")))
            .bearer_auth(access_token)
            .send()
            .await?;
        let activity = check(resp).await?.json().await?;
        Ok(activity)
    }

    /// Rename an activity.
    pub async fn update_activity_name(
        &self,
        access_token: &str,
        activity_id: i64,
        name: &str,
    ) -> Result<()> {
        let resp = self
            .http
            .put(self.api_url(&format!("/activities/{activity_id}")))
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    // -- Push subscriptions ---------------------------------------------------

    /// List all push subscriptions registered for this application.
    pub async fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        let resp = self
            .http
            .get(self.api_url("/push_subscriptions"))
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;
        let subs = check(resp).await?.json().await?;
        Ok(subs)
    }

    /// Create a push subscription.
    ///
    /// Strava rejects a duplicate registration with an "already exists" error
    /// body; that maps to [`Error::Conflict`] so the caller can re-list and
    /// adopt instead of failing.
    pub async fn create_subscription(
        &self,
        callback_url: &str,
        verify_token: &str,
    ) -> Result<Subscription> {
        let resp = self
            .http
            .post(self.api_url("/push_subscriptions"))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("callback_url", callback_url),
                ("verify_token", verify_token),
            ])
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            let sub = resp.json().await?;
            return Ok(sub);
        }
        let text = resp.text().await.unwrap_or_default();
        if text.contains("already exists") {
            return Err(Error::Conflict);
        }
        Err(Error::TransientIo(format!("create subscription ({status}): {text}")))
    }

    /// Delete a push subscription. Upstream 404 maps to [`Error::NotFound`].
    pub async fn delete_subscription(&self, subscription_id: i64) -> Result<()> {
        let resp = self
            .http
            .delete(self.api_url(&format!("/push_subscriptions/{subscription_id}")))
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound("subscription"));
        }
        let text = resp.text().await.unwrap_or_default();
        Err(Error::TransientIo(format!("delete subscription ({status}): {text}")))
    }
}

/// Map a non-token API response onto the error taxonomy.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED => Err(Error::AuthRevoked),
        StatusCode::NOT_FOUND => Err(Error::NotFound("upstream resource")),
        _ => Err(Error::TransientIo(format!("strava api ({status}): {text}"))),
    }
}

/// Percent-encode a query parameter value.
fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
