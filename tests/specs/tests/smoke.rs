// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end smoke tests that spawn the real `sprocket` binary.

use std::time::Duration;

use sprocket_specs::{sprocket_binary, SprocketProcess, VERIFY_TOKEN};

const TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::test]
async fn health_endpoint_responds() -> anyhow::Result<()> {
    let server = SprocketProcess::start()?;
    server.wait_healthy(TIMEOUT).await?;

    let body: serde_json::Value =
        reqwest::get(format!("{}/api/v1/health", server.base_url())).await?.json().await?;
    assert_eq!(body["status"], "running");
    assert_eq!(body["store"], "memory");
    Ok(())
}

#[tokio::test]
async fn webhook_handshake_round_trip() -> anyhow::Result<()> {
    let server = SprocketProcess::start()?;
    server.wait_healthy(TIMEOUT).await?;

    let client = reqwest::Client::new();
    let resp = client
        .get(format!("{}/webhook", server.base_url()))
        .query(&[
            ("hub.mode", "subscribe"),
            ("hub.verify_token", VERIFY_TOKEN),
            ("hub.challenge", "e2e-challenge"),
        ])
        .send()
        .await?;
    anyhow::ensure!(resp.status().is_success(), "handshake failed: {}", resp.status());
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["hub.challenge"], "e2e-challenge");

    // A wrong verify token never earns the challenge back.
    let resp = client
        .get(format!("{}/webhook", server.base_url()))
        .query(&[("hub.verify_token", "wrong"), ("hub.challenge", "e2e-challenge")])
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 400);
    let text = resp.text().await?;
    assert!(!text.contains("e2e-challenge"));
    Ok(())
}

#[tokio::test]
async fn webhook_events_are_always_acked() -> anyhow::Result<()> {
    let server = SprocketProcess::start()?;
    server.wait_healthy(TIMEOUT).await?;

    let client = reqwest::Client::new();

    // Aspect types the renamer ignores are acknowledged anyway.
    let resp = client
        .post(format!("{}/webhook", server.base_url()))
        .json(&serde_json::json!({
            "object_type": "activity",
            "object_id": 1,
            "aspect_type": "update",
            "owner_id": 7,
            "updates": {"title": "new name"},
        }))
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 200);

    // Processing failures (unknown owner, unreachable upstream) must not
    // leak into the response either.
    let resp = client
        .post(format!("{}/webhook", server.base_url()))
        .json(&serde_json::json!({
            "object_type": "activity",
            "object_id": 2,
            "aspect_type": "create",
            "owner_id": 7,
        }))
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 200);
    Ok(())
}

#[tokio::test]
async fn subscription_status_is_inactive_offline() -> anyhow::Result<()> {
    let server = SprocketProcess::start()?;
    server.wait_healthy(TIMEOUT).await?;

    let body: serde_json::Value =
        reqwest::get(format!("{}/api/v1/subscription", server.base_url())).await?.json().await?;
    assert_eq!(body["active"], false);
    Ok(())
}

#[tokio::test]
async fn missing_required_config_exits_nonzero() -> anyhow::Result<()> {
    let binary = sprocket_binary();
    anyhow::ensure!(binary.exists(), "sprocket binary not found at {}", binary.display());

    let output = std::process::Command::new(&binary)
        .args(["--port", "0", "--store", "memory"])
        .env_remove("STRAVA_CLIENT_ID")
        .env_remove("STRAVA_CLIENT_SECRET")
        .env_remove("SPROCKET_VERIFY_TOKEN")
        .env_remove("SPROCKET_BASE_URL")
        .output()?;
    anyhow::ensure!(!output.status.success(), "expected startup to fail without credentials");
    Ok(())
}
