// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Strava API surface: wire types and the HTTP client.

pub mod client;
pub mod models;

pub use client::StravaClient;
