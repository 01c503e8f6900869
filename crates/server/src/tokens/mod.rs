// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OAuth token lifecycle.

pub mod manager;

pub use manager::TokenManager;
