// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Webhook subscription reconciliation and event dispatch.

pub mod dispatch;
pub mod reconciler;
pub mod worker;
