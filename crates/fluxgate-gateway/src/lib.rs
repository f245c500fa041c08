// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the fluxgate relay.
//!
//! Exposes the relay endpoint plus the record-listing, image-download, and
//! health routes over axum, translating processor outcomes into HTTP
//! responses.

pub mod handlers;
pub mod server;

pub use server::{start_server, GatewayState, ServerConfig};
