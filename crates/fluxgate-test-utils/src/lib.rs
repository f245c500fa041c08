// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for fluxgate integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests
//! without external services.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock inference provider with queued results
//! - [`MockRequestStore`] - Row store recording updates, with failure injection
//! - [`MockObjectStore`] - Blob store recording uploads and serving seeded objects

pub mod mock_provider;
pub mod mock_store;

pub use mock_provider::MockProvider;
pub use mock_store::{MockObjectStore, MockRequestStore};
