// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request lifecycle orchestration for the fluxgate relay.
//!
//! [`RequestProcessor`] drives a single persisted request through
//! `processing -> {completed | failed}` around one inference call.

pub mod processor;

pub use processor::RequestProcessor;
