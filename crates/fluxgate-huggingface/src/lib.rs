// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HuggingFace Inference API provider for the fluxgate relay.
//!
//! This crate implements [`fluxgate_core::InferenceProvider`] for the hosted
//! Inference API: one text-generation model and one image-generation model,
//! each reached by a single bearer-authenticated POST. Failures surface as
//! error values so the processor can persist them cleanly.

pub mod client;
pub mod types;

pub use client::HfClient;
