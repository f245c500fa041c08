// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inference provider trait for hosted model APIs.

use async_trait::async_trait;

use crate::error::FluxgateError;
use crate::types::{GeneratedImage, TextGeneration};

/// Adapter for a hosted inference API.
///
/// One outbound call per operation, no retries. Failures are returned as
/// values so the processor can persist them without unwinding.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Runs the text-generation model over `input`.
    async fn generate_text(&self, input: &str) -> Result<TextGeneration, FluxgateError>;

    /// Runs the image-generation model over `input`.
    async fn generate_image(&self, input: &str) -> Result<GeneratedImage, FluxgateError>;
}
