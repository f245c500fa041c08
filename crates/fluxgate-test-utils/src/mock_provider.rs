// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock inference provider for deterministic testing.
//!
//! `MockProvider` implements `InferenceProvider` with pre-configured
//! results, enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use fluxgate_core::{FluxgateError, GeneratedImage, InferenceProvider, TextGeneration};

/// A mock inference provider that returns pre-configured results.
///
/// Results are popped from per-operation FIFO queues. When a queue is
/// empty, a default success value is returned.
pub struct MockProvider {
    text: Mutex<VecDeque<Result<TextGeneration, FluxgateError>>>,
    images: Mutex<VecDeque<Result<GeneratedImage, FluxgateError>>>,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a mock provider with empty queues.
    pub fn new() -> Self {
        Self::from_queues(Vec::new(), Vec::new())
    }

    /// Create a provider whose next text call yields `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::from_queues(
            vec![Ok(TextGeneration {
                text: text.into(),
                token_count: None,
            })],
            Vec::new(),
        )
    }

    /// Create a provider whose next text call yields `text` with a token count.
    pub fn with_text_tokens(text: impl Into<String>, token_count: u64) -> Self {
        Self::from_queues(
            vec![Ok(TextGeneration {
                text: text.into(),
                token_count: Some(token_count),
            })],
            Vec::new(),
        )
    }

    /// Create a provider whose next text call fails with a provider error.
    pub fn with_text_error(message: impl Into<String>) -> Self {
        Self::from_queues(
            vec![Err(FluxgateError::Provider {
                message: message.into(),
                source: None,
            })],
            Vec::new(),
        )
    }

    /// Create a provider whose next image call yields a PNG payload.
    pub fn with_image(bytes: Vec<u8>) -> Self {
        Self::from_queues(
            Vec::new(),
            vec![Ok(GeneratedImage {
                bytes,
                content_type: "image/png".to_string(),
            })],
        )
    }

    /// Create a provider whose next image call fails with a provider error.
    pub fn with_image_error(message: impl Into<String>) -> Self {
        Self::from_queues(
            Vec::new(),
            vec![Err(FluxgateError::Provider {
                message: message.into(),
                source: None,
            })],
        )
    }

    fn from_queues(
        text: Vec<Result<TextGeneration, FluxgateError>>,
        images: Vec<Result<GeneratedImage, FluxgateError>>,
    ) -> Self {
        Self {
            text: Mutex::new(VecDeque::from(text)),
            images: Mutex::new(VecDeque::from(images)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Total number of inference calls made against this provider.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceProvider for MockProvider {
    async fn generate_text(&self, _input: &str) -> Result<TextGeneration, FluxgateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text.lock().await.pop_front().unwrap_or_else(|| {
            Ok(TextGeneration {
                text: "mock response".to_string(),
                token_count: None,
            })
        })
    }

    async fn generate_image(&self, _input: &str) -> Result<GeneratedImage, FluxgateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.images.lock().await.pop_front().unwrap_or_else(|| {
            Ok(GeneratedImage {
                bytes: b"mock image".to_vec(),
                content_type: "image/png".to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let provider = MockProvider::new();
        let result = provider.generate_text("hi").await.unwrap();
        assert_eq!(result.text, "mock response");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn queued_error_is_returned_once() {
        let provider = MockProvider::with_text_error("model loading");
        let err = provider.generate_text("hi").await.unwrap_err();
        assert!(err.to_string().contains("model loading"));

        // Queue exhausted, falls back to the default success.
        let result = provider.generate_text("hi").await.unwrap();
        assert_eq!(result.text, "mock response");
    }

    #[tokio::test]
    async fn image_queue_is_independent_of_text_queue() {
        let provider = MockProvider::with_image(vec![1, 2, 3]);
        let image = provider.generate_image("a cat").await.unwrap();
        assert_eq!(image.bytes, vec![1, 2, 3]);
        assert_eq!(image.content_type, "image/png");

        let text = provider.generate_text("hi").await.unwrap();
        assert_eq!(text.text, "mock response");
        assert_eq!(provider.call_count(), 2);
    }
}
