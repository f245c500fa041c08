// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the HuggingFace Inference API.
//!
//! Provides [`HfClient`], which handles request construction, bearer-token
//! authentication, and normalization of API failures into error values.
//! Each operation is a single outbound call: a non-success status, an
//! unexpected response shape, or an empty image body is a hard failure for
//! that call. There is no retry path.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use fluxgate_config::model::HuggingFaceConfig;
use fluxgate_core::{FluxgateError, GeneratedImage, InferenceProvider, TextGeneration};

use crate::types::{ApiErrorBody, ImageParameters, InferenceRequest, TextParameters};

/// HTTP client for the HuggingFace Inference API.
///
/// Holds a connection pool with `Authorization: Bearer <token>` and JSON
/// content-type default headers. The text and image model endpoints are
/// derived from the configured base URL.
#[derive(Debug, Clone)]
pub struct HfClient {
    client: reqwest::Client,
    base_url: String,
    config: HuggingFaceConfig,
}

impl HfClient {
    /// Creates a new Inference API client.
    ///
    /// Fails with a `Config` error when no API token is configured or the
    /// token cannot be used as a header value.
    pub fn new(config: &HuggingFaceConfig) -> Result<Self, FluxgateError> {
        let token = config.api_token.as_deref().ok_or_else(|| {
            FluxgateError::Config("huggingface.api_token is required".to_string())
        })?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| FluxgateError::Config(format!("invalid API token header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FluxgateError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config: config.clone(),
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url, model)
    }
}

#[async_trait]
impl InferenceProvider for HfClient {
    /// Runs the configured text-generation model over `input`.
    ///
    /// The `generated_text` field is extracted from either response shape
    /// the API produces (bare object or single-element array); absence under
    /// both is a failure. `usage.total_tokens` is captured when present.
    async fn generate_text(&self, input: &str) -> Result<TextGeneration, FluxgateError> {
        let request = InferenceRequest {
            inputs: input,
            parameters: TextParameters {
                max_new_tokens: self.config.max_new_tokens,
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                return_full_text: false,
            },
        };

        let response = self
            .client
            .post(self.model_url(&self.config.text_model))
            .json(&request)
            .send()
            .await
            .map_err(|e| FluxgateError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model = %self.config.text_model, "text generation response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FluxgateError::Provider {
                message: api_error_message(status, &body),
                source: None,
            });
        }

        let body = response.text().await.map_err(|e| FluxgateError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| FluxgateError::Provider {
                message: format!("failed to parse API response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let text = extract_generated_text(&value).ok_or_else(|| FluxgateError::Provider {
            message: "response carries no generated_text field".to_string(),
            source: None,
        })?;

        Ok(TextGeneration {
            text,
            token_count: extract_token_count(&value),
        })
    }

    /// Runs the configured image-generation model over `input`.
    ///
    /// The raw binary body is captured verbatim; a non-`image/*` content
    /// type or an empty body is a failure.
    async fn generate_image(&self, input: &str) -> Result<GeneratedImage, FluxgateError> {
        let request = InferenceRequest {
            inputs: input,
            parameters: ImageParameters {
                num_inference_steps: self.config.num_inference_steps,
                guidance_scale: self.config.guidance_scale,
            },
        };

        let response = self
            .client
            .post(self.model_url(&self.config.image_model))
            .json(&request)
            .send()
            .await
            .map_err(|e| FluxgateError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model = %self.config.image_model, "image generation response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FluxgateError::Provider {
                message: api_error_message(status, &body),
                source: None,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(FluxgateError::Provider {
                message: format!(
                    "unexpected content type `{content_type}`, expected an image response"
                ),
                source: None,
            });
        }

        let bytes = response.bytes().await.map_err(|e| FluxgateError::Provider {
            message: format!("failed to read image body: {e}"),
            source: Some(Box::new(e)),
        })?;
        if bytes.is_empty() {
            return Err(FluxgateError::Provider {
                message: "received empty image body".to_string(),
                source: None,
            });
        }

        Ok(GeneratedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

/// Fold a non-success response into a flat provider error message, using the
/// API's own `{"error": ..}` body when it parses.
fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(api_err) => format!("inference API error ({status}): {}", api_err.message()),
        Err(_) => format!("inference API returned {status}: {body}"),
    }
}

/// Extract `generated_text` from either expected response shape:
/// `[{"generated_text": ..}]` or a bare `{"generated_text": ..}` object.
fn extract_generated_text(value: &serde_json::Value) -> Option<String> {
    let object = match value {
        serde_json::Value::Array(items) => items.first()?,
        other => other,
    };
    object
        .get("generated_text")?
        .as_str()
        .map(str::to_string)
}

/// Extract `usage.total_tokens` when the response reports it.
fn extract_token_count(value: &serde_json::Value) -> Option<u64> {
    let object = match value {
        serde_json::Value::Array(items) => items.first()?,
        other => other,
    };
    object.get("usage")?.get("total_tokens")?.as_u64()
}
