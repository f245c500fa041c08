// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the fluxgate relay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level fluxgate configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; required secrets are checked at adapter construction time.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FluxgateConfig {
    /// HTTP server bind settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Supabase datastore and object-storage settings.
    #[serde(default)]
    pub supabase: SupabaseConfig,

    /// HuggingFace Inference API settings.
    #[serde(default)]
    pub huggingface: HuggingFaceConfig,

    /// Service-wide settings (logging).
    #[serde(default)]
    pub service: ServiceConfig,
}

/// HTTP server bind configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Supabase datastore and object-storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SupabaseConfig {
    /// Project base URL (e.g. `https://xyz.supabase.co`). Required to serve.
    #[serde(default)]
    pub url: Option<String>,

    /// Anon API key. Used when no service role key is configured.
    #[serde(default)]
    pub anon_key: Option<String>,

    /// Service role key. Preferred over the anon key when present.
    #[serde(default)]
    pub service_role_key: Option<String>,

    /// Storage bucket holding generated images.
    #[serde(default = "default_storage_bucket")]
    pub storage_bucket: String,
}

impl SupabaseConfig {
    /// The API key requests should authenticate with.
    ///
    /// Service role key wins over the anon key when both are configured.
    pub fn effective_key(&self) -> Option<&str> {
        self.service_role_key
            .as_deref()
            .or(self.anon_key.as_deref())
    }
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            service_role_key: None,
            storage_bucket: default_storage_bucket(),
        }
    }
}

fn default_storage_bucket() -> String {
    "generated-images".to_string()
}

/// HuggingFace Inference API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HuggingFaceConfig {
    /// API token. Required to serve.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Inference API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier for text-to-text requests.
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Model identifier for text-to-image requests.
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Maximum tokens to generate per text request.
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,

    /// Sampling temperature for text generation.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Nucleus sampling cutoff for text generation.
    #[serde(default = "default_top_p")]
    pub top_p: f64,

    /// Diffusion step count for image generation.
    #[serde(default = "default_num_inference_steps")]
    pub num_inference_steps: u32,

    /// Classifier-free guidance scale for image generation.
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f64,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: default_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            max_new_tokens: default_max_new_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            num_inference_steps: default_num_inference_steps(),
            guidance_scale: default_guidance_scale(),
        }
    }
}

fn default_base_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_text_model() -> String {
    "google/gemma-2-2b-it".to_string()
}

fn default_image_model() -> String {
    "black-forest-labs/FLUX.1-dev".to_string()
}

fn default_max_new_tokens() -> u32 {
    512
}

fn default_temperature() -> f64 {
    0.7
}

fn default_top_p() -> f64 {
    0.95
}

fn default_num_inference_steps() -> u32 {
    30
}

fn default_guidance_scale() -> f64 {
    7.5
}

/// Service-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
