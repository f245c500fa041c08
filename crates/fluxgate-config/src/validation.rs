// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses and sampling parameter ranges.
//! Required secrets (Supabase URL/key, HuggingFace token) are deliberately
//! NOT validated here; they are checked at adapter construction so that
//! `doctor` and offline commands work without them.

use crate::diagnostic::ConfigError;
use crate::model::FluxgateConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &FluxgateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate server.host is not empty and looks like an IP or hostname.
    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!(
                    "server.host `{host}` is not a valid IP address or hostname"
                ),
            });
        }
    }

    // Validate supabase.url scheme when configured.
    if let Some(ref url) = config.supabase.url
        && !url.trim().is_empty()
        && !url.starts_with("http://")
        && !url.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!("supabase.url `{url}` must start with http:// or https://"),
        });
    }

    // Validate supabase.storage_bucket is not empty.
    if config.supabase.storage_bucket.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "supabase.storage_bucket must not be empty".to_string(),
        });
    }

    // Validate huggingface.base_url scheme.
    let base_url = config.huggingface.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!(
                "huggingface.base_url `{base_url}` must start with http:// or https://"
            ),
        });
    }

    // Validate text sampling parameter ranges.
    let temperature = config.huggingface.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "huggingface.temperature must be within [0.0, 2.0], got {temperature}"
            ),
        });
    }

    let top_p = config.huggingface.top_p;
    if !(top_p > 0.0 && top_p <= 1.0) {
        errors.push(ConfigError::Validation {
            message: format!("huggingface.top_p must be within (0.0, 1.0], got {top_p}"),
        });
    }

    if config.huggingface.max_new_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "huggingface.max_new_tokens must be at least 1".to_string(),
        });
    }

    // Validate diffusion parameter ranges.
    if config.huggingface.num_inference_steps == 0 {
        errors.push(ConfigError::Validation {
            message: "huggingface.num_inference_steps must be at least 1".to_string(),
        });
    }

    let guidance = config.huggingface.guidance_scale;
    if guidance <= 0.0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "huggingface.guidance_scale must be positive, got {guidance}"
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
