// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./fluxgate.toml` > `~/.config/fluxgate/fluxgate.toml`
//! > `/etc/fluxgate/fluxgate.toml`, with environment variable overrides via the
//! `FLUXGATE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::FluxgateConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/fluxgate/fluxgate.toml` (system-wide)
/// 3. `~/.config/fluxgate/fluxgate.toml` (user XDG config)
/// 4. `./fluxgate.toml` (local directory)
/// 5. `FLUXGATE_*` environment variables
pub fn load_config() -> Result<FluxgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FluxgateConfig::default()))
        .merge(Toml::file("/etc/fluxgate/fluxgate.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("fluxgate/fluxgate.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("fluxgate.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<FluxgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FluxgateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FluxgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FluxgateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `FLUXGATE_SUPABASE_SERVICE_ROLE_KEY` must
/// map to `supabase.service_role_key`, not `supabase.service.role.key`.
fn env_provider() -> Env {
    Env::prefixed("FLUXGATE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: FLUXGATE_SUPABASE_URL -> "supabase_url"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("supabase_", "supabase.", 1)
            .replacen("huggingface_", "huggingface.", 1)
            .replacen("service_", "service.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_override_reaches_nested_keys() {
        // Env overrides arrive as dotted keys after env_provider's mapping;
        // simulate the merge with dot-notation tuples to keep the test
        // hermetic with respect to the process environment.
        let config: FluxgateConfig = Figment::new()
            .merge(Serialized::defaults(FluxgateConfig::default()))
            .merge(("supabase.service_role_key", "srk-123"))
            .merge(("huggingface.api_token", "hf-456"))
            .merge(("server.port", 9090))
            .extract()
            .expect("should merge dotted overrides");

        assert_eq!(config.supabase.service_role_key.as_deref(), Some("srk-123"));
        assert_eq!(config.huggingface.api_token.as_deref(), Some("hf-456"));
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[server]
port = 3000

[huggingface]
text_model = "my-org/my-model"
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.huggingface.text_model, "my-org/my-model");
        // Untouched sections keep their defaults.
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.huggingface.max_new_tokens, 512);
    }
}
