// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `fluxgate doctor` command implementation.
//!
//! Runs diagnostic checks against the fluxgate environment to identify
//! missing secrets and unreachable collaborators before serving traffic.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use fluxgate_config::FluxgateConfig;
use fluxgate_core::FluxgateError;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully.
    Pass,
    /// Check passed with a warning.
    Warn,
    /// Check failed.
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// Check status.
    pub status: CheckStatus,
    /// Human-readable message.
    pub message: String,
    /// Duration the check took.
    pub duration: Duration,
}

/// Run the `fluxgate doctor` command.
///
/// With `--plain`, disables colored output.
pub async fn run_doctor(config: &FluxgateConfig, plain: bool) -> Result<(), FluxgateError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        check_secrets(config),
        check_supabase(config).await,
        check_inference_api(config).await,
    ];

    println!();
    println!("  fluxgate doctor");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;

    for result in &results {
        let duration_ms = result.duration.as_millis();
        let line = match result.status {
            CheckStatus::Pass => {
                if use_color {
                    use colored::Colorize;
                    format!(
                        "    {} {:<16} {} ({duration_ms}ms)",
                        "✓".green(),
                        result.name,
                        result.message
                    )
                } else {
                    format!(
                        "    [OK]   {:<16} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
            CheckStatus::Warn => {
                warn_count += 1;
                if use_color {
                    use colored::Colorize;
                    format!(
                        "    {} {:<16} {} ({duration_ms}ms)",
                        "!".yellow(),
                        result.name,
                        result.message.yellow()
                    )
                } else {
                    format!(
                        "    [WARN] {:<16} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
            CheckStatus::Fail => {
                fail_count += 1;
                if use_color {
                    use colored::Colorize;
                    format!(
                        "    {} {:<16} {} ({duration_ms}ms)",
                        "✗".red(),
                        result.name,
                        result.message.red()
                    )
                } else {
                    format!(
                        "    [FAIL] {:<16} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
        };

        println!("{line}");
    }

    println!();

    if fail_count > 0 || warn_count > 0 {
        let issues = fail_count + warn_count;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }

    println!();

    Ok(())
}

/// Check that the secrets required for serving are configured.
fn check_secrets(config: &FluxgateConfig) -> CheckResult {
    let start = Instant::now();
    let mut missing = Vec::new();

    if config.supabase.url.as_deref().unwrap_or("").trim().is_empty() {
        missing.push("supabase.url");
    }
    if config.supabase.effective_key().is_none() {
        missing.push("supabase.anon_key or supabase.service_role_key");
    }
    if config.huggingface.api_token.is_none() {
        missing.push("huggingface.api_token");
    }

    if missing.is_empty() {
        let key_kind = if config.supabase.service_role_key.is_some() {
            "service role key"
        } else {
            "anon key"
        };
        CheckResult {
            name: "Secrets".to_string(),
            status: CheckStatus::Pass,
            message: format!("configured (using {key_kind})"),
            duration: start.elapsed(),
        }
    } else {
        CheckResult {
            name: "Secrets".to_string(),
            status: CheckStatus::Fail,
            message: format!("missing: {}", missing.join(", ")),
            duration: start.elapsed(),
        }
    }
}

/// Check Supabase REST reachability. Any HTTP response counts as reachable;
/// auth problems surface as a warning, not a failure.
async fn check_supabase(config: &FluxgateConfig) -> CheckResult {
    let start = Instant::now();
    let name = "Supabase".to_string();

    let Some(url) = config.supabase.url.as_deref().filter(|u| !u.trim().is_empty()) else {
        return CheckResult {
            name,
            status: CheckStatus::Warn,
            message: "skipped (no supabase.url configured)".to_string(),
            duration: start.elapsed(),
        };
    };

    match probe(&format!("{}/rest/v1/", url.trim_end_matches('/'))).await {
        Ok(status) if status.is_success() || status.as_u16() == 401 || status.as_u16() == 404 => {
            CheckResult {
                name,
                status: CheckStatus::Pass,
                message: format!("reachable ({status})"),
                duration: start.elapsed(),
            }
        }
        Ok(status) => CheckResult {
            name,
            status: CheckStatus::Warn,
            message: format!("unexpected status {status}"),
            duration: start.elapsed(),
        },
        Err(message) => CheckResult {
            name,
            status: CheckStatus::Fail,
            message,
            duration: start.elapsed(),
        },
    }
}

/// Check Inference API reachability.
async fn check_inference_api(config: &FluxgateConfig) -> CheckResult {
    let start = Instant::now();
    let name = "Inference API".to_string();

    match probe(&config.huggingface.base_url).await {
        Ok(status) => CheckResult {
            name,
            status: CheckStatus::Pass,
            message: format!("reachable ({status})"),
            duration: start.elapsed(),
        },
        Err(message) => CheckResult {
            name,
            status: CheckStatus::Fail,
            message,
            duration: start.elapsed(),
        },
    }
}

/// Issue a short-timeout GET and report the status code, or a flat error.
async fn probe(url: &str) -> Result<reqwest::StatusCode, String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .map_err(|e| format!("HTTP client error: {e}"))?;

    match client.get(url).send().await {
        Ok(response) => Ok(response.status()),
        Err(e) if e.is_timeout() => Err("timeout (5s)".to_string()),
        Err(e) => Err(format!("unreachable: {e}")),
    }
}
