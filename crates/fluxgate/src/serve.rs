// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `fluxgate serve` command implementation.
//!
//! Wires the Supabase adapters, the HuggingFace provider, and the request
//! processor into the gateway server, then serves until shutdown.

use std::sync::Arc;

use tracing::{error, info};

use fluxgate_config::FluxgateConfig;
use fluxgate_core::{FluxgateError, ObjectStore, RequestStore};
use fluxgate_gateway::{GatewayState, ServerConfig};
use fluxgate_huggingface::HfClient;
use fluxgate_processor::RequestProcessor;
use fluxgate_supabase::SupabaseClient;

/// Runs the `fluxgate serve` command.
///
/// Adapter construction is where required secrets are enforced; each failure
/// prints an actionable hint naming the config key and env var to set.
pub async fn run_serve(config: FluxgateConfig) -> Result<(), FluxgateError> {
    init_tracing(&config.service.log_level);

    info!("starting fluxgate serve");

    let supabase = Arc::new(SupabaseClient::new(&config.supabase).map_err(|e| {
        error!(error = %e, "failed to initialize Supabase adapters");
        eprintln!(
            "error: Supabase settings required. Set supabase.url and an API key via \
             fluxgate.toml, or FLUXGATE_SUPABASE_URL / FLUXGATE_SUPABASE_ANON_KEY env vars."
        );
        e
    })?);
    info!(
        bucket = config.supabase.storage_bucket.as_str(),
        "supabase adapters initialized"
    );

    let provider = Arc::new(HfClient::new(&config.huggingface).map_err(|e| {
        error!(error = %e, "failed to initialize inference provider");
        eprintln!(
            "error: HuggingFace API token required. Set huggingface.api_token via \
             fluxgate.toml or the FLUXGATE_HUGGINGFACE_API_TOKEN env var."
        );
        e
    })?);
    info!(
        text_model = config.huggingface.text_model.as_str(),
        image_model = config.huggingface.image_model.as_str(),
        "inference provider initialized"
    );

    let processor = Arc::new(RequestProcessor::new(
        provider,
        supabase.clone() as Arc<dyn RequestStore>,
        supabase.clone() as Arc<dyn ObjectStore>,
    ));

    let state = GatewayState::new(
        processor,
        supabase.clone() as Arc<dyn RequestStore>,
        supabase as Arc<dyn ObjectStore>,
    );

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    fluxgate_gateway::start_server(&server_config, state).await?;

    info!("fluxgate serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "fluxgate={log_level},fluxgate_gateway={log_level},fluxgate_processor={log_level},\
             fluxgate_supabase={log_level},fluxgate_huggingface={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
