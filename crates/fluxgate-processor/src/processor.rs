// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The request processor: status transitions around a single inference call.
//!
//! Per request the persisted record moves `processing -> completed` or
//! `processing -> failed`, with no retries, no reprocessing, and no
//! cancellation. Provider failures are the primary error path and are
//! persisted deliberately; the outer fallback exists for unexpected faults
//! (datastore, upload) and never lets an error escape the processor.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use fluxgate_core::{
    FluxgateError, InferenceProvider, ModelOutput, ModelRequest, ModelType, ObjectStore,
    ProcessingResult, RequestStore, RequestUpdate,
};

/// Orchestrates one inference call per request, side-effecting on the
/// request store and (for image output) the object store.
pub struct RequestProcessor {
    provider: Arc<dyn InferenceProvider>,
    requests: Arc<dyn RequestStore>,
    objects: Arc<dyn ObjectStore>,
}

impl RequestProcessor {
    pub fn new(
        provider: Arc<dyn InferenceProvider>,
        requests: Arc<dyn RequestStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            provider,
            requests,
            objects,
        }
    }

    /// Runs the full lifecycle for one request.
    ///
    /// Never returns an error: unexpected faults are converted into an
    /// error-kind [`ProcessingResult`] after one best-effort `failed` write
    /// whose own failure is logged and swallowed.
    pub async fn process(&self, request: &ModelRequest) -> ProcessingResult {
        match self.run(request).await {
            Ok(result) => result,
            Err(err) => {
                warn!(id = %request.id, error = %err, "request processing failed unexpectedly");
                if let Err(write_err) = self
                    .requests
                    .update_request(&request.id, RequestUpdate::failed(err.to_string()))
                    .await
                {
                    warn!(
                        id = %request.id,
                        error = %write_err,
                        "could not mark request as failed"
                    );
                }
                ProcessingResult::from_error(&err)
            }
        }
    }

    async fn run(&self, request: &ModelRequest) -> Result<ProcessingResult, FluxgateError> {
        self.requests
            .update_request(&request.id, RequestUpdate::processing())
            .await?;
        info!(id = %request.id, model_type = %request.model_type, "request processing started");

        let started = Instant::now();
        match request.model_type {
            ModelType::Text2Text => {
                match self.provider.generate_text(&request.input).await {
                    Ok(generation) => {
                        let output = ModelOutput {
                            output: generation.text,
                            processing_time: elapsed_ms(started),
                            token_count: generation.token_count,
                        };
                        self.complete(&request.id, &output).await?;
                        Ok(ProcessingResult::success(output))
                    }
                    Err(err) => self.fail(&request.id, err).await,
                }
            }
            ModelType::Text2Image => {
                match self.provider.generate_image(&request.input).await {
                    Ok(image) => {
                        let processing_time = elapsed_ms(started);
                        // Blob path substitution: the row store never holds
                        // image bytes, only the storage path.
                        let path = format!("{}/{}.png", request.user_id, request.id);
                        self.objects
                            .upload(&path, image.bytes, &image.content_type)
                            .await?;
                        debug!(id = %request.id, path = %path, "image output uploaded");
                        let output = ModelOutput {
                            output: path,
                            processing_time,
                            token_count: None,
                        };
                        self.complete(&request.id, &output).await?;
                        Ok(ProcessingResult::success(output))
                    }
                    Err(err) => self.fail(&request.id, err).await,
                }
            }
        }
    }

    /// Primary error path: persist the provider failure, then return it as a
    /// value. No blob upload is attempted for a failed call.
    async fn fail(
        &self,
        id: &str,
        err: FluxgateError,
    ) -> Result<ProcessingResult, FluxgateError> {
        warn!(id, error = %err, "provider call failed");
        self.requests
            .update_request(id, RequestUpdate::failed(err.to_string()))
            .await?;
        Ok(ProcessingResult::from_error(&err))
    }

    async fn complete(&self, id: &str, output: &ModelOutput) -> Result<(), FluxgateError> {
        let output_data = serde_json::to_value(output).map_err(|e| {
            FluxgateError::Internal(format!("failed to serialize output data: {e}"))
        })?;
        let update = RequestUpdate::completed(
            output_data,
            output.processing_time,
            output.token_count,
            Utc::now().to_rfc3339(),
        );
        self.requests.update_request(id, update).await?;
        info!(id, processing_time_ms = output.processing_time, "request completed");
        Ok(())
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
