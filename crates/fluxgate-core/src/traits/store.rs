// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence traits for the request row store and blob storage.

use async_trait::async_trait;

use crate::error::FluxgateError;
use crate::types::{RequestRecord, RequestUpdate};

/// Adapter for the row store holding `model_requests` records.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Applies a partial update to the record keyed by `id`.
    ///
    /// Concurrent updates to the same row are unguarded; last write wins.
    async fn update_request(&self, id: &str, update: RequestUpdate)
        -> Result<(), FluxgateError>;

    /// Lists all records belonging to `user_id`, newest first.
    async fn list_requests(&self, user_id: &str) -> Result<Vec<RequestRecord>, FluxgateError>;
}

/// Adapter for a path-addressed object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads `bytes` at `path` with the given content type.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), FluxgateError>;

    /// Downloads the object at `path`.
    async fn download(&self, path: &str) -> Result<Vec<u8>, FluxgateError>;
}
