// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock persistence adapters for deterministic testing.
//!
//! `MockRequestStore` records every update it receives and can inject
//! failures at chosen call indices; `MockObjectStore` records uploads and
//! serves seeded objects. Both are intended to be shared via `Arc` between
//! the unit under test and the assertions.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use fluxgate_core::{
    FluxgateError, ObjectStore, RequestRecord, RequestStore, RequestUpdate,
};

/// A request store that records updates in memory.
pub struct MockRequestStore {
    updates: Mutex<Vec<(String, RequestUpdate)>>,
    records: Vec<RequestRecord>,
    fail_update_on: HashSet<usize>,
    fail_list: AtomicBool,
    update_calls: AtomicUsize,
}

impl MockRequestStore {
    /// Create an empty store that accepts every write.
    pub fn new() -> Self {
        Self {
            updates: Mutex::new(Vec::new()),
            records: Vec::new(),
            fail_update_on: HashSet::new(),
            fail_list: AtomicBool::new(false),
            update_calls: AtomicUsize::new(0),
        }
    }

    /// Seed the records served by `list_requests`.
    pub fn with_records(records: Vec<RequestRecord>) -> Self {
        Self {
            records,
            ..Self::new()
        }
    }

    /// Inject a failure for the update call at `index` (zero-based).
    pub fn failing_update_at(mut self, index: usize) -> Self {
        self.fail_update_on.insert(index);
        self
    }

    /// Make `list_requests` fail.
    pub fn failing_list(self) -> Self {
        self.fail_list.store(true, Ordering::SeqCst);
        self
    }

    /// Every `(id, update)` pair received so far, in call order.
    pub async fn updates(&self) -> Vec<(String, RequestUpdate)> {
        self.updates.lock().await.clone()
    }

    /// Number of update calls received (including injected failures).
    pub fn update_call_count(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockRequestStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestStore for MockRequestStore {
    async fn update_request(
        &self,
        id: &str,
        update: RequestUpdate,
    ) -> Result<(), FluxgateError> {
        let call = self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_update_on.contains(&call) {
            return Err(FluxgateError::Datastore {
                message: format!("injected datastore failure on call {call}"),
                source: None,
            });
        }
        self.updates.lock().await.push((id.to_string(), update));
        Ok(())
    }

    async fn list_requests(&self, user_id: &str) -> Result<Vec<RequestRecord>, FluxgateError> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(FluxgateError::Datastore {
                message: "injected datastore failure".to_string(),
                source: None,
            });
        }
        Ok(self
            .records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// An object store that records uploads and serves seeded objects.
pub struct MockObjectStore {
    uploads: Mutex<Vec<(String, Vec<u8>, String)>>,
    objects: Mutex<HashMap<String, Vec<u8>>>,
    fail_uploads: AtomicBool,
}

impl MockObjectStore {
    /// Create an empty store that accepts every upload.
    pub fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            objects: Mutex::new(HashMap::new()),
            fail_uploads: AtomicBool::new(false),
        }
    }

    /// Seed an object served by `download`.
    pub fn with_object(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mut objects = HashMap::new();
        objects.insert(path.into(), bytes);
        Self {
            objects: Mutex::new(objects),
            ..Self::new()
        }
    }

    /// Make every upload fail.
    pub fn failing_uploads(self) -> Self {
        self.fail_uploads.store(true, Ordering::SeqCst);
        self
    }

    /// Every `(path, bytes, content_type)` triple received so far.
    pub async fn uploads(&self) -> Vec<(String, Vec<u8>, String)> {
        self.uploads.lock().await.clone()
    }
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), FluxgateError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(FluxgateError::ObjectStore {
                message: "injected object storage failure".to_string(),
                source: None,
            });
        }
        self.objects
            .lock()
            .await
            .insert(path.to_string(), bytes.clone());
        self.uploads
            .lock()
            .await
            .push((path.to_string(), bytes, content_type.to_string()));
        Ok(())
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, FluxgateError> {
        self.objects
            .lock()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| FluxgateError::ObjectStore {
                message: format!("object `{path}` not found"),
                source: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxgate_core::RequestStatus;

    #[tokio::test]
    async fn update_calls_are_recorded_in_order() {
        let store = MockRequestStore::new();
        store
            .update_request("r1", RequestUpdate::processing())
            .await
            .unwrap();
        store
            .update_request("r1", RequestUpdate::failed("boom"))
            .await
            .unwrap();

        let updates = store.updates().await;
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].1.status, RequestStatus::Processing);
        assert_eq!(updates[1].1.status, RequestStatus::Failed);
    }

    #[tokio::test]
    async fn injected_update_failure_fires_at_index() {
        let store = MockRequestStore::new().failing_update_at(1);
        store
            .update_request("r1", RequestUpdate::processing())
            .await
            .unwrap();
        let err = store
            .update_request("r1", RequestUpdate::failed("boom"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("injected"));
        assert_eq!(store.update_call_count(), 2);
        // The failed call is not recorded.
        assert_eq!(store.updates().await.len(), 1);
    }

    #[tokio::test]
    async fn seeded_objects_round_trip() {
        let store = MockObjectStore::with_object("u1/r1.png", vec![1, 2, 3]);
        assert_eq!(store.download("u1/r1.png").await.unwrap(), vec![1, 2, 3]);
        assert!(store.download("u1/missing.png").await.is_err());
    }

    #[tokio::test]
    async fn uploads_become_downloadable() {
        let store = MockObjectStore::new();
        store
            .upload("u1/r2.png", vec![9, 9], "image/png")
            .await
            .unwrap();
        assert_eq!(store.download("u1/r2.png").await.unwrap(), vec![9, 9]);
        let uploads = store.uploads().await;
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, "u1/r2.png");
        assert_eq!(uploads[0].2, "image/png");
    }
}
