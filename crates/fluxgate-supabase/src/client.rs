// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Supabase REST surface.
//!
//! [`SupabaseClient`] implements both persistence seams: [`RequestStore`]
//! over PostgREST (`/rest/v1/model_requests`) and [`ObjectStore`] over
//! Supabase Storage (`/storage/v1/object/{bucket}/..`). Requests
//! authenticate with the service role key when configured, falling back to
//! the anon key.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::debug;

use fluxgate_config::model::SupabaseConfig;
use fluxgate_core::{FluxgateError, ObjectStore, RequestRecord, RequestStore, RequestUpdate};

/// Client for the Supabase PostgREST and Storage endpoints.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
}

impl SupabaseClient {
    /// Creates a new Supabase client.
    ///
    /// Fails with a `Config` error when the project URL or both API keys are
    /// missing, or when a key cannot be used as a header value.
    pub fn new(config: &SupabaseConfig) -> Result<Self, FluxgateError> {
        let url = config
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| FluxgateError::Config("supabase.url is required".to_string()))?;
        let key = config.effective_key().ok_or_else(|| {
            FluxgateError::Config(
                "supabase.anon_key or supabase.service_role_key is required".to_string(),
            )
        })?;

        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(key)
            .map_err(|e| FluxgateError::Config(format!("invalid API key header value: {e}")))?;
        api_key.set_sensitive(true);
        headers.insert("apikey", api_key);
        let mut auth = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| FluxgateError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert("prefer", HeaderValue::from_static("return=minimal"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FluxgateError::Datastore {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            bucket: config.storage_bucket.clone(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/model_requests", self.base_url)
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }
}

#[async_trait]
impl RequestStore for SupabaseClient {
    async fn update_request(
        &self,
        id: &str,
        update: RequestUpdate,
    ) -> Result<(), FluxgateError> {
        let response = self
            .client
            .patch(self.table_url())
            .query(&[("id", format!("eq.{id}"))])
            .json(&update)
            .send()
            .await
            .map_err(|e| FluxgateError::Datastore {
                message: format!("update for `{id}` failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, id, written = %update.status, "request record updated");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FluxgateError::Datastore {
                message: format!("update for `{id}` returned {status}: {body}"),
                source: None,
            });
        }
        Ok(())
    }

    async fn list_requests(&self, user_id: &str) -> Result<Vec<RequestRecord>, FluxgateError> {
        let response = self
            .client
            .get(self.table_url())
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await
            .map_err(|e| FluxgateError::Datastore {
                message: format!("list for `{user_id}` failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FluxgateError::Datastore {
                message: format!("list for `{user_id}` returned {status}: {body}"),
                source: None,
            });
        }

        response
            .json::<Vec<RequestRecord>>()
            .await
            .map_err(|e| FluxgateError::Datastore {
                message: format!("failed to parse request records: {e}"),
                source: Some(Box::new(e)),
            })
    }
}

#[async_trait]
impl ObjectStore for SupabaseClient {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), FluxgateError> {
        let size = bytes.len();
        let response = self
            .client
            .post(self.object_url(path))
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| FluxgateError::ObjectStore {
                message: format!("upload to `{path}` failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, path, size, "object uploaded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FluxgateError::ObjectStore {
                message: format!("upload to `{path}` returned {status}: {body}"),
                source: None,
            });
        }
        Ok(())
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, FluxgateError> {
        let response = self
            .client
            .get(self.object_url(path))
            .send()
            .await
            .map_err(|e| FluxgateError::ObjectStore {
                message: format!("download of `{path}` failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FluxgateError::ObjectStore {
                message: format!("object `{path}` not found"),
                source: None,
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FluxgateError::ObjectStore {
                message: format!("download of `{path}` returned {status}: {body}"),
                source: None,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FluxgateError::ObjectStore {
                message: format!("failed to read object body: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> SupabaseConfig {
        SupabaseConfig {
            url: Some(base_url.to_string()),
            anon_key: Some("anon-key".to_string()),
            ..SupabaseConfig::default()
        }
    }

    #[test]
    fn new_requires_url_and_key() {
        let err = SupabaseClient::new(&SupabaseConfig::default()).unwrap_err();
        assert!(matches!(err, FluxgateError::Config(_)));

        let config = SupabaseConfig {
            url: Some("https://xyz.supabase.co".to_string()),
            ..SupabaseConfig::default()
        };
        let err = SupabaseClient::new(&config).unwrap_err();
        assert!(err.to_string().contains("anon_key"), "got: {err}");
    }

    #[tokio::test]
    async fn update_request_patches_row_by_id() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/rest/v1/model_requests"))
            .and(query_param("id", "eq.r1"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer anon-key"))
            .and(header("prefer", "return=minimal"))
            .and(body_json(serde_json::json!({
                "status": "failed",
                "error_msg": "boom"
            })))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&test_config(&server.uri())).unwrap();
        client
            .update_request("r1", RequestUpdate::failed("boom"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_request_surfaces_postgrest_failure() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"message": "JWT expired"})),
            )
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&test_config(&server.uri())).unwrap();
        let err = client
            .update_request("r1", RequestUpdate::processing())
            .await
            .unwrap_err();
        assert!(matches!(err, FluxgateError::Datastore { .. }));
        assert!(err.to_string().contains("401"), "got: {err}");
    }

    #[tokio::test]
    async fn service_role_key_is_preferred_for_auth() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(header("apikey", "service-key"))
            .and(header("authorization", "Bearer service-key"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let config = SupabaseConfig {
            url: Some(server.uri()),
            anon_key: Some("anon-key".to_string()),
            service_role_key: Some("service-key".to_string()),
            ..SupabaseConfig::default()
        };
        let client = SupabaseClient::new(&config).unwrap();
        let result = client
            .update_request("r1", RequestUpdate::processing())
            .await;
        assert!(result.is_ok(), "service key should be used: {result:?}");
    }

    #[tokio::test]
    async fn list_requests_filters_by_user() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/model_requests"))
            .and(query_param("user_id", "eq.u1"))
            .and(query_param("select", "*"))
            .and(query_param("order", "created_at.desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": "r2",
                    "user_id": "u1",
                    "status": "completed",
                    "model_type": "text2text",
                    "output_data": {"output": "Hi there"},
                    "created_at": "2026-08-07T12:00:00Z"
                },
                {"id": "r1", "user_id": "u1", "status": "failed", "error_msg": "boom"}
            ])))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&test_config(&server.uri())).unwrap();
        let records = client.list_requests("u1").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "r2");
        assert_eq!(records[0].status, fluxgate_core::RequestStatus::Completed);
        assert_eq!(records[1].error_msg.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn upload_posts_bytes_with_content_type() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/storage/v1/object/generated-images/u1/r1.png"))
            .and(header("content-type", "image/png"))
            .and(body_string("PNGDATA"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&test_config(&server.uri())).unwrap();
        client
            .upload("u1/r1.png", b"PNGDATA".to_vec(), "image/png")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn upload_surfaces_storage_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(serde_json::json!({"message": "new row violates policy"})),
            )
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&test_config(&server.uri())).unwrap();
        let err = client
            .upload("u1/r1.png", b"PNGDATA".to_vec(), "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, FluxgateError::ObjectStore { .. }));
        assert!(err.to_string().contains("403"), "got: {err}");
    }

    #[tokio::test]
    async fn download_returns_object_bytes() {
        let server = MockServer::start().await;
        let png = vec![0x89, 0x50, 0x4e, 0x47];

        Mock::given(method("GET"))
            .and(path("/storage/v1/object/generated-images/u1/r1.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(png.clone()))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&test_config(&server.uri())).unwrap();
        let bytes = client.download("u1/r1.png").await.unwrap();
        assert_eq!(bytes, png);
    }

    #[tokio::test]
    async fn download_maps_missing_object_to_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&test_config(&server.uri())).unwrap();
        let err = client.download("u1/missing.png").await.unwrap_err();
        assert!(err.to_string().contains("not found"), "got: {err}");
    }
}
