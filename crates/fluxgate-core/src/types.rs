// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the fluxgate workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{ErrorKind, FluxgateError};

/// The kind of model a request targets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// Text prompt in, generated text out.
    Text2Text,
    /// Text prompt in, PNG image out.
    Text2Image,
}

/// A model-inference request as received on the wire.
///
/// Immutable once received. `id` keys the persisted record whose status the
/// processor transitions; `user_id` scopes the blob path for image output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRequest {
    pub id: String,
    pub input: String,
    pub model_type: ModelType,
    pub user_id: String,
}

/// Output payload for a finished request.
///
/// `output` carries generated text for text requests and the blob path for
/// image requests; raw image bytes never appear here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelOutput {
    pub output: String,
    /// Provider call duration in milliseconds.
    pub processing_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u64>,
}

/// Text produced by the inference provider.
#[derive(Debug, Clone, PartialEq)]
pub struct TextGeneration {
    pub text: String,
    pub token_count: Option<u64>,
}

/// Binary image produced by the inference provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Lifecycle status of a persisted request record.
///
/// `pending` is written by whoever creates the record. The processor writes
/// at most one `processing` and exactly one terminal status per invocation;
/// terminal states are final.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl RequestStatus {
    /// Whether no further transition may occur.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Failed)
    }
}

/// Partial update applied to a request record.
///
/// Absent fields are omitted from the serialized body so the row keeps its
/// previous values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestUpdate {
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl RequestUpdate {
    /// The single non-terminal write: mark a record as in flight.
    pub fn processing() -> Self {
        Self {
            status: RequestStatus::Processing,
            output_data: None,
            error_msg: None,
            processing_time: None,
            token_count: None,
            completed_at: None,
        }
    }

    /// Terminal success write carrying the output payload.
    pub fn completed(
        output_data: serde_json::Value,
        processing_time: u64,
        token_count: Option<u64>,
        completed_at: String,
    ) -> Self {
        Self {
            status: RequestStatus::Completed,
            output_data: Some(output_data),
            error_msg: None,
            processing_time: Some(processing_time),
            token_count,
            completed_at: Some(completed_at),
        }
    }

    /// Terminal failure write carrying the error message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: RequestStatus::Failed,
            output_data: None,
            error_msg: Some(message.into()),
            processing_time: None,
            token_count: None,
            completed_at: None,
        }
    }
}

/// A persisted request row as returned by the list operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub id: String,
    pub user_id: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub model_type: Option<ModelType>,
    #[serde(default)]
    pub input_data: Option<serde_json::Value>,
    #[serde(default)]
    pub output_data: Option<serde_json::Value>,
    #[serde(default)]
    pub error_msg: Option<String>,
    #[serde(default)]
    pub processing_time: Option<u64>,
    #[serde(default)]
    pub token_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

/// Outcome of one processor invocation, as serialized to the caller.
///
/// Serializes as `{"status":"success","data":{..}}` or
/// `{"status":"error","kind":"..","error":".."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProcessingResult {
    Success { data: ModelOutput },
    Error { kind: ErrorKind, error: String },
}

impl ProcessingResult {
    /// Wraps a finished output.
    pub fn success(data: ModelOutput) -> Self {
        ProcessingResult::Success { data }
    }

    /// Classifies and messages an error.
    pub fn from_error(err: &FluxgateError) -> Self {
        ProcessingResult::Error {
            kind: err.kind(),
            error: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProcessingResult::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn model_request_uses_camel_case_wire_names() {
        let json = r#"{"id":"r1","input":"Hello","modelType":"text2text","userId":"u1"}"#;
        let req: ModelRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id, "r1");
        assert_eq!(req.model_type, ModelType::Text2Text);
        assert_eq!(req.user_id, "u1");

        let back = serde_json::to_value(&req).unwrap();
        assert_eq!(back["modelType"], "text2text");
        assert_eq!(back["userId"], "u1");
    }

    #[test]
    fn model_type_round_trips_through_strum() {
        for (variant, text) in [
            (ModelType::Text2Text, "text2text"),
            (ModelType::Text2Image, "text2image"),
        ] {
            assert_eq!(variant.to_string(), text);
            assert_eq!(ModelType::from_str(text).unwrap(), variant);
        }
        assert!(ModelType::from_str("text2video").is_err());
    }

    #[test]
    fn request_status_terminality() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(!RequestStatus::Processing.is_terminal());
        assert!(RequestStatus::Completed.is_terminal());
        assert!(RequestStatus::Failed.is_terminal());
    }

    #[test]
    fn processing_update_serializes_status_only() {
        let json = serde_json::to_value(RequestUpdate::processing()).unwrap();
        assert_eq!(json, serde_json::json!({"status": "processing"}));
    }

    #[test]
    fn failed_update_omits_output_fields() {
        let json = serde_json::to_value(RequestUpdate::failed("boom")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "failed", "error_msg": "boom"})
        );
    }

    #[test]
    fn completed_update_carries_payload() {
        let update = RequestUpdate::completed(
            serde_json::json!({"output": "Hi there"}),
            42,
            Some(17),
            "2026-08-07T00:00:00Z".to_string(),
        );
        let json = serde_json::to_value(update).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["output_data"]["output"], "Hi there");
        assert_eq!(json["processing_time"], 42);
        assert_eq!(json["token_count"], 17);
        assert_eq!(json["completed_at"], "2026-08-07T00:00:00Z");
    }

    #[test]
    fn processing_result_tagged_layout() {
        let success = ProcessingResult::success(ModelOutput {
            output: "Hi there".into(),
            processing_time: 5,
            token_count: None,
        });
        let json = serde_json::to_value(&success).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["output"], "Hi there");
        assert_eq!(json["data"]["processingTime"], 5);
        assert!(json["data"].get("tokenCount").is_none());

        let err = FluxgateError::Provider {
            message: "text generation failed".into(),
            source: None,
        };
        let error = ProcessingResult::from_error(&err);
        assert!(!error.is_success());
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["kind"], "provider");
        assert_eq!(json["error"], "provider error: text generation failed");
    }

    #[test]
    fn request_record_tolerates_sparse_rows() {
        let json = r#"{"id":"r1","user_id":"u1","status":"pending"}"#;
        let record: RequestRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, RequestStatus::Pending);
        assert!(record.model_type.is_none());
        assert!(record.output_data.is_none());
        assert!(record.created_at.is_none());
    }
}
