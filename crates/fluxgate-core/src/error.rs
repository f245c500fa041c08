// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the fluxgate relay service.

use serde::Serialize;
use strum::Display;
use thiserror::Error;

/// The primary error type used across all fluxgate crates.
#[derive(Debug, Error)]
pub enum FluxgateError {
    /// Configuration errors (missing required keys, invalid header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Row-store errors (PostgREST update/select failure).
    #[error("datastore error: {message}")]
    Datastore {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Object-storage errors (blob upload/download failure).
    #[error("object storage error: {message}")]
    ObjectStore {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Inference provider errors (API failure, unexpected response shape).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Gateway errors (bind failure, server fault).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Stable failure classification surfaced in error-kind processing results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Config,
    Datastore,
    ObjectStore,
    Provider,
    Gateway,
    Internal,
}

impl FluxgateError {
    /// Classifies this error for wire serialization.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FluxgateError::Config(_) => ErrorKind::Config,
            FluxgateError::Datastore { .. } => ErrorKind::Datastore,
            FluxgateError::ObjectStore { .. } => ErrorKind::ObjectStore,
            FluxgateError::Provider { .. } => ErrorKind::Provider,
            FluxgateError::Gateway { .. } => ErrorKind::Gateway,
            FluxgateError::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_maps_to_its_kind() {
        let cases = [
            (FluxgateError::Config("c".into()), ErrorKind::Config),
            (
                FluxgateError::Datastore {
                    message: "d".into(),
                    source: None,
                },
                ErrorKind::Datastore,
            ),
            (
                FluxgateError::ObjectStore {
                    message: "o".into(),
                    source: None,
                },
                ErrorKind::ObjectStore,
            ),
            (
                FluxgateError::Provider {
                    message: "p".into(),
                    source: None,
                },
                ErrorKind::Provider,
            ),
            (
                FluxgateError::Gateway {
                    message: "g".into(),
                    source: None,
                },
                ErrorKind::Gateway,
            ),
            (FluxgateError::Internal("i".into()), ErrorKind::Internal),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind);
        }
    }

    #[test]
    fn error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::ObjectStore).unwrap();
        assert_eq!(json, "\"object_store\"");
        assert_eq!(ErrorKind::Provider.to_string(), "provider");
    }

    #[test]
    fn display_includes_message() {
        let err = FluxgateError::Provider {
            message: "API returned 503".into(),
            source: None,
        };
        assert_eq!(err.to_string(), "provider error: API returned 503");
    }

    #[test]
    fn source_chain_is_preserved() {
        use std::error::Error as _;
        let err = FluxgateError::Datastore {
            message: "update failed".into(),
            source: Some(Box::new(std::io::Error::other("connection reset"))),
        };
        let source = err.source().expect("source should be set");
        assert!(source.to_string().contains("connection reset"));
    }
}
