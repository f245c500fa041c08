// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the fluxgate relay service.
//!
//! Provides the shared domain types, the workspace error enum, and the
//! adapter traits implemented by the concrete inference and persistence
//! backends.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ErrorKind, FluxgateError};
pub use traits::{InferenceProvider, ObjectStore, RequestStore};
pub use types::{
    GeneratedImage, ModelOutput, ModelRequest, ModelType, ProcessingResult, RequestRecord,
    RequestStatus, RequestUpdate, TextGeneration,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_traits_are_object_safe() {
        // The processor and gateway hold adapters as trait objects; this
        // won't compile if any trait loses object safety.
        fn _provider(_: &dyn InferenceProvider) {}
        fn _requests(_: &dyn RequestStore) {}
        fn _objects(_: &dyn ObjectStore) {}
    }

    #[test]
    fn error_and_result_compose() {
        let err = FluxgateError::Internal("unexpected".into());
        let result = ProcessingResult::from_error(&err);
        assert_eq!(
            result,
            ProcessingResult::Error {
                kind: ErrorKind::Internal,
                error: "internal error: unexpected".into(),
            }
        );
    }
}
