// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits at the system seams.
//!
//! Concrete backends (HuggingFace, Supabase) implement these; the processor
//! and gateway depend only on the traits.

pub mod provider;
pub mod store;

pub use provider::InferenceProvider;
pub use store::{ObjectStore, RequestStore};
