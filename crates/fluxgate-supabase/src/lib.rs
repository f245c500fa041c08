// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Supabase persistence adapters for the fluxgate relay.
//!
//! One client, two seams: [`fluxgate_core::RequestStore`] backed by
//! PostgREST partial updates on the `model_requests` table, and
//! [`fluxgate_core::ObjectStore`] backed by the path-addressed Storage
//! bucket holding generated images.

pub mod client;

pub use client::SupabaseClient;
