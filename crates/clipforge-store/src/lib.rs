//! REST client for the job status store.
//!
//! This crate provides:
//! - The [`JobStore`] persistence contract (create, update-by-id)
//! - An HTTP implementation speaking a PostgREST-style row contract
//!   against a hosted relational table
//! - Request outcome metrics

pub mod client;
pub mod error;
pub mod metrics;

pub use client::{HttpJobStore, JobStore, StoreConfig};
pub use error::{StoreError, StoreResult};

#[cfg(test)]
mod client_tests;
