//! glycare-core
//!
//! Pure domain types for medication scheduling, adherence and clinical alerts.
//! No storage or runtime dependency; this is the shared vocabulary of the
//! Glycare system.

pub mod context;
pub mod error;
pub mod models;
