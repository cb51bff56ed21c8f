//! glycare-engine
//!
//! Coordinates the pure scheduling, adherence and alert crates with the
//! storage layer.
//!
//! Public API:
//! - `Engine::prescribe()`: expand a new medication into dose events and persist them
//! - `Engine::update_medication()`: store an edit, reconciling the schedule if it changed
//! - `Engine::reconcile()`: regenerate the future part of a schedule
//! - `Engine::record_dose()`: mark a dose taken or untaken
//! - `Engine::medication_adherence()` / `Engine::patient_adherence()`
//! - `Engine::alerts()` / `Engine::risk_status()`

pub mod config;
pub mod engine;
pub mod error;
pub mod locks;
pub mod memory;
pub mod reconcile;
pub mod store;

pub use crate::config::EngineConfig;
pub use crate::engine::Engine;
pub use crate::error::EngineError;
pub use crate::memory::MemoryStore;
pub use crate::reconcile::{ReconcileOutcome, ReconcilePolicy};
pub use crate::store::{GlucoseStore, LogStore, MedicationStore, StoreError};
