//! Storage collaborators.
//!
//! The engine assumes a medications table and a per-dose log table keyed by
//! `(medication_id, timestamp)`. Implementations own transactions and
//! retries; the engine never retries and passes every error through.

use std::future::Future;
use std::pin::Pin;

use glycare_core::models::dose::DoseEvent;
use glycare_core::models::glucose::GlucoseMeasurement;
use glycare_core::models::medication::Medication;
use jiff::civil::DateTime;
use thiserror::Error;
use uuid::Uuid;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {kind}/{id}")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("dose already scheduled for medication {medication_id} at {timestamp}")]
    DuplicateDose {
        medication_id: Uuid,
        timestamp: DateTime,
    },

    #[error("storage backend error: {0}")]
    Backend(String),
}

pub trait MedicationStore: Send + Sync {
    fn get(&self, id: Uuid) -> BoxFuture<'_, Result<Option<Medication>, StoreError>>;

    fn list_active(&self, patient_id: Uuid) -> BoxFuture<'_, Result<Vec<Medication>, StoreError>>;

    fn update(&self, medication: Medication) -> BoxFuture<'_, Result<(), StoreError>>;
}

pub trait LogStore: Send + Sync {
    /// All dose events of a medication, ascending by timestamp.
    fn list_by_medication(
        &self,
        medication_id: Uuid,
    ) -> BoxFuture<'_, Result<Vec<DoseEvent>, StoreError>>;

    /// Dose events with `timestamp <= as_of`, ascending by timestamp.
    fn list_due_by(
        &self,
        medication_id: Uuid,
        as_of: DateTime,
    ) -> BoxFuture<'_, Result<Vec<DoseEvent>, StoreError>>;

    /// Delete every event with `timestamp >= from`. Returns the number deleted.
    fn delete_from(
        &self,
        medication_id: Uuid,
        from: DateTime,
    ) -> BoxFuture<'_, Result<usize, StoreError>>;

    /// Delete untaken events with `timestamp >= from`. Returns the number deleted.
    fn delete_untaken_from(
        &self,
        medication_id: Uuid,
        from: DateTime,
    ) -> BoxFuture<'_, Result<usize, StoreError>>;

    /// Insert a batch atomically: either all events land or none do.
    fn insert_batch(&self, events: Vec<DoseEvent>) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Set the taken flag of one of the medication's events. An event that
    /// belongs to another medication is `NotFound`.
    fn mark_taken(
        &self,
        medication_id: Uuid,
        event_id: Uuid,
        taken: bool,
    ) -> BoxFuture<'_, Result<DoseEvent, StoreError>>;
}

pub trait GlucoseStore: Send + Sync {
    fn latest(
        &self,
        patient_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<GlucoseMeasurement>, StoreError>>;
}
