use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("medication not found: {0}")]
    MedicationNotFound(Uuid),

    #[error("actor {actor_id} may not {action} for patient {patient_id}")]
    AccessDenied {
        actor_id: Uuid,
        patient_id: Uuid,
        action: &'static str,
    },

    #[error("medication {medication_id} belongs to patient {from} and cannot be moved to {to}")]
    PatientChanged {
        medication_id: Uuid,
        from: Uuid,
        to: Uuid,
    },

    #[error("schedule error: {0}")]
    Schedule(#[from] glycare_schedule::ScheduleError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(
        "reconciliation of medication {medication_id} deleted {deleted} events but failed to insert replacements: {source}"
    )]
    PartialReconcile {
        medication_id: Uuid,
        deleted: usize,
        #[source]
        source: StoreError,
    },
}
