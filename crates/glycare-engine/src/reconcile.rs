use std::collections::HashSet;

use glycare_core::models::medication::Medication;
use glycare_schedule::{FrequencyPolicy, generate_within, schedule_window};
use jiff::civil::{Date, Time};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::store::LogStore;

/// What happens to doses already marked taken on or after the effective date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePolicy {
    /// Delete every event from the effective date on, taken or not.
    #[default]
    DeleteAll,
    /// Keep taken events; only untaken ones are deleted and regenerated.
    PreserveTaken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    pub deleted: usize,
    pub inserted: usize,
    /// Taken events kept in place under [`ReconcilePolicy::PreserveTaken`].
    pub retained: usize,
}

/// Regenerate a medication's schedule from `effective_from` onward.
///
/// The replacement events are computed before anything is deleted, so an
/// unschedulable medication leaves the log untouched. The caller must hold
/// the medication's lock.
pub(crate) async fn reconcile_schedule(
    logs: &dyn LogStore,
    medication: &Medication,
    effective_from: Date,
    frequency_policy: FrequencyPolicy,
    policy: ReconcilePolicy,
) -> Result<ReconcileOutcome, EngineError> {
    let (_, end) = schedule_window(medication)?;
    let mut events = generate_within(medication, effective_from, end, frequency_policy)?;
    let from = effective_from.to_datetime(Time::midnight());

    let (deleted, retained) = match policy {
        ReconcilePolicy::DeleteAll => (logs.delete_from(medication.id, from).await?, 0),
        ReconcilePolicy::PreserveTaken => {
            let deleted = logs.delete_untaken_from(medication.id, from).await?;
            let kept: HashSet<_> = logs
                .list_by_medication(medication.id)
                .await?
                .into_iter()
                .filter(|event| event.timestamp >= from)
                .map(|event| event.timestamp)
                .collect();
            events.retain(|event| !kept.contains(&event.timestamp));
            (deleted, kept.len())
        }
    };

    let inserted = events.len();
    if inserted > 0 {
        logs.insert_batch(events)
            .await
            .map_err(|source| EngineError::PartialReconcile {
                medication_id: medication.id,
                deleted,
                source,
            })?;
    }

    tracing::info!(
        medication_id = %medication.id,
        effective_from = %effective_from,
        ?policy,
        deleted,
        inserted,
        retained,
        "medication schedule reconciled"
    );

    Ok(ReconcileOutcome {
        deleted,
        inserted,
        retained,
    })
}
