use std::sync::Arc;

use futures::future::try_join_all;
use glycare_alerts::{AlertSnapshot, UpcomingDose, classify_latest, evaluate};
use glycare_core::context::RequestContext;
use glycare_core::models::adherence::{MedicationAdherence, PatientAdherence};
use glycare_core::models::alert::{Alert, RiskStatus};
use glycare_core::models::dose::DoseEvent;
use glycare_core::models::medication::Medication;
use jiff::ToSpan;
use jiff::civil::{Date, DateTime};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::locks::MedicationLocks;
use crate::reconcile::{ReconcileOutcome, ReconcilePolicy, reconcile_schedule};
use crate::store::{GlucoseStore, LogStore, MedicationStore};

/// Entry point for every schedule, adherence and alert operation.
///
/// Holds no patient data between calls; everything is read fresh from the
/// stores. Safe to share across tasks.
pub struct Engine {
    medications: Arc<dyn MedicationStore>,
    logs: Arc<dyn LogStore>,
    glucose: Arc<dyn GlucoseStore>,
    config: EngineConfig,
    locks: MedicationLocks,
}

impl Engine {
    pub fn new(
        medications: Arc<dyn MedicationStore>,
        logs: Arc<dyn LogStore>,
        glucose: Arc<dyn GlucoseStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            medications,
            logs,
            glucose,
            config,
            locks: MedicationLocks::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Expand a newly prescribed medication and persist its dose events.
    pub async fn prescribe(
        &self,
        ctx: &RequestContext,
        medication: &Medication,
    ) -> Result<Vec<DoseEvent>, EngineError> {
        require_clinician(ctx, medication.patient_id, "prescribe")?;

        let events = glycare_schedule::generate(medication, self.config.frequency_policy)?;

        let _guard = self.locks.acquire(medication.id).await;
        if !events.is_empty() {
            self.logs.insert_batch(events.clone()).await?;
        }

        tracing::info!(
            medication_id = %medication.id,
            patient_id = %medication.patient_id,
            frequency = %medication.frequency,
            events = events.len(),
            "medication prescribed"
        );
        Ok(events)
    }

    /// Store an edited medication. If its dates or frequency changed, the
    /// schedule is reconciled from `effective_from` using the configured
    /// policy.
    pub async fn update_medication(
        &self,
        ctx: &RequestContext,
        updated: Medication,
        effective_from: Date,
    ) -> Result<Option<ReconcileOutcome>, EngineError> {
        require_clinician(ctx, updated.patient_id, "edit medications")?;

        let _guard = self.locks.acquire(updated.id).await;
        let existing = self.load_medication(updated.id).await?;
        require_clinician(ctx, existing.patient_id, "edit medications")?;
        if updated.patient_id != existing.patient_id {
            return Err(EngineError::PatientChanged {
                medication_id: existing.id,
                from: existing.patient_id,
                to: updated.patient_id,
            });
        }

        let changed = existing.schedule_changed(&updated);
        if changed {
            // Reject an unschedulable edit before it is stored.
            glycare_schedule::schedule_window(&updated)?;
            glycare_schedule::cadence(&updated.frequency, self.config.frequency_policy)?;
        }
        self.medications.update(updated.clone()).await?;

        if !changed {
            tracing::debug!(medication_id = %updated.id, "schedule unchanged, no reconciliation");
            return Ok(None);
        }

        let outcome = reconcile_schedule(
            self.logs.as_ref(),
            &updated,
            effective_from,
            self.config.frequency_policy,
            self.config.reconcile_policy,
        )
        .await?;
        Ok(Some(outcome))
    }

    /// Regenerate the schedule of a medication from `effective_from` on.
    pub async fn reconcile(
        &self,
        ctx: &RequestContext,
        medication_id: Uuid,
        effective_from: Date,
        policy: ReconcilePolicy,
    ) -> Result<ReconcileOutcome, EngineError> {
        let _guard = self.locks.acquire(medication_id).await;
        let medication = self.load_medication(medication_id).await?;
        require_clinician(ctx, medication.patient_id, "reconcile schedules")?;

        reconcile_schedule(
            self.logs.as_ref(),
            &medication,
            effective_from,
            self.config.frequency_policy,
            policy,
        )
        .await
    }

    /// Mark a dose event taken or untaken.
    ///
    /// The event must belong to `medication_id`; access and the lock are both
    /// checked against that medication.
    pub async fn record_dose(
        &self,
        ctx: &RequestContext,
        medication_id: Uuid,
        event_id: Uuid,
        taken: bool,
    ) -> Result<DoseEvent, EngineError> {
        let _guard = self.locks.acquire(medication_id).await;
        let medication = self.load_medication(medication_id).await?;
        require_access(ctx, medication.patient_id, "record doses")?;

        let event = self.logs.mark_taken(medication_id, event_id, taken).await?;
        tracing::info!(
            medication_id = %medication_id,
            event_id = %event_id,
            timestamp = %event.timestamp,
            taken,
            "dose recorded"
        );
        Ok(event)
    }

    pub async fn medication_adherence(
        &self,
        ctx: &RequestContext,
        medication_id: Uuid,
        as_of: DateTime,
    ) -> Result<MedicationAdherence, EngineError> {
        let medication = self.load_medication(medication_id).await?;
        require_access(ctx, medication.patient_id, "view adherence")?;

        let logs = self.logs.list_due_by(medication_id, as_of).await?;
        Ok(glycare_adherence::medication_adherence(
            medication_id,
            &logs,
            as_of,
        ))
    }

    pub async fn patient_adherence(
        &self,
        ctx: &RequestContext,
        patient_id: Uuid,
        as_of: DateTime,
    ) -> Result<PatientAdherence, EngineError> {
        require_access(ctx, patient_id, "view adherence")?;

        let medications = self.medications.list_active(patient_id).await?;
        let per_medication = try_join_all(medications.iter().map(|m| async move {
            let logs = self.logs.list_due_by(m.id, as_of).await?;
            Ok::<_, EngineError>((m.id, logs))
        }))
        .await?;

        Ok(glycare_adherence::patient_adherence(
            patient_id,
            per_medication
                .iter()
                .map(|(id, logs)| (*id, logs.as_slice())),
            as_of,
        ))
    }

    /// Gather the latest facts for a patient and run the alert rules.
    pub async fn alerts(
        &self,
        ctx: &RequestContext,
        patient_id: Uuid,
    ) -> Result<Vec<Alert>, EngineError> {
        let snapshot = self.snapshot(ctx, patient_id).await?;
        Ok(evaluate(&snapshot, &self.config.alerts))
    }

    /// Assemble the alert snapshot for a patient as of `ctx.now`.
    pub async fn snapshot(
        &self,
        ctx: &RequestContext,
        patient_id: Uuid,
    ) -> Result<AlertSnapshot, EngineError> {
        require_access(ctx, patient_id, "view alerts")?;
        let now = ctx.now;
        let latest_measurement = self.glucose.latest(patient_id).await?;
        let medications = self.medications.list_active(patient_id).await?;
        let horizon = now.saturating_add(
            i64::from(self.config.alerts.upcoming_window_minutes).minutes(),
        );

        let per_medication = try_join_all(medications.iter().map(|m| async move {
            let logs = self.logs.list_by_medication(m.id).await?;
            Ok::<_, EngineError>((m, logs))
        }))
        .await?;

        let mut latest_dose: Option<DoseEvent> = None;
        let mut upcoming = Vec::new();
        for (medication, logs) in per_medication {
            for event in logs {
                if !event.taken && event.timestamp >= now && event.timestamp <= horizon {
                    upcoming.push(UpcomingDose {
                        medication_name: medication.label(),
                        event: event.clone(),
                    });
                }
                if event.timestamp <= now
                    && latest_dose
                        .as_ref()
                        .is_none_or(|latest| event.timestamp > latest.timestamp)
                {
                    latest_dose = Some(event);
                }
            }
        }
        upcoming.sort_by_key(|u| u.event.timestamp);

        tracing::debug!(
            patient_id = %patient_id,
            medications = medications.len(),
            upcoming = upcoming.len(),
            has_measurement = latest_measurement.is_some(),
            "alert snapshot assembled"
        );

        Ok(AlertSnapshot {
            patient_id,
            now,
            latest_measurement,
            latest_dose,
            upcoming,
        })
    }

    /// Patient-list risk status from the latest glucose reading.
    pub async fn risk_status(
        &self,
        ctx: &RequestContext,
        patient_id: Uuid,
    ) -> Result<Option<RiskStatus>, EngineError> {
        require_access(ctx, patient_id, "view risk status")?;
        let latest = self.glucose.latest(patient_id).await?;
        Ok(classify_latest(latest.as_ref(), &self.config.risk))
    }

    async fn load_medication(&self, id: Uuid) -> Result<Medication, EngineError> {
        self.medications
            .get(id)
            .await?
            .ok_or(EngineError::MedicationNotFound(id))
    }
}

fn require_access(
    ctx: &RequestContext,
    patient_id: Uuid,
    action: &'static str,
) -> Result<(), EngineError> {
    if ctx.can_access(patient_id) {
        Ok(())
    } else {
        Err(EngineError::AccessDenied {
            actor_id: ctx.actor_id,
            patient_id,
            action,
        })
    }
}

fn require_clinician(
    ctx: &RequestContext,
    patient_id: Uuid,
    action: &'static str,
) -> Result<(), EngineError> {
    if ctx.is_clinician() {
        Ok(())
    } else {
        Err(EngineError::AccessDenied {
            actor_id: ctx.actor_id,
            patient_id,
            action,
        })
    }
}
