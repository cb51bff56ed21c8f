//! In-process store backing all three collaborator traits.
//!
//! Used by tests and the command-line harness. Dose events are keyed by
//! `(medication_id, timestamp)`, mirroring the uniqueness the persisted log
//! table enforces.

use std::collections::{BTreeMap, HashMap, HashSet};

use glycare_core::models::dose::DoseEvent;
use glycare_core::models::glucose::GlucoseMeasurement;
use glycare_core::models::medication::Medication;
use jiff::civil::DateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{BoxFuture, GlucoseStore, LogStore, MedicationStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    medications: HashMap<Uuid, Medication>,
    doses: BTreeMap<(Uuid, DateTime), DoseEvent>,
    measurements: Vec<GlucoseMeasurement>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_medication(&self, medication: Medication) {
        self.inner
            .write()
            .await
            .medications
            .insert(medication.id, medication);
    }

    /// Remove a medication together with its dose events.
    pub async fn remove_medication(&self, id: Uuid) -> Option<Medication> {
        let mut inner = self.inner.write().await;
        inner.doses.retain(|(medication_id, _), _| *medication_id != id);
        inner.medications.remove(&id)
    }

    pub async fn insert_measurement(&self, measurement: GlucoseMeasurement) {
        self.inner.write().await.measurements.push(measurement);
    }

    pub async fn dose_count(&self, medication_id: Uuid) -> usize {
        self.inner
            .read()
            .await
            .doses
            .keys()
            .filter(|(id, _)| *id == medication_id)
            .count()
    }
}

impl MedicationStore for MemoryStore {
    fn get(&self, id: Uuid) -> BoxFuture<'_, Result<Option<Medication>, StoreError>> {
        Box::pin(async move { Ok(self.inner.read().await.medications.get(&id).cloned()) })
    }

    fn list_active(&self, patient_id: Uuid) -> BoxFuture<'_, Result<Vec<Medication>, StoreError>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            let mut medications: Vec<Medication> = inner
                .medications
                .values()
                .filter(|m| m.patient_id == patient_id)
                .cloned()
                .collect();
            medications.sort_by(|a, b| {
                a.start_date
                    .cmp(&b.start_date)
                    .then_with(|| a.name.cmp(&b.name))
            });
            Ok(medications)
        })
    }

    fn update(&self, medication: Medication) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            match inner.medications.get_mut(&medication.id) {
                Some(existing) => {
                    *existing = medication;
                    Ok(())
                }
                None => Err(StoreError::NotFound {
                    kind: "medication",
                    id: medication.id,
                }),
            }
        })
    }
}

impl LogStore for MemoryStore {
    fn list_by_medication(
        &self,
        medication_id: Uuid,
    ) -> BoxFuture<'_, Result<Vec<DoseEvent>, StoreError>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            Ok(inner
                .doses
                .range((medication_id, DateTime::MIN)..=(medication_id, DateTime::MAX))
                .map(|(_, event)| event.clone())
                .collect())
        })
    }

    fn list_due_by(
        &self,
        medication_id: Uuid,
        as_of: DateTime,
    ) -> BoxFuture<'_, Result<Vec<DoseEvent>, StoreError>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            Ok(inner
                .doses
                .range((medication_id, DateTime::MIN)..=(medication_id, as_of))
                .map(|(_, event)| event.clone())
                .collect())
        })
    }

    fn delete_from(
        &self,
        medication_id: Uuid,
        from: DateTime,
    ) -> BoxFuture<'_, Result<usize, StoreError>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let before = inner.doses.len();
            inner
                .doses
                .retain(|(id, at), _| !(*id == medication_id && *at >= from));
            Ok(before - inner.doses.len())
        })
    }

    fn delete_untaken_from(
        &self,
        medication_id: Uuid,
        from: DateTime,
    ) -> BoxFuture<'_, Result<usize, StoreError>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let before = inner.doses.len();
            inner
                .doses
                .retain(|(id, at), event| !(*id == medication_id && *at >= from && !event.taken));
            Ok(before - inner.doses.len())
        })
    }

    fn insert_batch(&self, events: Vec<DoseEvent>) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;

            let mut seen = HashSet::with_capacity(events.len());
            for event in &events {
                let key = (event.medication_id, event.timestamp);
                if inner.doses.contains_key(&key) || !seen.insert(key) {
                    return Err(StoreError::DuplicateDose {
                        medication_id: event.medication_id,
                        timestamp: event.timestamp,
                    });
                }
            }

            for event in events {
                inner
                    .doses
                    .insert((event.medication_id, event.timestamp), event);
            }
            Ok(())
        })
    }

    fn mark_taken(
        &self,
        medication_id: Uuid,
        event_id: Uuid,
        taken: bool,
    ) -> BoxFuture<'_, Result<DoseEvent, StoreError>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let found = inner
                .doses
                .range_mut((medication_id, DateTime::MIN)..=(medication_id, DateTime::MAX))
                .map(|(_, event)| event)
                .find(|event| event.id == event_id);
            match found {
                Some(event) => {
                    event.taken = taken;
                    Ok(event.clone())
                }
                None => Err(StoreError::NotFound {
                    kind: "dose",
                    id: event_id,
                }),
            }
        })
    }
}

impl GlucoseStore for MemoryStore {
    fn latest(
        &self,
        patient_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<GlucoseMeasurement>, StoreError>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            Ok(inner
                .measurements
                .iter()
                .filter(|m| m.patient_id == patient_id)
                .max_by_key(|m| m.timestamp)
                .cloned())
        })
    }
}
