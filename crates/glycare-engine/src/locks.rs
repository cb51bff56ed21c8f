use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// One async mutex per medication.
///
/// Writes that touch a medication's dose log (prescribe, reconcile, mark
/// taken) hold its guard for their whole read-delete-insert sequence, so a
/// reconciliation cannot drop a concurrently recorded dose. Different
/// medications never contend.
#[derive(Debug, Default)]
pub struct MedicationLocks {
    inner: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl MedicationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, medication_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            // Drop entries nobody is holding or waiting on.
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            map.entry(medication_id).or_default().clone()
        };
        lock.lock_owned().await
    }
}
