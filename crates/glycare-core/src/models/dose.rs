use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One scheduled instance of taking a medication.
///
/// `(medication_id, timestamp)` is unique per medication; the id is derived
/// from that pair so regenerating a schedule yields the same ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseEvent {
    pub id: Uuid,
    pub medication_id: Uuid,
    pub timestamp: DateTime,
    #[serde(default)]
    pub taken: bool,
}

impl DoseEvent {
    /// A freshly scheduled, untaken dose.
    pub fn scheduled(medication_id: Uuid, timestamp: DateTime) -> Self {
        Self {
            id: Self::id_for(medication_id, timestamp),
            medication_id,
            timestamp,
            taken: false,
        }
    }

    pub fn id_for(medication_id: Uuid, timestamp: DateTime) -> Uuid {
        Uuid::new_v5(&medication_id, timestamp.to_string().as_bytes())
    }

    pub fn is_due(&self, as_of: DateTime) -> bool {
        self.timestamp <= as_of
    }
}
