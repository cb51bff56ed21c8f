use glycare_core::models::dose::DoseEvent;
use glycare_core::models::glucose::GlucoseMeasurement;
use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An untaken dose paired with the label shown to the patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingDose {
    pub medication_name: String,
    pub event: DoseEvent,
}

/// Everything the alert rules look at for one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSnapshot {
    pub patient_id: Uuid,
    pub now: DateTime,
    pub latest_measurement: Option<GlucoseMeasurement>,
    /// Most recent due dose across all medications, taken or not.
    pub latest_dose: Option<DoseEvent>,
    pub upcoming: Vec<UpcomingDose>,
}

impl AlertSnapshot {
    pub fn empty(patient_id: Uuid, now: DateTime) -> Self {
        Self {
            patient_id,
            now,
            latest_measurement: None,
            latest_dose: None,
            upcoming: Vec::new(),
        }
    }
}
