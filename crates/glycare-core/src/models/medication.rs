use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::frequency::Frequency;

/// A prescribed therapy for one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub name: String,
    /// Free-text strength, e.g. "500mg".
    pub dose: String,
    pub frequency: Frequency,
    pub start_date: Date,
    /// Open-ended prescriptions are stored but never expanded into doses.
    pub end_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Medication {
    /// Whether `other` differs in any field that shapes the dose schedule.
    pub fn schedule_changed(&self, other: &Medication) -> bool {
        self.start_date != other.start_date
            || self.end_date != other.end_date
            || self.frequency != other.frequency
    }

    /// Display label used in alerts, e.g. "Metformin 500mg".
    pub fn label(&self) -> String {
        let dose = self.dose.trim();
        if dose.is_empty() {
            self.name.clone()
        } else {
            format!("{} {dose}", self.name)
        }
    }
}
