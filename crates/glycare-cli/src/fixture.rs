use glycare_core::models::glucose::GlucoseMeasurement;
use glycare_core::models::medication::Medication;
use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A patient's records as exported by the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub patient_id: Uuid,
    /// Patient-local wall clock to evaluate at.
    pub now: DateTime,
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub taken: Vec<TakenDose>,
    #[serde(default)]
    pub measurements: Vec<GlucoseMeasurement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakenDose {
    pub medication_id: Uuid,
    pub timestamp: DateTime,
}

pub fn load(path: &str) -> eyre::Result<Fixture> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read fixture at {path}: {e}"))?;
    Ok(serde_json::from_str(&contents)?)
}
