use jiff::civil::{Date, DateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who is calling into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    Clinician,
}

/// Explicit per-call credentials and clock.
///
/// Passed into every engine entry point. `now` is the patient-local wall
/// clock the caller observed; the core never reads the system clock itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    pub actor_id: Uuid,
    pub role: Role,
    pub now: DateTime,
}

impl RequestContext {
    pub fn patient(patient_id: Uuid, now: DateTime) -> Self {
        Self {
            actor_id: patient_id,
            role: Role::Patient,
            now,
        }
    }

    pub fn clinician(clinician_id: Uuid, now: DateTime) -> Self {
        Self {
            actor_id: clinician_id,
            role: Role::Clinician,
            now,
        }
    }

    pub fn today(&self) -> Date {
        self.now.date()
    }

    /// Clinicians see every patient; patients only see themselves.
    pub fn can_access(&self, patient_id: Uuid) -> bool {
        match self.role {
            Role::Clinician => true,
            Role::Patient => self.actor_id == patient_id,
        }
    }

    pub fn is_clinician(&self) -> bool {
        self.role == Role::Clinician
    }
}
