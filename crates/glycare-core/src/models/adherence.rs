use std::fmt;

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Fraction of due doses that were taken, always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct AdherenceRatio(f64);

impl AdherenceRatio {
    pub const FULL: AdherenceRatio = AdherenceRatio(1.0);
    pub const NONE: AdherenceRatio = AdherenceRatio(0.0);

    pub fn new(value: f64) -> Result<Self, CoreError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidRatio(value))
        }
    }

    /// `taken / due`, or [`AdherenceRatio::FULL`] when nothing is due.
    pub fn from_counts(taken: usize, due: usize) -> Self {
        if due == 0 {
            return Self::FULL;
        }
        Self(taken.min(due) as f64 / due as f64)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn percent(self) -> f64 {
        self.0 * 100.0
    }
}

impl TryFrom<f64> for AdherenceRatio {
    type Error = CoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AdherenceRatio> for f64 {
    fn from(value: AdherenceRatio) -> Self {
        value.0
    }
}

impl fmt::Display for AdherenceRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.percent())
    }
}

/// Adherence of a single medication as of an instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationAdherence {
    pub medication_id: Uuid,
    pub as_of: DateTime,
    pub due: usize,
    pub taken: usize,
    pub ratio: AdherenceRatio,
}

impl MedicationAdherence {
    pub fn has_due_doses(&self) -> bool {
        self.due > 0
    }
}

/// Patient-level adherence: the mean of per-medication ratios over the
/// medications that had at least one due dose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientAdherence {
    pub patient_id: Uuid,
    pub as_of: DateTime,
    pub ratio: AdherenceRatio,
    /// Medications that contributed to the mean.
    pub contributing: Vec<MedicationAdherence>,
    /// Medications left out because nothing was due yet.
    pub excluded: Vec<Uuid>,
}
