//! glycare-adherence
//!
//! Adherence ratios from dose history. Pure functions over already-fetched
//! dose events.

use glycare_core::models::adherence::{AdherenceRatio, MedicationAdherence, PatientAdherence};
use glycare_core::models::dose::DoseEvent;
use jiff::civil::DateTime;
use uuid::Uuid;

/// Adherence of one medication's dose log as of `as_of`.
///
/// Only events with `timestamp <= as_of` count. With nothing due the ratio is
/// 1.0: a medication that has not started yet is not being missed.
pub fn medication_adherence(
    medication_id: Uuid,
    logs: &[DoseEvent],
    as_of: DateTime,
) -> MedicationAdherence {
    let (due, taken) = logs
        .iter()
        .filter(|event| event.is_due(as_of))
        .fold((0usize, 0usize), |(due, taken), event| {
            (due + 1, taken + usize::from(event.taken))
        });

    MedicationAdherence {
        medication_id,
        as_of,
        due,
        taken,
        ratio: AdherenceRatio::from_counts(taken, due),
    }
}

/// Patient adherence across medications as of `as_of`.
///
/// Medications with no due dose are left out of the mean rather than
/// counted as 1.0. If none has a due dose the patient is at 1.0.
pub fn patient_adherence<'a, I>(patient_id: Uuid, medications: I, as_of: DateTime) -> PatientAdherence
where
    I: IntoIterator<Item = (Uuid, &'a [DoseEvent])>,
{
    let mut contributing = Vec::new();
    let mut excluded = Vec::new();

    for (medication_id, logs) in medications {
        let adherence = medication_adherence(medication_id, logs, as_of);
        if adherence.has_due_doses() {
            contributing.push(adherence);
        } else {
            excluded.push(medication_id);
        }
    }

    let ratio = if contributing.is_empty() {
        AdherenceRatio::FULL
    } else {
        let sum: f64 = contributing.iter().map(|m| m.ratio.value()).sum();
        // Mean of values in [0, 1]; clamp absorbs float rounding.
        AdherenceRatio::new((sum / contributing.len() as f64).clamp(0.0, 1.0))
            .unwrap_or(AdherenceRatio::FULL)
    };

    PatientAdherence {
        patient_id,
        as_of,
        ratio,
        contributing,
        excluded,
    }
}
