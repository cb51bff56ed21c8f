use glycare_core::models::alert::{Alert, AlertKind, Severity};
use jiff::ToSpan;
use jiff::civil::DateTime;

use crate::snapshot::AlertSnapshot;
use crate::thresholds::AlertThresholds;

/// Run every alert rule over a snapshot.
///
/// Rules run in a fixed order and each appends independently:
/// glucose out of range, stale measurements, stale medication log,
/// upcoming doses. Missing inputs never fail; they just do not trigger
/// (except the stale-measurement rule, for which absence is the signal).
pub fn evaluate(snapshot: &AlertSnapshot, thresholds: &AlertThresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();
    glucose_out_of_range(snapshot, thresholds, &mut alerts);
    stale_measurements(snapshot, thresholds, &mut alerts);
    stale_medication_log(snapshot, thresholds, &mut alerts);
    upcoming_doses(snapshot, thresholds, &mut alerts);
    alerts
}

fn glucose_out_of_range(snapshot: &AlertSnapshot, t: &AlertThresholds, alerts: &mut Vec<Alert>) {
    let Some(m) = &snapshot.latest_measurement else {
        return;
    };

    let direction = if m.value < t.glucose_low {
        "below"
    } else if m.value > t.glucose_high {
        "above"
    } else {
        return;
    };

    alerts.push(Alert {
        kind: AlertKind::GlucoseOutOfRange,
        severity: Severity::Critical,
        patient_id: snapshot.patient_id,
        message: format!(
            "Glucose reading of {} mg/dL is {direction} the safe range ({}-{} mg/dL)",
            m.value, t.glucose_low, t.glucose_high
        ),
        timestamp: m.timestamp,
    });
}

fn stale_measurements(snapshot: &AlertSnapshot, t: &AlertThresholds, alerts: &mut Vec<Alert>) {
    let days = t.measurement_stale_after_days;
    let message = match &snapshot.latest_measurement {
        None => "No glucose readings have been recorded".to_string(),
        Some(m) if m.timestamp < cutoff(snapshot.now, days) => {
            format!("No glucose reading recorded in the last {days} days")
        }
        Some(_) => return,
    };

    alerts.push(Alert {
        kind: AlertKind::StaleMeasurements,
        severity: Severity::Warning,
        patient_id: snapshot.patient_id,
        message,
        timestamp: snapshot.now,
    });
}

fn stale_medication_log(snapshot: &AlertSnapshot, t: &AlertThresholds, alerts: &mut Vec<Alert>) {
    let Some(dose) = &snapshot.latest_dose else {
        return;
    };
    let days = t.dose_log_stale_after_days;
    if dose.timestamp >= cutoff(snapshot.now, days) {
        return;
    }

    alerts.push(Alert {
        kind: AlertKind::StaleMedicationLog,
        severity: Severity::Warning,
        patient_id: snapshot.patient_id,
        message: format!("No medication doses logged in the last {days} days"),
        timestamp: snapshot.now,
    });
}

fn upcoming_doses(snapshot: &AlertSnapshot, t: &AlertThresholds, alerts: &mut Vec<Alert>) {
    let horizon = snapshot
        .now
        .saturating_add(i64::from(t.upcoming_window_minutes).minutes());

    for upcoming in &snapshot.upcoming {
        let at = upcoming.event.timestamp;
        if upcoming.event.taken || at < snapshot.now || at > horizon {
            continue;
        }
        alerts.push(Alert {
            kind: AlertKind::UpcomingDose,
            severity: Severity::Info,
            patient_id: snapshot.patient_id,
            message: format!(
                "Upcoming dose: {} at {:02}:{:02}",
                upcoming.medication_name,
                at.hour(),
                at.minute()
            ),
            timestamp: at,
        });
    }
}

fn cutoff(now: DateTime, days: i32) -> DateTime {
    now.saturating_sub(days.days())
}
