use serde::{Deserialize, Serialize};

/// Limits used by the alert rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Readings below this (mg/dL) raise a critical alert.
    pub glucose_low: f64,
    /// Readings above this (mg/dL) raise a critical alert.
    pub glucose_high: f64,
    pub measurement_stale_after_days: i32,
    pub dose_log_stale_after_days: i32,
    pub upcoming_window_minutes: i32,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            glucose_low: 70.0,
            glucose_high: 180.0,
            measurement_stale_after_days: 7,
            dose_log_stale_after_days: 2,
            upcoming_window_minutes: 30,
        }
    }
}

/// Bands for the patient-list risk status.
///
/// A value outside the high band is `High`, else outside the moderate band
/// is `Moderate`, else `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskBands {
    pub high_below: f64,
    pub high_above: f64,
    pub moderate_below: f64,
    pub moderate_above: f64,
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            high_below: 80.0,
            high_above: 200.0,
            moderate_below: 90.0,
            moderate_above: 160.0,
        }
    }
}
