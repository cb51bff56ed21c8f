use glycare_core::models::alert::RiskStatus;
use glycare_core::models::glucose::GlucoseMeasurement;

use crate::thresholds::RiskBands;

/// Band a glucose value (mg/dL) for patient-list display.
pub fn classify_risk(value: f64, bands: &RiskBands) -> RiskStatus {
    if value < bands.high_below || value > bands.high_above {
        RiskStatus::High
    } else if value < bands.moderate_below || value > bands.moderate_above {
        RiskStatus::Moderate
    } else {
        RiskStatus::Normal
    }
}

/// Risk status of the latest reading, or `None` when there is no reading.
pub fn classify_latest(latest: Option<&GlucoseMeasurement>, bands: &RiskBands) -> Option<RiskStatus> {
    latest.map(|m| classify_risk(m.value, bands))
}
