use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// When in the day a reading was taken relative to meals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementTag {
    Fasting,
    BeforeMeal,
    AfterMeal,
    Bedtime,
    Random,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlucoseMeasurement {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub timestamp: DateTime,
    /// Blood glucose in mg/dL.
    pub value: f64,
    pub tag: MeasurementTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
