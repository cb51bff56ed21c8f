use jiff::civil::Date;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("medication {medication_id} has no end date; open-ended schedules are not generated")]
    MissingEndDate { medication_id: Uuid },

    #[error("medication {medication_id} ends on {end} before it starts on {start}")]
    InvertedRange {
        medication_id: Uuid,
        start: Date,
        end: Date,
    },

    #[error("unsupported frequency: {0}")]
    UnsupportedFrequency(String),

    #[error("date arithmetic error: {0}")]
    DateArithmetic(#[from] jiff::Error),
}

impl ScheduleError {
    /// Whether the medication definition itself is unusable for scheduling.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingEndDate { .. } | Self::InvertedRange { .. }
        )
    }
}
