use glycare_core::models::frequency::Frequency;
use jiff::civil::{Time, time};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Canonical times of day and day-step for a scheduled frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosingPlan {
    /// Ascending times of day at which a dose is due.
    pub times: &'static [Time],
    /// Days between successive generation points.
    pub day_step: i32,
}

impl DosingPlan {
    pub fn times_per_day(&self) -> usize {
        self.times.len()
    }
}

/// What the catalog says about a frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Scheduled(DosingPlan),
    /// Taken on demand; generates no events.
    OnDemand,
}

/// How to treat a frequency string the catalog does not know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyPolicy {
    /// Fall back to a single daily dose at 09:00.
    #[default]
    Lenient,
    /// Reject with [`ScheduleError::UnsupportedFrequency`].
    Strict,
}

const ONCE_DAILY: DosingPlan = DosingPlan {
    times: &[time(8, 0, 0, 0)],
    day_step: 1,
};

const TWICE_DAILY: DosingPlan = DosingPlan {
    times: &[time(9, 0, 0, 0), time(21, 0, 0, 0)],
    day_step: 1,
};

const THREE_DAILY: DosingPlan = DosingPlan {
    times: &[time(8, 0, 0, 0), time(14, 0, 0, 0), time(20, 0, 0, 0)],
    day_step: 1,
};

const EVERY_6H: DosingPlan = DosingPlan {
    times: &[
        time(0, 0, 0, 0),
        time(6, 0, 0, 0),
        time(12, 0, 0, 0),
        time(18, 0, 0, 0),
    ],
    day_step: 1,
};

const EVERY_8H: DosingPlan = DosingPlan {
    times: &[time(6, 0, 0, 0), time(14, 0, 0, 0), time(22, 0, 0, 0)],
    day_step: 1,
};

const WEEKLY: DosingPlan = DosingPlan {
    times: &[time(8, 0, 0, 0)],
    day_step: 7,
};

const EVERY_OTHER_DAY: DosingPlan = DosingPlan {
    times: &[time(9, 0, 0, 0)],
    day_step: 2,
};

// Legacy records with free-text frequencies were scheduled at 09:00, not at
// the ONCE_DAILY slot.
const LEGACY_FALLBACK: DosingPlan = DosingPlan {
    times: &[time(9, 0, 0, 0)],
    day_step: 1,
};

/// Look up the cadence for a frequency.
pub fn cadence(frequency: &Frequency, policy: FrequencyPolicy) -> Result<Cadence, ScheduleError> {
    let plan = match frequency {
        Frequency::OnceDaily => ONCE_DAILY,
        Frequency::TwiceDaily => TWICE_DAILY,
        Frequency::ThreeDaily => THREE_DAILY,
        Frequency::Every6h => EVERY_6H,
        Frequency::Every8h => EVERY_8H,
        Frequency::Weekly => WEEKLY,
        Frequency::EveryOtherDay => EVERY_OTHER_DAY,
        Frequency::AsNeeded => return Ok(Cadence::OnDemand),
        Frequency::Unrecognized(raw) => match policy {
            FrequencyPolicy::Lenient => LEGACY_FALLBACK,
            FrequencyPolicy::Strict => {
                return Err(ScheduleError::UnsupportedFrequency(raw.clone()));
            }
        },
    };
    Ok(Cadence::Scheduled(plan))
}
