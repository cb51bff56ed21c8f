use glycare_core::models::dose::DoseEvent;
use glycare_core::models::medication::Medication;
use jiff::ToSpan;
use jiff::civil::Date;

use crate::catalog::{Cadence, FrequencyPolicy, cadence};
use crate::error::ScheduleError;

/// Validate and return a medication's inclusive `(start, end)` date range.
pub fn schedule_window(medication: &Medication) -> Result<(Date, Date), ScheduleError> {
    let end = medication.end_date.ok_or(ScheduleError::MissingEndDate {
        medication_id: medication.id,
    })?;
    if end < medication.start_date {
        return Err(ScheduleError::InvertedRange {
            medication_id: medication.id,
            start: medication.start_date,
            end,
        });
    }
    Ok((medication.start_date, end))
}

/// Expand a medication into its full dose schedule.
///
/// Events are ordered by date, then by time of day.
pub fn generate(
    medication: &Medication,
    policy: FrequencyPolicy,
) -> Result<Vec<DoseEvent>, ScheduleError> {
    let (start, end) = schedule_window(medication)?;
    generate_within(medication, start, end, policy)
}

/// Expand the part of a medication's schedule that falls in `[from, to]`.
///
/// The window is intersected with the medication's own range. Day-steps stay
/// anchored to the medication's start date, so a clipped every-other-day
/// schedule lands on the same days as the unclipped one.
pub fn generate_within(
    medication: &Medication,
    from: Date,
    to: Date,
    policy: FrequencyPolicy,
) -> Result<Vec<DoseEvent>, ScheduleError> {
    let (start, end) = schedule_window(medication)?;

    let plan = match cadence(&medication.frequency, policy)? {
        Cadence::Scheduled(plan) => plan,
        Cadence::OnDemand => return Ok(Vec::new()),
    };

    let lo = from.max(start);
    let hi = to.min(end);
    if lo > hi {
        return Ok(Vec::new());
    }

    let step = plan.day_step;
    let offset = start.until(lo)?.get_days();
    let steps_to_first = (offset + step - 1) / step;
    let first = start.checked_add((steps_to_first * step).days())?;

    let events = first
        .series(step.days())
        .take_while(|day| *day <= hi)
        .flat_map(|day| {
            plan.times
                .iter()
                .map(move |t| DoseEvent::scheduled(medication.id, day.to_datetime(*t)))
        })
        .collect();

    Ok(events)
}
