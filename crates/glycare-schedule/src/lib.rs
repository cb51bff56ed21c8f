//! glycare-schedule
//!
//! Frequency catalog and dose schedule generation. Pure computation, no
//! storage and no clock. Turns a medication's date range and frequency into
//! an ordered list of dose events.

pub mod catalog;
pub mod error;
pub mod generate;

pub use crate::catalog::{Cadence, DosingPlan, FrequencyPolicy, cadence};
pub use crate::error::ScheduleError;
pub use crate::generate::{generate, generate_within, schedule_window};
