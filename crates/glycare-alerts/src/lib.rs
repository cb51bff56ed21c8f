//! glycare-alerts
//!
//! Clinical alert rules and glucose risk banding. Stateless: every function
//! takes a snapshot of already-fetched data and returns derived values.
//!
//! Two glucose scales live here side by side and are deliberately kept apart:
//! [`AlertThresholds`] drive the out-of-range alert, [`RiskBands`] drive the
//! patient-list risk status.

pub mod risk;
pub mod rules;
pub mod snapshot;
pub mod thresholds;

pub use crate::risk::{classify_latest, classify_risk};
pub use crate::rules::evaluate;
pub use crate::snapshot::{AlertSnapshot, UpcomingDose};
pub use crate::thresholds::{AlertThresholds, RiskBands};
