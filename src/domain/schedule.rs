use serde::{Deserialize, Serialize};

use crate::domain::types::{ScheduleFrequency, ScheduleTimes};

/// Persisted recurrence of the scheduled scrape.
///
/// The store and the diff engine never read this; it is kept for the
/// operator surface and for whatever external scheduler drives `run`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub frequency: ScheduleFrequency,
    /// Free-text day list for weekly schedules, e.g. `Mon,Wed,Fri`.
    pub days: String,
    pub time_of_day: ScheduleTimes,
}
