use diesel::prelude::*;

use crate::domain::schedule::ScheduleConfig as DomainScheduleConfig;
use crate::domain::types::{ScheduleFrequency, ScheduleTimes, TypeConstraintError};

/// Primary key of the single schedule row.
pub const SCHEDULE_CONFIG_ID: i32 = 1;

/// Diesel model representing the `schedule_config` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::schedule_config)]
pub struct ScheduleConfig {
    pub id: i32,
    pub frequency: String,
    pub days: String,
    pub time_of_day: String,
}

impl From<&DomainScheduleConfig> for ScheduleConfig {
    fn from(config: &DomainScheduleConfig) -> Self {
        Self {
            id: SCHEDULE_CONFIG_ID,
            frequency: config.frequency.as_str().to_string(),
            days: config.days.clone(),
            time_of_day: config.time_of_day.to_string(),
        }
    }
}

impl TryFrom<ScheduleConfig> for DomainScheduleConfig {
    type Error = TypeConstraintError;

    fn try_from(config: ScheduleConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            frequency: ScheduleFrequency::try_from(config.frequency)?,
            days: config.days,
            time_of_day: ScheduleTimes::parse(&config.time_of_day)?,
        })
    }
}
