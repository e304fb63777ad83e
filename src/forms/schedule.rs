use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::domain::schedule::ScheduleConfig;
use crate::domain::types::{ScheduleFrequency, ScheduleTimes, TypeConstraintError};

/// Operator input for the scrape schedule.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScheduleForm {
    #[validate(length(min = 1))]
    pub frequency: String,
    /// Day list for weekly schedules, e.g. `Mon,Wed,Fri`.
    #[serde(default)]
    pub days: String,
    /// Comma-separated `HH:MM` times. Daily schedules accept several.
    #[validate(length(min = 1))]
    pub times: String,
}

#[derive(Debug, Error)]
pub enum ScheduleFormError {
    #[error("invalid schedule form: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error(transparent)]
    Constraint(#[from] TypeConstraintError),
    #[error("weekly schedules need at least one day")]
    MissingDays,
    #[error("{0} schedules take exactly one time of day")]
    SingleTimeExpected(ScheduleFrequency),
}

impl TryFrom<ScheduleForm> for ScheduleConfig {
    type Error = ScheduleFormError;

    fn try_from(form: ScheduleForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let frequency = ScheduleFrequency::try_from(form.frequency.as_str())?;
        let time_of_day = ScheduleTimes::parse(&form.times)?;

        let days = match frequency {
            ScheduleFrequency::Weekly => {
                let days = form.days.to_lowercase().replace(' ', "");
                if days.trim_matches(',').is_empty() {
                    return Err(ScheduleFormError::MissingDays);
                }
                days
            }
            ScheduleFrequency::Daily | ScheduleFrequency::Monthly => String::new(),
        };

        if frequency != ScheduleFrequency::Daily && time_of_day.times().len() != 1 {
            return Err(ScheduleFormError::SingleTimeExpected(frequency));
        }

        Ok(Self {
            frequency,
            days,
            time_of_day,
        })
    }
}
