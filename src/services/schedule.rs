use crate::domain::schedule::ScheduleConfig;
use crate::forms::schedule::ScheduleForm;
use crate::repository::{ScheduleReader, ScheduleWriter};

use super::ServiceResult;

/// Returns the stored schedule, if one has been set.
pub fn show_schedule<R>(repo: &R) -> ServiceResult<Option<ScheduleConfig>>
where
    R: ScheduleReader,
{
    match repo.get_schedule_config() {
        Ok(config) => Ok(config),
        Err(e) => {
            log::error!("Failed to load schedule config: {e}");
            Err(e.into())
        }
    }
}

/// Validates `form` and replaces the stored schedule with it.
pub fn update_schedule<R>(form: ScheduleForm, repo: &R) -> ServiceResult<ScheduleConfig>
where
    R: ScheduleWriter,
{
    let config = ScheduleConfig::try_from(form)?;

    match repo.update_schedule_config(&config) {
        Ok(_) => {
            log::info!(
                "Schedule set to {} at {}",
                config.frequency,
                config.time_of_day
            );
            Ok(config)
        }
        Err(e) => {
            log::error!("Failed to update schedule config: {e}");
            Err(e.into())
        }
    }
}
